//! Service endpoints from TOML (`[endpoints]` section)

use serde::{Deserialize, Serialize};

/// Raw endpoint configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEndpointsConfig {
    /// Base URL of the REST API
    pub api_base_url: String,
    /// WebSocket URL of the screening agent
    pub ws_url: String,
}

impl Default for FileEndpointsConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            ws_url: "ws://localhost:8080/ws".to_string(),
        }
    }
}
