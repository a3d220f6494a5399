//! Connection configuration from TOML (`[connection]` section)

use screening_application::ReconnectPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw reconnect/timeout configuration from TOML
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConnectionConfig {
    /// Consecutive failed attempts before giving up (0 = never retry)
    pub max_retries: u32,
    /// Timeout for establishing one connection
    pub connect_timeout_ms: u64,
    pub min_reconnect_delay_ms: u64,
    pub max_reconnect_delay_ms: u64,
    /// Backoff multiplier per failed attempt
    pub reconnect_growth: f64,
}

impl Default for FileConnectionConfig {
    fn default() -> Self {
        let policy = ReconnectPolicy::default();
        Self {
            max_retries: policy.max_retries,
            connect_timeout_ms: policy.connect_timeout.as_millis() as u64,
            min_reconnect_delay_ms: policy.min_delay.as_millis() as u64,
            max_reconnect_delay_ms: policy.max_delay.as_millis() as u64,
            reconnect_growth: policy.growth,
        }
    }
}

impl FileConnectionConfig {
    pub fn to_policy(&self) -> ReconnectPolicy {
        ReconnectPolicy {
            max_retries: self.max_retries,
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            min_delay: Duration::from_millis(self.min_reconnect_delay_ms),
            max_delay: Duration::from_millis(self.max_reconnect_delay_ms),
            growth: self.reconnect_growth,
        }
    }
}
