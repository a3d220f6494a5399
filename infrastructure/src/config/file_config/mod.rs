//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.

mod connection;
mod endpoints;
mod logging;
mod output;

pub use connection::FileConnectionConfig;
pub use endpoints::FileEndpointsConfig;
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigValidationError {
    #[error("{field} cannot be empty")]
    EmptyEndpoint { field: &'static str },

    #[error("connection.connect_timeout_ms cannot be 0")]
    InvalidTimeout,

    #[error("connection.reconnect_growth must be at least 1.0 (got {0})")]
    InvalidGrowth(f64),

    #[error(
        "connection.min_reconnect_delay_ms ({min}) exceeds connection.max_reconnect_delay_ms ({max})"
    )]
    InvertedDelays { min: u64, max: u64 },
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// REST and WebSocket endpoints
    pub endpoints: FileEndpointsConfig,
    /// Reconnect and timeout settings
    pub connection: FileConnectionConfig,
    /// Diagnostic and transcript logging
    pub logging: FileLoggingConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        if self.endpoints.api_base_url.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyEndpoint {
                field: "endpoints.api_base_url",
            });
        }
        if self.endpoints.ws_url.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyEndpoint {
                field: "endpoints.ws_url",
            });
        }

        let connection = &self.connection;
        if connection.connect_timeout_ms == 0 {
            issues.push(ConfigValidationError::InvalidTimeout);
        }
        if connection.reconnect_growth.is_nan() || connection.reconnect_growth < 1.0 {
            issues.push(ConfigValidationError::InvalidGrowth(
                connection.reconnect_growth,
            ));
        }
        if connection.min_reconnect_delay_ms > connection.max_reconnect_delay_ms {
            issues.push(ConfigValidationError::InvertedDelays {
                min: connection.min_reconnect_delay_ms,
                max: connection.max_reconnect_delay_ms,
            });
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[endpoints]
api_base_url = "https://screening.example.com"
ws_url = "wss://screening.example.com/ws"

[connection]
max_retries = 3
connect_timeout_ms = 2000

[logging]
transcript_dir = "/tmp/transcripts"
file = true

[output]
color = false
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.endpoints.api_base_url, "https://screening.example.com");
        assert_eq!(config.endpoints.ws_url, "wss://screening.example.com/ws");
        assert_eq!(config.connection.max_retries, 3);
        assert_eq!(config.connection.connect_timeout_ms, 2000);
        assert_eq!(config.connection.max_reconnect_delay_ms, 10000);
        assert!(config.logging.file);
        assert!(config.logging.transcript_dir.is_some());
        assert!(!config.output.color);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert_eq!(config.endpoints.api_base_url, "http://localhost:8080");
        assert_eq!(config.endpoints.ws_url, "ws://localhost:8080/ws");
        assert_eq!(config.connection.max_retries, 5);
        assert_eq!(config.connection.connect_timeout_ms, 5000);
        assert!(config.logging.transcript_dir.is_none());
        assert!(!config.logging.file);
        assert!(config.output.color);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(FileConfig::default().validate().is_empty());
    }

    #[test]
    fn test_zero_retries_is_allowed() {
        let mut config = FileConfig::default();
        config.connection.max_retries = 0;
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_reports_every_issue() {
        let mut config = FileConfig::default();
        config.endpoints.ws_url = "  ".to_string();
        config.connection.connect_timeout_ms = 0;
        config.connection.reconnect_growth = 0.5;
        config.connection.min_reconnect_delay_ms = 20_000;

        let issues = config.validate();
        assert_eq!(
            issues,
            vec![
                ConfigValidationError::EmptyEndpoint {
                    field: "endpoints.ws_url"
                },
                ConfigValidationError::InvalidTimeout,
                ConfigValidationError::InvalidGrowth(0.5),
                ConfigValidationError::InvertedDelays {
                    min: 20_000,
                    max: 10_000
                },
            ]
        );
    }
}
