//! Infrastructure layer for screening-client
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, plus configuration file loading.

pub mod config;
pub mod http;
pub mod logging;
pub mod websocket;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileConnectionConfig, FileEndpointsConfig,
    FileLoggingConfig, FileOutputConfig,
};
pub use http::HttpScreeningApi;
pub use logging::JsonlConversationLogger;
pub use websocket::{WsChatConnector, WsConnection, WsConnectionManager, WsError};
