//! Error types for the WebSocket adapter

use screening_application::TransportError;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur on the WebSocket connection
#[derive(Error, Debug)]
pub enum WsError {
    #[error("Invalid WebSocket endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("WebSocket error: {0}")]
    Protocol(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Connection timed out after {} ms", .0.as_millis())]
    Timeout(Duration),

    #[error("Connection closed")]
    Closed,
}

impl From<WsError> for TransportError {
    fn from(err: WsError) -> Self {
        match err {
            WsError::InvalidEndpoint { endpoint, reason } => {
                TransportError::InvalidEndpoint { endpoint, reason }
            }
            _ => TransportError::Closed,
        }
    }
}
