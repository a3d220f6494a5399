//! WebSocket transport for the screening conversation.
//!
//! [`WsConnectionManager`] owns one socket on a background task, reconnecting
//! with capped geometric backoff. [`WsChatConnector`] exposes it through the
//! application layer's [`ChatConnector`](screening_application::ChatConnector)
//! port.

mod connection;
mod error;

pub use connection::{WsChatConnector, WsConnection, WsConnectionManager};
pub use error::WsError;
