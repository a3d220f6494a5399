//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod chat_event;
pub mod conversation_logger;
pub mod screening_api;
pub mod transport;
