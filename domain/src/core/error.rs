//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Missing user ID or job ID")]
    MissingParticipants,

    #[error("Invalid screening decision: {0}")]
    InvalidDecision(String),
}

impl DomainError {
    /// Check if this error means the chat cannot be started at all
    pub fn is_missing_participants(&self) -> bool {
        matches!(self, DomainError::MissingParticipants)
    }
}
