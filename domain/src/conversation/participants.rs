//! Who the conversation is about.
//!
//! A chat session always needs a `{user_id, job_id}` pair for its start
//! handshake. Where the pair comes from is a configuration choice, not a
//! different kind of session.

use crate::applicant::entities::User;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Resolved applicant and job for one session (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participants {
    pub user_id: String,
    pub job_id: String,
}

/// Source of the session's participants
#[derive(Debug, Clone)]
pub enum ParticipantSource {
    /// Explicit ids (fixtures, command-line flags)
    Fixed { user_id: String, job_id: String },
    /// The signed-in applicant and the job they picked
    Authenticated {
        user: Option<User>,
        job_id: Option<String>,
    },
}

impl ParticipantSource {
    pub fn fixed(user_id: impl Into<String>, job_id: impl Into<String>) -> Self {
        ParticipantSource::Fixed {
            user_id: user_id.into(),
            job_id: job_id.into(),
        }
    }

    pub fn authenticated(user: Option<User>, job_id: Option<String>) -> Self {
        ParticipantSource::Authenticated { user, job_id }
    }

    /// Resolve to a usable pair; blank ids count as missing.
    pub fn resolve(&self) -> Result<Participants, DomainError> {
        let (user_id, job_id) = match self {
            ParticipantSource::Fixed { user_id, job_id } => {
                (Some(user_id.as_str()), Some(job_id.as_str()))
            }
            ParticipantSource::Authenticated { user, job_id } => {
                (user.as_ref().map(|u| u.id.as_str()), job_id.as_deref())
            }
        };

        match (
            user_id.filter(|s| !s.trim().is_empty()),
            job_id.filter(|s| !s.trim().is_empty()),
        ) {
            (Some(user_id), Some(job_id)) => Ok(Participants {
                user_id: user_id.to_string(),
                job_id: job_id.to_string(),
            }),
            _ => Err(DomainError::MissingParticipants),
        }
    }
}
