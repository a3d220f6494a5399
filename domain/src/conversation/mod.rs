//! Screening conversation domain.
//!
//! - [`entities::ChatTurn`]: one complete, user-visible chat message
//! - [`status::ConversationSession`]: connection status and conversation identity
//! - [`stream::TurnAssembler`]: fragment buffering and turn boundaries
//! - [`participants::ParticipantSource`]: where `{user_id, job_id}` come from

pub mod entities;
pub mod participants;
pub mod status;
pub mod stream;
