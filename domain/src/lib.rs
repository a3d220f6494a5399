//! Domain layer for screening-client
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Conversation
//!
//! A screening conversation is a stream of server frames that the client
//! turns into discrete chat turns:
//!
//! - **Fragments** (`greeting` / `message` frames) accumulate in a stream buffer
//! - **Turn boundaries** (`status_update` / `conversation_end`) flush the buffer
//!   into an immutable [`ChatTurn`]
//! - **Errors** (`error` frames) discard the in-flight buffer
//!
//! ## Screening
//!
//! When the remote agent reaches a decision, the session produces a single
//! [`ScreeningOutcome`] that is handed off to the results view.

pub mod applicant;
pub mod conversation;
pub mod core;
pub mod protocol;
pub mod screening;

// Re-export commonly used types
pub use applicant::entities::{
    ApplicationStatus, Job, JobApplication, LoginRequest, SignupRequest, User,
};
pub use conversation::{
    entities::{Author, ChatTurn},
    participants::{ParticipantSource, Participants},
    status::{ConnectionStatus, ConversationSession},
    stream::{AssemblyEffect, TurnAssembler},
};
pub use core::{
    error::DomainError,
    id::{IdGenerator, TurnId},
    user_text::UserText,
};
pub use protocol::{
    codec::{DecodeError, EncodeError, decode_frame, encode_intent},
    frame::{CompletionNotice, ServerFrame},
    intent::ClientIntent,
};
pub use screening::{
    decision::ScreeningDecision,
    outcome::{ScreeningOutcome, StoredConversation, TranscriptDownload},
};
