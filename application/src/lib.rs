//! Application layer for screening-client
//!
//! This crate contains use cases and port definitions.
//! It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    chat_event::ChatEvent,
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    screening_api::{ApiError, ScreeningApi},
    transport::{
        ChatConnection, ChatConnector, FrameSink, ReconnectPolicy, TransportError,
        TransportEvent,
    },
};
pub use use_cases::chat_session::{ChatSession, ChatSnapshot, IgnoreReason, SendOutcome};
pub use use_cases::handoff::HandoffCoordinator;
pub use use_cases::review_application::ReviewApplicationUseCase;
pub use use_cases::run_chat::{
    ChatCommand, ChatRunOutput, RunChatError, RunChatInput, RunChatUseCase,
};
