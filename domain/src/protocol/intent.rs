//! Client → server intents

use serde::{Deserialize, Serialize};

/// A frame the client sends to the screening agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ClientIntent {
    /// Implicit handshake sent once after the first `opened` event
    StartConversation { user_id: String, job_id: String },
    /// Applicant reply
    SendMessage {
        conversation_id: String,
        message: String,
    },
    /// Applicant leaves the conversation; the server decides what happens next
    PauseConversation { conversation_id: String },
    ContinueConversation { conversation_id: String },
    EndConversation { conversation_id: String },
}

impl ClientIntent {
    pub fn start(user_id: impl Into<String>, job_id: impl Into<String>) -> Self {
        ClientIntent::StartConversation {
            user_id: user_id.into(),
            job_id: job_id.into(),
        }
    }

    pub fn send_message(conversation_id: impl Into<String>, message: impl Into<String>) -> Self {
        ClientIntent::SendMessage {
            conversation_id: conversation_id.into(),
            message: message.into(),
        }
    }

    pub fn pause(conversation_id: impl Into<String>) -> Self {
        ClientIntent::PauseConversation {
            conversation_id: conversation_id.into(),
        }
    }

    /// Wire name of the intent (`start_conversation`, ...)
    pub fn kind(&self) -> &'static str {
        match self {
            ClientIntent::StartConversation { .. } => "start_conversation",
            ClientIntent::SendMessage { .. } => "send_message",
            ClientIntent::PauseConversation { .. } => "pause_conversation",
            ClientIntent::ContinueConversation { .. } => "continue_conversation",
            ClientIntent::EndConversation { .. } => "end_conversation",
        }
    }
}
