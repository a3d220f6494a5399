//! Server → client frames

use crate::screening::decision::ScreeningDecision;
use serde::{Deserialize, Serialize};

/// A decoded frame from the screening agent
///
/// `greeting` and `message` carry one incremental fragment of a reply;
/// `status_update` ends the reply; `conversation_end` ends the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ServerFrame {
    Greeting {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        conversation_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Message {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        conversation_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    StatusUpdate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        conversation_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        conversation_complete: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        screening_decision: Option<ScreeningDecision>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        screening_summary: Option<String>,
    },
    Error {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        conversation_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    ConversationEnd {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        conversation_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

/// Completion metadata of a `status_update` that carries a decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionNotice {
    pub decision: ScreeningDecision,
    pub summary: Option<String>,
}

impl ServerFrame {
    /// Wire names of every frame kind the client understands
    pub const KINDS: [&'static str; 5] = [
        "greeting",
        "message",
        "status_update",
        "error",
        "conversation_end",
    ];

    pub fn kind(&self) -> &'static str {
        match self {
            ServerFrame::Greeting { .. } => "greeting",
            ServerFrame::Message { .. } => "message",
            ServerFrame::StatusUpdate { .. } => "status_update",
            ServerFrame::Error { .. } => "error",
            ServerFrame::ConversationEnd { .. } => "conversation_end",
        }
    }

    /// Conversation id carried by the frame, if any (empty strings count as absent)
    pub fn conversation_id(&self) -> Option<&str> {
        let id = match self {
            ServerFrame::Greeting { conversation_id, .. }
            | ServerFrame::Message { conversation_id, .. }
            | ServerFrame::StatusUpdate { conversation_id, .. }
            | ServerFrame::Error { conversation_id, .. }
            | ServerFrame::ConversationEnd { conversation_id, .. } => conversation_id.as_deref(),
        };
        id.filter(|s| !s.is_empty())
    }

    /// Text fragment of a `greeting` / `message` frame
    pub fn fragment(&self) -> Option<&str> {
        match self {
            ServerFrame::Greeting { message, .. } | ServerFrame::Message { message, .. } => {
                message.as_deref()
            }
            _ => None,
        }
    }

    /// Error text of an `error` frame, defaulting when the server sent none
    pub fn error_message(&self) -> Option<&str> {
        match self {
            ServerFrame::Error { error, .. } => Some(error.as_deref().unwrap_or("Unknown error")),
            _ => None,
        }
    }

    /// Present only on a `status_update` flagged complete *and* carrying a decision
    pub fn completion(&self) -> Option<CompletionNotice> {
        match self {
            ServerFrame::StatusUpdate {
                conversation_complete: Some(true),
                screening_decision: Some(decision),
                screening_summary,
                ..
            } => Some(CompletionNotice {
                decision: *decision,
                summary: screening_summary.clone(),
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_update(complete: Option<bool>, decision: Option<ScreeningDecision>) -> ServerFrame {
        ServerFrame::StatusUpdate {
            conversation_id: None,
            status: None,
            conversation_complete: complete,
            screening_decision: decision,
            screening_summary: Some("Strong fit".to_string()),
        }
    }

    #[test]
    fn completion_absent_without_flag() {
        assert!(status_update(None, Some(ScreeningDecision::Approved)).completion().is_none());
    }

    #[test]
    fn completion_requires_flag_and_decision() {
        assert!(status_update(Some(true), None).completion().is_none());
        assert!(status_update(Some(false), Some(ScreeningDecision::Approved)).completion().is_none());

        let notice = status_update(Some(true), Some(ScreeningDecision::Denied))
            .completion()
            .unwrap();
        assert_eq!(notice.decision, ScreeningDecision::Denied);
        assert_eq!(notice.summary.as_deref(), Some("Strong fit"));
    }

    #[test]
    fn error_message_defaults() {
        let frame = ServerFrame::Error {
            conversation_id: None,
            error: None,
        };
        assert_eq!(frame.error_message(), Some("Unknown error"));
    }

    #[test]
    fn empty_conversation_id_is_absent() {
        let frame = ServerFrame::Message {
            conversation_id: Some(String::new()),
            message: Some("hi".to_string()),
        };
        assert!(frame.conversation_id().is_none());
        assert_eq!(frame.fragment(), Some("hi"));
    }
}
