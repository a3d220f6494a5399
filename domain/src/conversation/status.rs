//! Connection status and conversation identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of the screening connection
///
/// `Connecting` is only ever the initial state; once the transport has
/// reported anything the status never returns to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    #[default]
    Connecting,
    Connected,
    Disconnected,
    Errored,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Disconnected => "disconnected",
            ConnectionStatus::Errored => "error",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity and status of one screening conversation (Entity)
///
/// Only the session state machine mutates this, through the transition
/// methods below.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationSession {
    conversation_id: Option<String>,
    status: ConnectionStatus,
    is_streaming_reply: bool,
    last_error: Option<String>,
    #[serde(default)]
    gave_up: bool,
    #[serde(default)]
    ended: bool,
}

impl ConversationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn is_streaming_reply(&self) -> bool {
        self.is_streaming_reply
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Reconnection was abandoned; the status stays `Errored` from here on.
    pub fn has_given_up(&self) -> bool {
        self.gave_up
    }

    /// The server ended the conversation; no further turns are taken.
    pub fn is_conversation_ended(&self) -> bool {
        self.ended
    }

    /// Input is accepted only on a live connection with a known conversation
    /// that the server has not ended.
    pub fn is_input_enabled(&self) -> bool {
        self.status == ConnectionStatus::Connected
            && self.conversation_id.is_some()
            && !self.ended
    }

    /// Transport opened. Clears any previous error.
    pub fn mark_opened(&mut self) {
        self.status = ConnectionStatus::Connected;
        self.last_error = None;
        self.gave_up = false;
    }

    /// Transport or protocol error. The connection is left as-is.
    pub fn mark_errored(&mut self, message: impl Into<String>) {
        self.status = ConnectionStatus::Errored;
        self.last_error = Some(message.into());
    }

    /// Reconnection gave up. Unlike [`mark_errored`](Self::mark_errored),
    /// a later close does not downgrade this to `Disconnected`.
    pub fn mark_gave_up(&mut self, message: impl Into<String>) {
        self.mark_errored(message);
        self.gave_up = true;
    }

    pub fn mark_closed(&mut self) {
        if !self.gave_up {
            self.status = ConnectionStatus::Disconnected;
        }
    }

    /// Returns `true` only on the call that ended the conversation.
    pub fn mark_conversation_ended(&mut self) -> bool {
        !std::mem::replace(&mut self.ended, true)
    }

    /// Record an error without touching the status (e.g. an unreadable frame).
    pub fn record_error(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    pub fn set_streaming(&mut self, streaming: bool) {
        self.is_streaming_reply = streaming;
    }

    /// Adopt `id` if no conversation id is known yet.
    ///
    /// Returns `true` only on the call that actually assigned it.
    pub fn capture_conversation_id(&mut self, id: &str) -> bool {
        if self.conversation_id.is_some() || id.is_empty() {
            return false;
        }
        self.conversation_id = Some(id.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_connecting_with_input_disabled() {
        let session = ConversationSession::new();
        assert_eq!(session.status(), ConnectionStatus::Connecting);
        assert!(!session.is_input_enabled());
        assert!(session.conversation_id().is_none());
    }

    #[test]
    fn conversation_id_is_assigned_once() {
        let mut session = ConversationSession::new();
        assert!(session.capture_conversation_id("conv-1"));
        assert!(!session.capture_conversation_id("conv-2"));
        assert_eq!(session.conversation_id(), Some("conv-1"));
    }

    #[test]
    fn empty_conversation_id_is_ignored() {
        let mut session = ConversationSession::new();
        assert!(!session.capture_conversation_id(""));
        assert!(session.conversation_id().is_none());
    }

    #[test]
    fn input_requires_connection_and_conversation() {
        let mut session = ConversationSession::new();
        session.mark_opened();
        assert!(!session.is_input_enabled());
        session.capture_conversation_id("conv-1");
        assert!(session.is_input_enabled());
        session.mark_errored("boom");
        assert!(!session.is_input_enabled());
        assert_eq!(session.last_error(), Some("boom"));
    }

    #[test]
    fn opening_clears_previous_error() {
        let mut session = ConversationSession::new();
        session.mark_errored("Connection error");
        session.mark_opened();
        assert_eq!(session.status(), ConnectionStatus::Connected);
        assert!(session.last_error().is_none());
    }

    #[test]
    fn giving_up_survives_the_following_close() {
        let mut session = ConversationSession::new();
        session.mark_opened();
        session.mark_gave_up("Connection error");
        session.mark_closed();
        assert_eq!(session.status(), ConnectionStatus::Errored);
        assert!(session.has_given_up());
        assert_eq!(session.last_error(), Some("Connection error"));
    }

    #[test]
    fn plain_error_is_replaced_by_close() {
        let mut session = ConversationSession::new();
        session.mark_errored("Connection error");
        session.mark_closed();
        assert_eq!(session.status(), ConnectionStatus::Disconnected);
    }

    #[test]
    fn ended_conversation_disables_input() {
        let mut session = ConversationSession::new();
        session.mark_opened();
        session.capture_conversation_id("conv-1");
        assert!(session.mark_conversation_ended());
        assert!(!session.mark_conversation_ended());
        assert!(session.is_conversation_ended());
        assert!(!session.is_input_enabled());
        assert_eq!(session.status(), ConnectionStatus::Connected);
    }

    #[test]
    fn errored_status_displays_as_error() {
        assert_eq!(ConnectionStatus::Errored.to_string(), "error");
    }
}
