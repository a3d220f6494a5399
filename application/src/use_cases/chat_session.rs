//! Conversation session state machine.
//!
//! [`ChatSession`] owns everything one chat screen mutates: connection status,
//! the conversation id, the turn history and the stream buffer. Transport
//! events are fed in one at a time through [`ChatSession::handle_event`];
//! every UI-visible change is published as a [`ChatEvent`].
//!
//! ```text
//! Connecting ──opened──▶ Connected ──closed──▶ Disconnected
//!      │                     │  ▲                    │
//!      └──error──▶ Errored ◀─┘  └──────opened────────┘
//! ```
//!
//! The `start_conversation` handshake is sent on the first `opened` only.

use crate::ports::chat_event::ChatEvent;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::transport::{FrameSink, TransportEvent};
use screening_domain::{
    ChatTurn, ClientIntent, CompletionNotice, ConversationSession, IdGenerator, Participants,
    ServerFrame, TurnAssembler, UserText, decode_frame, encode_intent,
};
use serde_json::json;
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Error shown when a transport failure occurs
pub const CONNECTION_ERROR: &str = "Connection error";
/// Error shown when a frame cannot be decoded
pub const PARSE_ERROR: &str = "Failed to parse server message";

/// Why a user operation was not carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    EmptyText,
    NoConversation,
    NoTransport,
    ConversationEnded,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            IgnoreReason::EmptyText => "message is empty",
            IgnoreReason::NoConversation => "no conversation yet",
            IgnoreReason::NoTransport => "no open connection",
            IgnoreReason::ConversationEnded => "conversation has ended",
        };
        f.write_str(text)
    }
}

/// Result of a user operation
///
/// `Ignored` marks a precondition the input surface should have prevented;
/// it is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Sent,
    Ignored(IgnoreReason),
}

/// Read model for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSnapshot {
    pub session: ConversationSession,
    pub turns: Vec<ChatTurn>,
    pub pending: String,
    pub conversation_ended: bool,
}

/// One screening conversation
pub struct ChatSession {
    participants: Participants,
    ids: IdGenerator,
    state: ConversationSession,
    assembler: TurnAssembler,
    turns: Vec<ChatTurn>,
    /// One-shot guard for the start handshake
    has_started: bool,
    sink: Option<Arc<dyn FrameSink>>,
    tx: mpsc::UnboundedSender<ChatEvent>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl ChatSession {
    pub fn new(participants: Participants, tx: mpsc::UnboundedSender<ChatEvent>) -> Self {
        let ids = IdGenerator::new();
        Self {
            participants,
            ids,
            state: ConversationSession::new(),
            assembler: TurnAssembler::new(ids),
            turns: Vec::new(),
            has_started: false,
            sink: None,
            tx,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Attach the write half of the connection
    pub fn attach(&mut self, sink: Arc<dyn FrameSink>) {
        self.sink = Some(sink);
    }

    pub fn participants(&self) -> &Participants {
        &self.participants
    }

    pub fn session(&self) -> &ConversationSession {
        &self.state
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.state.conversation_id()
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn is_conversation_ended(&self) -> bool {
        self.state.is_conversation_ended()
    }

    pub fn snapshot(&self) -> ChatSnapshot {
        ChatSnapshot {
            session: self.state.clone(),
            turns: self.turns.clone(),
            pending: self.assembler.pending().to_string(),
            conversation_ended: self.state.is_conversation_ended(),
        }
    }

    /// Consume the session, keeping the history and final state
    pub fn into_parts(self) -> (Vec<ChatTurn>, ConversationSession) {
        (self.turns, self.state)
    }

    /// Apply one transport event.
    ///
    /// Returns the completion metadata when a `status_update` reports a
    /// screening decision; the caller decides how to hand it off.
    pub fn handle_event(&mut self, event: TransportEvent) -> Option<CompletionNotice> {
        match event {
            TransportEvent::Opened => {
                self.on_opened();
                None
            }
            TransportEvent::FrameReceived(raw) => match decode_frame(&raw) {
                Ok(frame) => self.handle_frame(frame),
                Err(e) => {
                    warn!("Dropping undecodable frame: {}", e);
                    self.conversation_logger.log(ConversationEvent::new(
                        "decode_failed",
                        json!({
                            "error": e.to_string(),
                            "raw": e.raw(),
                        }),
                    ));
                    self.state.record_error(PARSE_ERROR);
                    self.emit(ChatEvent::Error(PARSE_ERROR.to_string()));
                    None
                }
            },
            TransportEvent::TransportError { message, terminal } => {
                warn!("Transport error (terminal: {}): {}", terminal, message);
                if terminal {
                    self.state.mark_gave_up(CONNECTION_ERROR);
                } else {
                    self.state.mark_errored(CONNECTION_ERROR);
                }
                self.status_changed();
                self.emit(ChatEvent::Error(CONNECTION_ERROR.to_string()));
                None
            }
            TransportEvent::Closed => {
                self.state.mark_closed();
                self.status_changed();
                None
            }
        }
    }

    /// Apply one decoded server frame
    pub fn handle_frame(&mut self, frame: ServerFrame) -> Option<CompletionNotice> {
        if let Some(id) = frame.conversation_id()
            && self.state.capture_conversation_id(id)
        {
            info!("Conversation {} started", id);
            self.emit(ChatEvent::ConversationAssigned(id.to_string()));
        }

        if let ServerFrame::StatusUpdate {
            status: Some(status),
            ..
        } = &frame
        {
            debug!("Server status: {}", status);
        }

        let effect = self.assembler.apply(&frame);

        for turn in effect.turns {
            self.append_turn(turn);
        }

        if let Some(streaming) = effect.streaming {
            self.set_streaming(streaming);
        }

        if let Some(message) = effect.error {
            self.state.mark_errored(message.clone());
            self.status_changed();
            self.emit(ChatEvent::Error(message));
        }

        if effect.conversation_ended && self.state.mark_conversation_ended() {
            self.emit(ChatEvent::ConversationEnded);
        }

        effect.completion
    }

    /// Send the applicant's reply.
    ///
    /// The user turn is appended before the frame is transmitted. Nothing
    /// is sent once the server has ended the conversation.
    pub fn send_user_message(&mut self, text: &str) -> SendOutcome {
        let Some(text) = UserText::try_new(text) else {
            return self.ignored(IgnoreReason::EmptyText);
        };
        if self.state.is_conversation_ended() {
            return self.ignored(IgnoreReason::ConversationEnded);
        }
        let Some(conversation_id) = self.state.conversation_id().map(str::to_string) else {
            return self.ignored(IgnoreReason::NoConversation);
        };
        if !self.has_open_sink() {
            return self.ignored(IgnoreReason::NoTransport);
        }

        let turn = ChatTurn::user(&self.ids, text.content());
        self.append_turn(turn);
        self.assembler.reset();
        self.set_streaming(true);
        self.transmit(&ClientIntent::send_message(
            conversation_id,
            text.into_content(),
        ));
        SendOutcome::Sent
    }

    /// Ask the server to pause the conversation.
    ///
    /// Local status is left alone; the server's reply decides what happens.
    pub fn end_conversation(&mut self) -> SendOutcome {
        if self.state.is_conversation_ended() {
            return self.ignored(IgnoreReason::ConversationEnded);
        }
        let Some(conversation_id) = self.state.conversation_id().map(str::to_string) else {
            return self.ignored(IgnoreReason::NoConversation);
        };
        if !self.has_open_sink() {
            return self.ignored(IgnoreReason::NoTransport);
        }
        self.transmit(&ClientIntent::pause(conversation_id));
        SendOutcome::Sent
    }

    fn on_opened(&mut self) {
        self.state.mark_opened();
        self.status_changed();

        if self.has_started {
            debug!("Reconnected; start handshake already sent");
            return;
        }
        self.has_started = true;

        let intent = ClientIntent::start(
            self.participants.user_id.clone(),
            self.participants.job_id.clone(),
        );
        self.transmit(&intent);
        self.set_streaming(true);
    }

    fn append_turn(&mut self, turn: ChatTurn) {
        self.conversation_logger.log(ConversationEvent::new(
            "turn_appended",
            json!({
                "id": turn.id().as_str(),
                "author": turn.author(),
                "text": turn.text(),
            }),
        ));
        self.turns.push(turn.clone());
        self.emit(ChatEvent::TurnAppended(turn));
    }

    fn set_streaming(&mut self, streaming: bool) {
        if self.state.is_streaming_reply() == streaming {
            return;
        }
        self.state.set_streaming(streaming);
        self.emit(ChatEvent::StreamingChanged(streaming));
    }

    fn status_changed(&mut self) {
        let status = self.state.status();
        self.conversation_logger.log(ConversationEvent::new(
            "status_changed",
            json!({
                "status": status.as_str(),
                "conversation_id": self.state.conversation_id(),
                "error": self.state.last_error(),
            }),
        ));
        self.emit(ChatEvent::StatusChanged(status));
    }

    fn transmit(&self, intent: &ClientIntent) {
        let Some(sink) = &self.sink else {
            debug!("No transport attached; dropping {}", intent.kind());
            return;
        };
        let raw = match encode_intent(intent) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("{}", e);
                return;
            }
        };
        if let Err(e) = sink.send(raw) {
            warn!("Failed to send {}: {}", intent.kind(), e);
        }
    }

    fn has_open_sink(&self) -> bool {
        self.sink.as_ref().is_some_and(|sink| !sink.is_closed())
    }

    fn ignored(&self, reason: IgnoreReason) -> SendOutcome {
        debug!("Ignoring user action: {}", reason);
        SendOutcome::Ignored(reason)
    }

    fn emit(&self, event: ChatEvent) {
        let _ = self.tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::transport::TransportError;
    use screening_domain::{Author, ConnectionStatus, ScreeningDecision};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    // ==================== Mock Implementations ====================

    #[derive(Default)]
    struct MockSink {
        sent: Mutex<Vec<String>>,
        closed: AtomicBool,
    }

    impl MockSink {
        fn sent(&self) -> Vec<serde_json::Value> {
            self.sent
                .lock()
                .unwrap()
                .iter()
                .map(|raw| serde_json::from_str(raw).unwrap())
                .collect()
        }

        fn sent_types(&self) -> Vec<String> {
            self.sent()
                .iter()
                .map(|v| v["type"].as_str().unwrap().to_string())
                .collect()
        }
    }

    impl FrameSink for MockSink {
        fn send(&self, raw: String) -> Result<(), TransportError> {
            if self.is_closed() {
                return Err(TransportError::Closed);
            }
            self.sent.lock().unwrap().push(raw);
            Ok(())
        }

        fn close(&self) {
            self.closed.store(true, Ordering::SeqCst);
        }

        fn is_closed(&self) -> bool {
            self.closed.load(Ordering::SeqCst)
        }
    }

    #[derive(Default)]
    struct MockLogger {
        events: Mutex<Vec<&'static str>>,
    }

    impl ConversationLogger for MockLogger {
        fn log(&self, event: ConversationEvent) {
            self.events.lock().unwrap().push(event.event_type);
        }
    }

    // ==================== Helpers ====================

    fn participants() -> Participants {
        Participants {
            user_id: "u-1".to_string(),
            job_id: "job-1".to_string(),
        }
    }

    fn session_with_sink() -> (ChatSession, Arc<MockSink>, mpsc::UnboundedReceiver<ChatEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink = Arc::new(MockSink::default());
        let mut session = ChatSession::new(participants(), tx);
        session.attach(sink.clone());
        (session, sink, rx)
    }

    fn frame(value: serde_json::Value) -> TransportEvent {
        TransportEvent::FrameReceived(value.to_string())
    }

    /// Open the connection and receive the greeting that assigns `conv-1`.
    fn start(session: &mut ChatSession) {
        session.handle_event(TransportEvent::Opened);
        session.handle_event(frame(json!({
            "type": "greeting",
            "conversationId": "conv-1",
            "message": "Hi, "
        })));
        session.handle_event(frame(json!({"type": "greeting", "message": "welcome!"})));
        session.handle_event(frame(json!({"type": "status_update", "conversationId": "conv-1"})));
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<ChatEvent>) -> Vec<ChatEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    // ==================== Tests ====================

    #[test]
    fn opened_sends_start_once_and_awaits_greeting() {
        let (mut session, sink, mut rx) = session_with_sink();

        session.handle_event(TransportEvent::Opened);

        assert_eq!(session.session().status(), ConnectionStatus::Connected);
        assert!(session.session().is_streaming_reply());
        let sent = sink.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0],
            json!({"type": "start_conversation", "userId": "u-1", "jobId": "job-1"})
        );
        assert_eq!(
            drain(&mut rx),
            vec![
                ChatEvent::StatusChanged(ConnectionStatus::Connected),
                ChatEvent::StreamingChanged(true),
            ]
        );
    }

    #[test]
    fn reconnect_does_not_resend_start() {
        let (mut session, sink, _rx) = session_with_sink();

        session.handle_event(TransportEvent::Opened);
        session.handle_event(TransportEvent::Closed);
        assert_eq!(session.session().status(), ConnectionStatus::Disconnected);
        session.handle_event(TransportEvent::Opened);

        assert_eq!(session.session().status(), ConnectionStatus::Connected);
        assert_eq!(sink.sent_types(), vec!["start_conversation"]);
    }

    #[test]
    fn fragments_become_one_turn_at_status_update() {
        let (mut session, _sink, _rx) = session_with_sink();
        session.handle_event(TransportEvent::Opened);

        session.handle_event(frame(json!({"type": "message", "message": "Hel"})));
        session.handle_event(frame(json!({"type": "message", "message": "lo"})));
        assert!(session.turns().is_empty());
        assert_eq!(session.snapshot().pending, "Hello");

        session.handle_event(frame(json!({"type": "status_update"})));

        assert_eq!(session.turns().len(), 1);
        assert_eq!(session.turns()[0].text(), "Hello");
        assert_eq!(session.turns()[0].author(), Author::Bot);
        assert!(!session.session().is_streaming_reply());
    }

    #[test]
    fn status_update_without_fragments_creates_no_turn() {
        let (mut session, _sink, _rx) = session_with_sink();
        session.handle_event(TransportEvent::Opened);
        session.handle_event(frame(json!({"type": "status_update"})));
        assert!(session.turns().is_empty());
    }

    #[test]
    fn conversation_id_is_captured_once() {
        let (mut session, _sink, mut rx) = session_with_sink();
        start(&mut session);
        session.handle_event(frame(json!({
            "type": "message",
            "conversationId": "conv-2",
            "message": "x"
        })));

        assert_eq!(session.conversation_id(), Some("conv-1"));
        let assigned: Vec<_> = drain(&mut rx)
            .into_iter()
            .filter(|e| matches!(e, ChatEvent::ConversationAssigned(_)))
            .collect();
        assert_eq!(assigned, vec![ChatEvent::ConversationAssigned("conv-1".to_string())]);
    }

    #[test]
    fn blank_or_early_messages_are_ignored() {
        let (mut session, sink, _rx) = session_with_sink();
        session.handle_event(TransportEvent::Opened);

        assert_eq!(
            session.send_user_message("hello"),
            SendOutcome::Ignored(IgnoreReason::NoConversation)
        );

        start(&mut session);
        let before = session.turns().len();
        assert_eq!(
            session.send_user_message(""),
            SendOutcome::Ignored(IgnoreReason::EmptyText)
        );
        assert_eq!(
            session.send_user_message("   "),
            SendOutcome::Ignored(IgnoreReason::EmptyText)
        );

        assert_eq!(session.turns().len(), before);
        assert_eq!(sink.sent_types(), vec!["start_conversation"]);
    }

    #[test]
    fn send_without_transport_is_ignored() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut session = ChatSession::new(participants(), tx);
        session.handle_frame(ServerFrame::Greeting {
            conversation_id: Some("conv-1".to_string()),
            message: None,
        });
        assert_eq!(
            session.send_user_message("hello"),
            SendOutcome::Ignored(IgnoreReason::NoTransport)
        );
        assert!(session.turns().is_empty());
    }

    #[test]
    fn send_appends_trimmed_user_turn_and_transmits() {
        let (mut session, sink, _rx) = session_with_sink();
        start(&mut session);

        let outcome = session.send_user_message("  I have five years of Rust  ");

        assert_eq!(outcome, SendOutcome::Sent);
        let last = session.turns().last().unwrap();
        assert!(last.is_user_authored());
        assert_eq!(last.text(), "I have five years of Rust");
        assert!(session.session().is_streaming_reply());
        assert_eq!(
            sink.sent().last().unwrap(),
            &json!({
                "type": "send_message",
                "conversationId": "conv-1",
                "message": "I have five years of Rust"
            })
        );
    }

    #[test]
    fn send_clears_partial_reply() {
        let (mut session, _sink, _rx) = session_with_sink();
        start(&mut session);
        session.handle_event(frame(json!({"type": "message", "message": "stale"})));

        session.send_user_message("next");
        session.handle_event(frame(json!({"type": "message", "message": "fresh"})));
        session.handle_event(frame(json!({"type": "status_update"})));

        assert_eq!(session.turns().last().unwrap().text(), "fresh");
    }

    #[test]
    fn conversation_end_flushes_then_appends_closing_turn() {
        let (mut session, _sink, mut rx) = session_with_sink();
        start(&mut session);
        let before = session.turns().len();

        session.handle_event(frame(json!({"type": "message", "message": "Thanks"})));
        session.handle_event(frame(json!({"type": "conversation_end", "message": "Goodbye"})));

        let new_turns: Vec<&str> = session.turns()[before..].iter().map(|t| t.text()).collect();
        assert_eq!(new_turns, vec!["Thanks", "Goodbye"]);
        assert_eq!(session.turns().last().unwrap().id().prefix(), "end");
        assert!(session.is_conversation_ended());
        assert!(drain(&mut rx).contains(&ChatEvent::ConversationEnded));
    }

    #[test]
    fn nothing_is_sent_after_conversation_end() {
        let (mut session, sink, mut rx) = session_with_sink();
        start(&mut session);
        session.handle_event(frame(json!({"type": "conversation_end", "message": "Goodbye"})));
        let frames_before = sink.sent().len();
        let turns_before = session.turns().len();
        drain(&mut rx);

        assert_eq!(
            session.send_user_message("one more thing"),
            SendOutcome::Ignored(IgnoreReason::ConversationEnded)
        );
        assert_eq!(
            session.end_conversation(),
            SendOutcome::Ignored(IgnoreReason::ConversationEnded)
        );

        assert_eq!(sink.sent().len(), frames_before);
        assert_eq!(session.turns().len(), turns_before);
        assert!(!session.session().is_streaming_reply());
        assert!(drain(&mut rx).is_empty());

        let snapshot = session.snapshot();
        assert!(snapshot.conversation_ended);
        assert!(!snapshot.session.is_input_enabled());
        assert_eq!(snapshot.session.status(), ConnectionStatus::Connected);
    }

    #[test]
    fn error_frame_discards_buffer_and_marks_errored() {
        let (mut session, _sink, _rx) = session_with_sink();
        start(&mut session);
        let before = session.turns().len();

        session.handle_event(frame(json!({"type": "message", "message": "partial"})));
        session.handle_event(frame(json!({"type": "error", "error": "boom"})));

        assert_eq!(session.turns().len(), before);
        assert_eq!(session.snapshot().pending, "");
        assert_eq!(session.session().last_error(), Some("boom"));
        assert_eq!(session.session().status(), ConnectionStatus::Errored);
        assert!(!session.session().is_streaming_reply());
    }

    #[test]
    fn error_frame_without_text_uses_default_message() {
        let (mut session, _sink, _rx) = session_with_sink();
        start(&mut session);
        session.handle_event(frame(json!({"type": "error"})));
        assert_eq!(session.session().last_error(), Some("Unknown error"));
    }

    #[test]
    fn undecodable_frame_records_error_only() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let logger = Arc::new(MockLogger::default());
        let sink = Arc::new(MockSink::default());
        let mut session =
            ChatSession::new(participants(), tx).with_conversation_logger(logger.clone());
        session.attach(sink);
        start(&mut session);
        session.handle_event(frame(json!({"type": "message", "message": "keep"})));
        let turns_before = session.turns().len();
        drain(&mut rx);

        session.handle_event(TransportEvent::FrameReceived("{not json".to_string()));
        session.handle_event(frame(json!({"type": "mystery"})));

        assert_eq!(session.turns().len(), turns_before);
        assert_eq!(session.snapshot().pending, "keep");
        assert_eq!(session.session().status(), ConnectionStatus::Connected);
        assert_eq!(session.session().last_error(), Some(PARSE_ERROR));
        assert_eq!(
            drain(&mut rx),
            vec![
                ChatEvent::Error(PARSE_ERROR.to_string()),
                ChatEvent::Error(PARSE_ERROR.to_string()),
            ]
        );
        let logged = logger.events.lock().unwrap();
        assert_eq!(logged.iter().filter(|e| **e == "decode_failed").count(), 2);
    }

    #[test]
    fn transport_error_marks_errored_without_closing() {
        let (mut session, sink, _rx) = session_with_sink();
        start(&mut session);

        session.handle_event(TransportEvent::TransportError {
            message: "connection reset".to_string(),
            terminal: false,
        });

        assert_eq!(session.session().status(), ConnectionStatus::Errored);
        assert_eq!(session.session().last_error(), Some(CONNECTION_ERROR));
        assert!(!sink.is_closed());
        assert!(!session.session().is_input_enabled());
    }

    #[test]
    fn giving_up_stays_errored_after_close() {
        let (mut session, _sink, mut rx) = session_with_sink();
        start(&mut session);
        drain(&mut rx);

        session.handle_event(TransportEvent::TransportError {
            message: "retries exhausted".to_string(),
            terminal: true,
        });
        session.handle_event(TransportEvent::Closed);

        assert_eq!(session.session().status(), ConnectionStatus::Errored);
        assert_eq!(session.session().last_error(), Some(CONNECTION_ERROR));
        assert!(!session.session().is_input_enabled());
        let statuses: Vec<ConnectionStatus> = drain(&mut rx)
            .into_iter()
            .filter_map(|event| match event {
                ChatEvent::StatusChanged(status) => Some(status),
                _ => None,
            })
            .collect();
        assert_eq!(
            statuses,
            vec![ConnectionStatus::Errored, ConnectionStatus::Errored]
        );
    }

    #[test]
    fn non_terminal_error_then_close_is_disconnected() {
        let (mut session, _sink, _rx) = session_with_sink();
        start(&mut session);
        session.handle_event(TransportEvent::TransportError {
            message: "reset".to_string(),
            terminal: false,
        });
        session.handle_event(TransportEvent::Closed);
        assert_eq!(session.session().status(), ConnectionStatus::Disconnected);
    }

    #[test]
    fn reopening_clears_the_error() {
        let (mut session, _sink, _rx) = session_with_sink();
        start(&mut session);
        session.handle_event(TransportEvent::TransportError {
            message: "reset".to_string(),
            terminal: false,
        });
        session.handle_event(TransportEvent::Opened);

        assert_eq!(session.session().status(), ConnectionStatus::Connected);
        assert!(session.session().last_error().is_none());
        assert!(session.session().is_input_enabled());
    }

    #[test]
    fn end_conversation_sends_pause_without_changing_status() {
        let (mut session, sink, _rx) = session_with_sink();
        session.handle_event(TransportEvent::Opened);
        assert_eq!(
            session.end_conversation(),
            SendOutcome::Ignored(IgnoreReason::NoConversation)
        );

        start(&mut session);
        assert_eq!(session.end_conversation(), SendOutcome::Sent);

        assert_eq!(session.session().status(), ConnectionStatus::Connected);
        assert_eq!(
            sink.sent().last().unwrap(),
            &json!({"type": "pause_conversation", "conversationId": "conv-1"})
        );
    }

    #[test]
    fn completing_status_update_reports_decision() {
        let (mut session, _sink, _rx) = session_with_sink();
        start(&mut session);

        let notice = session.handle_event(frame(json!({
            "type": "status_update",
            "conversationComplete": true,
            "screeningDecision": "APPROVED",
            "screeningSummary": "Strong systems background"
        })));

        let notice = notice.unwrap();
        assert_eq!(notice.decision, ScreeningDecision::Approved);
        assert_eq!(notice.summary.as_deref(), Some("Strong systems background"));
    }

    #[test]
    fn input_is_enabled_only_when_connected_with_conversation() {
        let (mut session, _sink, _rx) = session_with_sink();
        assert!(!session.snapshot().session.is_input_enabled());
        session.handle_event(TransportEvent::Opened);
        assert!(!session.snapshot().session.is_input_enabled());
        start(&mut session);
        assert!(session.snapshot().session.is_input_enabled());
        session.handle_event(TransportEvent::Closed);
        assert!(!session.snapshot().session.is_input_enabled());
    }

    #[test]
    fn transcript_events_are_logged() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let logger = Arc::new(MockLogger::default());
        let mut session =
            ChatSession::new(participants(), tx).with_conversation_logger(logger.clone());
        session.attach(Arc::new(MockSink::default()));
        start(&mut session);

        let logged = logger.events.lock().unwrap();
        assert_eq!(*logged, vec!["status_changed", "turn_appended"]);
    }
}
