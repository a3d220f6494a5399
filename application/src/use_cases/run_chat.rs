//! Run Chat use case
//!
//! Wires one screening conversation end to end: resolves who is chatting,
//! opens the transport, then drives a [`ChatSession`] from transport events
//! and user commands until the user leaves or the connection gives up.

use crate::ports::chat_event::ChatEvent;
use crate::ports::conversation_logger::{ConversationLogger, NoConversationLogger};
use crate::ports::screening_api::ScreeningApi;
use crate::ports::transport::{ChatConnector, TransportError, TransportEvent};
use crate::use_cases::chat_session::{ChatSession, SendOutcome};
use crate::use_cases::handoff::HandoffCoordinator;
use screening_domain::{
    ChatTurn, ConversationSession, DomainError, ParticipantSource, ScreeningOutcome,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Pause between deleting an old application and reconnecting
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(500);
/// How long teardown waits for an in-flight hand-off before dropping it
pub const DEFAULT_HANDOFF_GRACE: Duration = Duration::from_secs(2);

/// Errors that prevent a chat from starting
#[derive(Error, Debug)]
pub enum RunChatError {
    #[error(transparent)]
    Participants(#[from] DomainError),

    #[error("Failed to connect: {0}")]
    Connect(#[from] TransportError),
}

/// Input for one chat run
#[derive(Debug, Clone)]
pub struct RunChatInput {
    pub source: ParticipantSource,
    pub endpoint: String,
    /// Existing application to delete before starting over
    pub replace_application: Option<String>,
}

impl RunChatInput {
    pub fn new(source: ParticipantSource, endpoint: impl Into<String>) -> Self {
        Self {
            source,
            endpoint: endpoint.into(),
            replace_application: None,
        }
    }

    pub fn replacing(mut self, application_id: impl Into<String>) -> Self {
        self.replace_application = Some(application_id.into());
        self
    }
}

/// What the user asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Send(String),
    /// Ask the server to pause the conversation
    End,
    /// Leave the chat
    Quit,
}

/// Final state of a chat run
#[derive(Debug, Clone)]
pub struct ChatRunOutput {
    pub turns: Vec<ChatTurn>,
    pub session: ConversationSession,
    pub outcome: Option<ScreeningOutcome>,
}

/// Use case for running one screening chat
pub struct RunChatUseCase<C: ChatConnector + 'static, A: ScreeningApi + 'static> {
    connector: Arc<C>,
    api: Arc<A>,
    settle_delay: Duration,
    handoff_grace: Duration,
    conversation_logger: Arc<dyn ConversationLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl<C: ChatConnector + 'static, A: ScreeningApi + 'static> RunChatUseCase<C, A> {
    pub fn new(connector: Arc<C>, api: Arc<A>) -> Self {
        Self {
            connector,
            api,
            settle_delay: DEFAULT_SETTLE_DELAY,
            handoff_grace: DEFAULT_HANDOFF_GRACE,
            conversation_logger: Arc::new(NoConversationLogger),
            cancellation_token: None,
        }
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Bound the teardown wait for a hand-off that is still fetching
    pub fn with_handoff_grace(mut self, grace: Duration) -> Self {
        self.handoff_grace = grace;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Set a cancellation token for graceful shutdown
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Run the chat until the user quits or the connection is lost for good.
    ///
    /// The connection is closed on every exit path.
    pub async fn execute(
        &self,
        input: RunChatInput,
        mut commands: mpsc::UnboundedReceiver<ChatCommand>,
        tx: mpsc::UnboundedSender<ChatEvent>,
    ) -> Result<ChatRunOutput, RunChatError> {
        let participants = match input.source.resolve() {
            Ok(p) => p,
            Err(e) => {
                let _ = tx.send(ChatEvent::Error(e.to_string()));
                return Err(e.into());
            }
        };

        if let Some(application_id) = &input.replace_application {
            self.discard_application(application_id).await;
        }

        info!(
            "Starting screening chat for user {} on job {}",
            participants.user_id, participants.job_id
        );
        let mut connection = self.connector.connect(&input.endpoint)?;

        let mut session = ChatSession::new(participants.clone(), tx.clone())
            .with_conversation_logger(self.conversation_logger.clone());
        session.attach(connection.sink.clone());

        let (outcome_tx, outcome_rx) = oneshot::channel();
        let mut coordinator =
            HandoffCoordinator::new(self.api.clone(), participants, outcome_tx, tx)
                .with_conversation_logger(self.conversation_logger.clone());

        let cancel = self.cancellation_token.clone().unwrap_or_default();
        let mut gave_up = false;

        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    info!("Chat cancelled");
                    break;
                }

                event = connection.events.recv() => {
                    let Some(event) = event else {
                        debug!("Transport event stream ended");
                        break;
                    };
                    gave_up |= event.is_terminal_error();
                    let closed = event == TransportEvent::Closed;

                    if let Some(notice) = session.handle_event(event) {
                        coordinator.trigger(notice, session.conversation_id());
                    }

                    if closed && gave_up {
                        warn!("Connection lost; giving up");
                        break;
                    }
                }

                command = commands.recv() => match command {
                    None | Some(ChatCommand::Quit) => break,
                    Some(ChatCommand::Send(text)) => {
                        if let SendOutcome::Ignored(reason) = session.send_user_message(&text) {
                            debug!("Message not sent: {}", reason);
                        }
                    }
                    Some(ChatCommand::End) => {
                        if let SendOutcome::Ignored(reason) = session.end_conversation() {
                            debug!("End request not sent: {}", reason);
                        }
                    }
                },
            }
        }

        connection.sink.close();

        let outcome = if coordinator.is_spent() {
            self.collect_outcome(outcome_rx, &cancel).await
        } else {
            None
        };

        let (turns, session) = session.into_parts();
        Ok(ChatRunOutput {
            turns,
            session,
            outcome,
        })
    }

    /// Pick up the hand-off result if it lands within the grace period.
    ///
    /// Cancellation skips the wait. The hand-off task keeps running either
    /// way; its result is simply dropped.
    async fn collect_outcome(
        &self,
        mut outcome_rx: oneshot::Receiver<ScreeningOutcome>,
        cancel: &CancellationToken,
    ) -> Option<ScreeningOutcome> {
        tokio::select! {
            biased;

            result = &mut outcome_rx => result.ok(),

            _ = cancel.cancelled() => {
                debug!("Cancelled with the screening outcome still pending");
                None
            }

            _ = tokio::time::sleep(self.handoff_grace) => {
                warn!(
                    "Screening outcome still pending after {:?}; not waiting for it",
                    self.handoff_grace
                );
                None
            }
        }
    }

    /// Delete an earlier application for the same job, ignoring failures
    async fn discard_application(&self, application_id: &str) {
        match self.api.delete_application(application_id).await {
            Ok(()) => info!("Deleted previous application {}", application_id),
            Err(e) => warn!(
                "Could not delete previous application {}: {}",
                application_id, e
            ),
        }
        tokio::time::sleep(self.settle_delay).await;
    }
}
