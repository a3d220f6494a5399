//! Result hand-off.
//!
//! When the agent reports a decision, the results view needs the durable
//! application id rather than the conversation id. The coordinator re-fetches
//! the profile on a detached task, picks the application for the active job
//! and delivers one [`ScreeningOutcome`] through a oneshot channel.
//!
//! If the profile cannot be fetched or holds no matching application, the
//! conversation id stands in for the application id. The results endpoint
//! may not resolve that id.

use crate::ports::chat_event::ChatEvent;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::screening_api::ScreeningApi;
use screening_domain::{CompletionNotice, Participants, ScreeningOutcome, User};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Delivers the screening outcome at most once per session
pub struct HandoffCoordinator<A: ScreeningApi + 'static> {
    api: Arc<A>,
    participants: Participants,
    sender: Option<oneshot::Sender<ScreeningOutcome>>,
    tx: mpsc::UnboundedSender<ChatEvent>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl<A: ScreeningApi + 'static> HandoffCoordinator<A> {
    pub fn new(
        api: Arc<A>,
        participants: Participants,
        sender: oneshot::Sender<ScreeningOutcome>,
        tx: mpsc::UnboundedSender<ChatEvent>,
    ) -> Self {
        Self {
            api,
            participants,
            sender: Some(sender),
            tx,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Whether the outcome has already been claimed
    pub fn is_spent(&self) -> bool {
        self.sender.is_none()
    }

    /// Start the hand-off for `notice`.
    ///
    /// Only the first call does anything; later calls return `None`.
    pub fn trigger(
        &mut self,
        notice: CompletionNotice,
        conversation_id: Option<&str>,
    ) -> Option<JoinHandle<()>> {
        let Some(sender) = self.sender.take() else {
            debug!("Screening outcome already handed off; ignoring {}", notice.decision);
            return None;
        };

        let fallback_id = conversation_id.unwrap_or_default().to_string();
        if fallback_id.is_empty() {
            warn!("Screening completed before a conversation id was assigned");
        }

        let api = self.api.clone();
        let participants = self.participants.clone();
        let tx = self.tx.clone();
        let logger = self.conversation_logger.clone();

        Some(tokio::spawn(async move {
            let (application_id, profile) =
                resolve_application_id(api.as_ref(), &participants, &fallback_id).await;

            if let Some(user) = profile {
                let _ = tx.send(ChatEvent::ProfileRefreshed(user));
            }

            let outcome = ScreeningOutcome::new(application_id, notice.decision, notice.summary);
            info!(
                "Screening finished: {} for application {}",
                outcome.screening_decision, outcome.application_id
            );
            logger.log(ConversationEvent::new(
                "screening_outcome",
                json!({
                    "application_id": outcome.application_id,
                    "decision": outcome.screening_decision.as_str(),
                    "summary": outcome.screening_summary,
                    "conversation_id": fallback_id,
                }),
            ));

            let _ = tx.send(ChatEvent::OutcomeHandedOff(outcome.clone()));
            if sender.send(outcome).is_err() {
                debug!("Results view is gone; dropping screening outcome");
            }
        }))
    }
}

/// Find the durable application id for the active job.
///
/// Falls back to `fallback_id` when the profile fetch fails or no
/// application matches. The fetched profile is returned either way.
pub async fn resolve_application_id<A: ScreeningApi + ?Sized>(
    api: &A,
    participants: &Participants,
    fallback_id: &str,
) -> (String, Option<User>) {
    match api.get_user(&participants.user_id).await {
        Ok(user) => {
            let found = user
                .application_for_job(&participants.job_id)
                .map(|app| app.application_id.clone());
            match found {
                Some(id) => (id, Some(user)),
                None => {
                    warn!(
                        "No application for job {} on profile {}; using conversation id",
                        participants.job_id, participants.user_id
                    );
                    (fallback_id.to_string(), Some(user))
                }
            }
        }
        Err(e) => {
            warn!("Profile refresh failed ({}); using conversation id", e);
            (fallback_id.to_string(), None)
        }
    }
}
