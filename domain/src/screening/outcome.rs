//! Screening outcome and results-side records

use super::decision::ScreeningDecision;
use crate::applicant::entities::ApplicationStatus;
use serde::{Deserialize, Serialize};

/// Final result of a screening conversation (Value Object)
///
/// Produced at most once per session and handed to the results view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreeningOutcome {
    pub application_id: String,
    pub screening_decision: ScreeningDecision,
    pub screening_summary: Option<String>,
}

impl ScreeningOutcome {
    pub fn new(
        application_id: impl Into<String>,
        screening_decision: ScreeningDecision,
        screening_summary: Option<String>,
    ) -> Self {
        Self {
            application_id: application_id.into(),
            screening_decision,
            screening_summary,
        }
    }

    pub fn is_approved(&self) -> bool {
        self.screening_decision == ScreeningDecision::Approved
    }

    pub fn is_denied(&self) -> bool {
        self.screening_decision == ScreeningDecision::Denied
    }
}

/// Stored conversation record of a past application (snake_case on the wire)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredConversation {
    #[serde(default)]
    pub application_id: Option<String>,
    #[serde(default)]
    pub screening_decision: Option<String>,
    #[serde(default)]
    pub screening_summary: Option<String>,
}

impl StoredConversation {
    /// Map to an outcome, filling gaps from what the dashboard already knows.
    ///
    /// A missing or unreadable decision falls back to the profile's
    /// application status.
    pub fn into_outcome(
        self,
        requested_id: &str,
        profile_status: ApplicationStatus,
    ) -> ScreeningOutcome {
        let decision = self
            .screening_decision
            .as_deref()
            .filter(|s| !s.is_empty())
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(|| profile_status.as_decision());

        ScreeningOutcome {
            application_id: self
                .application_id
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| requested_id.to_string()),
            screening_decision: decision,
            screening_summary: self.screening_summary.filter(|s| !s.is_empty()),
        }
    }
}

/// A downloaded conversation transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptDownload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl TranscriptDownload {
    /// Filename used when the server does not suggest one
    pub fn default_filename(application_id: &str) -> String {
        format!("conversation_{}.txt", application_id)
    }
}
