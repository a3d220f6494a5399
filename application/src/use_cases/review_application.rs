//! Review past applications: stored outcome, transcript download, withdrawal.

use crate::ports::screening_api::{ApiError, ScreeningApi};
use screening_domain::{ApplicationStatus, ScreeningOutcome, TranscriptDownload, User};
use std::sync::Arc;
use tracing::{debug, info};

/// Dashboard-side operations on an applicant's existing applications
pub struct ReviewApplicationUseCase<A: ScreeningApi + 'static> {
    api: Arc<A>,
}

impl<A: ScreeningApi + 'static> ReviewApplicationUseCase<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// Load the stored outcome of `application_id`.
    ///
    /// The profile's status for the application fills in a missing decision.
    pub async fn outcome(
        &self,
        user_id: &str,
        application_id: &str,
    ) -> Result<ScreeningOutcome, ApiError> {
        let user = self.api.get_user(user_id).await?;
        let status = profile_status(&user, application_id);
        debug!("Profile status for {}: {}", application_id, status);

        let stored = self.api.application_conversation(application_id).await?;
        Ok(stored.into_outcome(application_id, status))
    }

    pub async fn download(&self, application_id: &str) -> Result<TranscriptDownload, ApiError> {
        self.api.download_transcript(application_id).await
    }

    /// Delete an application so the job can be applied to again
    pub async fn withdraw(&self, application_id: &str) -> Result<(), ApiError> {
        self.api.delete_application(application_id).await?;
        info!("Withdrew application {}", application_id);
        Ok(())
    }
}

fn profile_status(user: &User, application_id: &str) -> ApplicationStatus {
    user.job_applications
        .iter()
        .find(|app| app.application_id == application_id)
        .map(|app| app.screening_decision)
        .unwrap_or_default()
}
