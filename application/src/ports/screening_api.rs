//! Screening API port
//!
//! REST collaborators of the chat: account, jobs, applications and stored
//! conversations.

use async_trait::async_trait;
use screening_domain::{
    Job, LoginRequest, SignupRequest, StoredConversation, TranscriptDownload, User,
};
use thiserror::Error;

/// Errors that can occur talking to the screening API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email already exists")]
    EmailExists,

    #[error("Invalid signup data")]
    InvalidSignup,

    #[error("Invalid application ID")]
    InvalidApplicationId,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    RequestFailed(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Whether retrying the same request could succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}

/// Gateway to the screening REST API
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ScreeningApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<User, ApiError>;

    async fn signup(&self, request: &SignupRequest) -> Result<User, ApiError>;

    /// Fetch the current profile, including its job applications
    async fn get_user(&self, user_id: &str) -> Result<User, ApiError>;

    async fn list_jobs(&self) -> Result<Vec<Job>, ApiError>;

    async fn delete_application(&self, application_id: &str) -> Result<(), ApiError>;

    /// Stored decision and summary of a finished screening
    async fn application_conversation(
        &self,
        application_id: &str,
    ) -> Result<StoredConversation, ApiError>;

    /// Downloadable transcript of a finished screening
    async fn download_transcript(
        &self,
        application_id: &str,
    ) -> Result<TranscriptDownload, ApiError>;
}
