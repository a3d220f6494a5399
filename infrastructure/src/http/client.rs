//! HTTP adapter for the screening REST API.

use async_trait::async_trait;
use regex::Regex;
use reqwest::{Response, StatusCode, header};
use screening_application::{ApiError, ScreeningApi};
use screening_domain::{
    Job, LoginRequest, SignupRequest, StoredConversation, TranscriptDownload, User,
};
use serde::de::DeserializeOwned;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, warn};

/// Upper bound on one REST round trip
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

static DISPOSITION_FILENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"filename="?([^"]+)"?"#).expect("valid regex"));

/// `reqwest`-backed [`ScreeningApi`]
#[derive(Debug, Clone)]
pub struct HttpScreeningApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpScreeningApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Fail any request that has not completed within `timeout`
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to a default HTTP client: {}", e);
                reqwest::Client::new()
            });
        Self::with_client(client, base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn network(err: reqwest::Error) -> ApiError {
    ApiError::Network(err.to_string())
}

/// Pass successful responses through; map failures with `on_error`.
fn check(
    response: Response,
    on_error: impl FnOnce(StatusCode) -> ApiError,
) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let err = on_error(status);
    debug!("{} {} -> {}", status, response.url(), err);
    Err(err)
}

async fn json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::InvalidResponse(e.to_string()))
}

/// Filename suggested by a `Content-Disposition` header, if any
pub fn filename_from_disposition(header: Option<&str>, application_id: &str) -> String {
    let default = || TranscriptDownload::default_filename(application_id);
    let Some(header) = header else {
        return default();
    };
    DISPOSITION_FILENAME
        .captures(header)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(default)
}

#[async_trait]
impl ScreeningApi for HttpScreeningApi {
    async fn login(&self, request: &LoginRequest) -> Result<User, ApiError> {
        let response = self
            .client
            .post(self.url("/user/login"))
            .json(request)
            .send()
            .await
            .map_err(network)?;
        let response = check(response, |status| match status {
            StatusCode::UNAUTHORIZED => ApiError::InvalidCredentials,
            _ => ApiError::RequestFailed("Login failed".to_string()),
        })?;
        json(response).await
    }

    async fn signup(&self, request: &SignupRequest) -> Result<User, ApiError> {
        let response = self
            .client
            .post(self.url("/user"))
            .json(request)
            .send()
            .await
            .map_err(network)?;
        let response = check(response, |status| match status {
            StatusCode::CONFLICT => ApiError::EmailExists,
            StatusCode::BAD_REQUEST => ApiError::InvalidSignup,
            _ => ApiError::RequestFailed("Signup failed".to_string()),
        })?;
        json(response).await
    }

    async fn get_user(&self, user_id: &str) -> Result<User, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/user/{}", user_id)))
            .send()
            .await
            .map_err(network)?;
        let response = check(response, |_| {
            ApiError::RequestFailed("Failed to get user data".to_string())
        })?;
        json(response).await
    }

    async fn list_jobs(&self) -> Result<Vec<Job>, ApiError> {
        let response = self
            .client
            .get(self.url("/jobs"))
            .send()
            .await
            .map_err(network)?;
        let response = check(response, |_| {
            ApiError::RequestFailed("Failed to fetch jobs".to_string())
        })?;
        json(response).await
    }

    async fn delete_application(&self, application_id: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url(&format!("/application/{}", application_id)))
            .send()
            .await
            .map_err(network)?;
        check(response, |_| {
            ApiError::RequestFailed("Failed to delete job application".to_string())
        })?;
        Ok(())
    }

    async fn application_conversation(
        &self,
        application_id: &str,
    ) -> Result<StoredConversation, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/applications/{}/conversation", application_id)))
            .send()
            .await
            .map_err(network)?;
        let response = check(response, |status| match status {
            StatusCode::NOT_FOUND => {
                ApiError::NotFound("Conversation not found for this application".to_string())
            }
            _ => ApiError::RequestFailed("Failed to fetch conversation".to_string()),
        })?;
        json(response).await
    }

    async fn download_transcript(
        &self,
        application_id: &str,
    ) -> Result<TranscriptDownload, ApiError> {
        let response = self
            .client
            .get(self.url(&format!(
                "/conversation-summary/{}/messages",
                application_id
            )))
            .send()
            .await
            .map_err(network)?;
        let response = check(response, |status| match status {
            StatusCode::BAD_REQUEST => ApiError::InvalidApplicationId,
            StatusCode::NOT_FOUND => ApiError::NotFound("Conversation not found".to_string()),
            _ => ApiError::RequestFailed("Failed to download conversation".to_string()),
        })?;

        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let filename = filename_from_disposition(disposition.as_deref(), application_id);
        let bytes = response.bytes().await.map_err(network)?;

        Ok(TranscriptDownload {
            filename,
            bytes: bytes.to_vec(),
        })
    }
}
