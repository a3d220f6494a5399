//! Applicant domain entities (camelCase on the wire)

use crate::screening::decision::ScreeningDecision;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Decision as reported by the profile API (title case)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Approved,
    Denied,
    #[default]
    Pending,
    Canceled,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Approved => "Approved",
            ApplicationStatus::Denied => "Denied",
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::Canceled => "Canceled",
        }
    }

    /// The same decision in the chat protocol's vocabulary
    pub fn as_decision(&self) -> ScreeningDecision {
        match self {
            ApplicationStatus::Approved => ScreeningDecision::Approved,
            ApplicationStatus::Denied => ScreeningDecision::Denied,
            ApplicationStatus::Pending => ScreeningDecision::Pending,
            ApplicationStatus::Canceled => ScreeningDecision::UserCanceled,
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One job the applicant has applied to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub application_id: String,
    pub job_id: String,
    pub job_name: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub job_location: String,
    #[serde(default)]
    pub screening_decision: ApplicationStatus,
}

/// Applicant profile (Entity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apt_num: Option<String>,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub job_applications: Vec<JobApplication>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// The application this user holds for `job_id`, if any
    pub fn application_for_job(&self, job_id: &str) -> Option<&JobApplication> {
        self.job_applications.iter().find(|a| a.job_id == job_id)
    }
}

/// A job posting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub job_name: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub job_location: String,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apt_num: Option<String>,
    pub state: String,
    pub zip_code: String,
}
