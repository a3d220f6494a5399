//! Screening decision value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Decision reached by the screening agent
///
/// Serialized in the chat protocol's upper-case vocabulary
/// (`APPROVED`, `DENIED`, `PENDING`, `USER_CANCELED`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScreeningDecision {
    Approved,
    Denied,
    Pending,
    UserCanceled,
}

impl ScreeningDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScreeningDecision::Approved => "APPROVED",
            ScreeningDecision::Denied => "DENIED",
            ScreeningDecision::Pending => "PENDING",
            ScreeningDecision::UserCanceled => "USER_CANCELED",
        }
    }

    /// Human-readable label for display
    pub fn label(&self) -> &'static str {
        match self {
            ScreeningDecision::Approved => "Approved",
            ScreeningDecision::Denied => "Denied",
            ScreeningDecision::Pending => "Pending",
            ScreeningDecision::UserCanceled => "Canceled",
        }
    }
}

impl fmt::Display for ScreeningDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScreeningDecision {
    type Err = DomainError;

    /// Accepts the protocol vocabulary case-insensitively; `CANCELED` is an
    /// alias of `USER_CANCELED` (the profile API's spelling).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "APPROVED" => Ok(ScreeningDecision::Approved),
            "DENIED" => Ok(ScreeningDecision::Denied),
            "PENDING" => Ok(ScreeningDecision::Pending),
            "USER_CANCELED" | "CANCELED" => Ok(ScreeningDecision::UserCanceled),
            _ => Err(DomainError::InvalidDecision(s.to_string())),
        }
    }
}
