//! JSON frame codec.
//!
//! Decoding never panics: anything that is not a well-formed frame of a known
//! kind comes back as a [`DecodeError`] carrying the raw text for logging.

use super::frame::ServerFrame;
use super::intent::ClientIntent;
use thiserror::Error;

/// A server frame that could not be understood
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Frame is not valid JSON: {error}\nRaw frame: {raw}")]
    Malformed { error: String, raw: String },

    #[error("Frame has no \"type\" field\nRaw frame: {raw}")]
    MissingType { raw: String },

    #[error("Unknown frame type: {kind}")]
    UnknownType { kind: String, raw: String },

    #[error("Invalid \"{kind}\" frame: {error}\nRaw frame: {raw}")]
    InvalidFields {
        kind: String,
        error: String,
        raw: String,
    },
}

impl DecodeError {
    /// The raw text that failed to decode
    pub fn raw(&self) -> &str {
        match self {
            DecodeError::Malformed { raw, .. }
            | DecodeError::MissingType { raw }
            | DecodeError::UnknownType { raw, .. }
            | DecodeError::InvalidFields { raw, .. } => raw,
        }
    }
}

/// An intent that could not be serialized
#[derive(Error, Debug)]
#[error("Failed to encode {kind} frame: {source}")]
pub struct EncodeError {
    pub kind: &'static str,
    #[source]
    pub source: serde_json::Error,
}

/// Serialize an outgoing intent to its JSON text frame
pub fn encode_intent(intent: &ClientIntent) -> Result<String, EncodeError> {
    serde_json::to_string(intent).map_err(|source| EncodeError {
        kind: intent.kind(),
        source,
    })
}

/// Parse and validate an incoming text frame
pub fn decode_frame(raw: &str) -> Result<ServerFrame, DecodeError> {
    let value: serde_json::Value = serde_json::from_str(raw).map_err(|e| DecodeError::Malformed {
        error: e.to_string(),
        raw: raw.to_string(),
    })?;

    let kind = value
        .get("type")
        .and_then(|t| t.as_str())
        .ok_or_else(|| DecodeError::MissingType {
            raw: raw.to_string(),
        })?
        .to_string();

    if !ServerFrame::KINDS.contains(&kind.as_str()) {
        return Err(DecodeError::UnknownType {
            kind,
            raw: raw.to_string(),
        });
    }

    serde_json::from_value(value).map_err(|e| DecodeError::InvalidFields {
        kind,
        error: e.to_string(),
        raw: raw.to_string(),
    })
}
