//! Conversation domain entities

use crate::core::id::{IdGenerator, TurnId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who wrote a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    User,
    Bot,
}

/// One complete chat message (Entity)
///
/// Immutable once created: fields are private and there are no setters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    id: TurnId,
    text: String,
    author: Author,
    created_at: DateTime<Utc>,
}

impl ChatTurn {
    /// A turn typed by the applicant.
    pub fn user(ids: &IdGenerator, text: impl Into<String>) -> Self {
        Self::new(ids.next(IdGenerator::USER), text, Author::User)
    }

    /// A completed reply from the screening agent.
    pub fn bot(ids: &IdGenerator, text: impl Into<String>) -> Self {
        Self::new(ids.next(IdGenerator::BOT), text, Author::Bot)
    }

    /// The closing message carried by a `conversation_end` frame.
    pub fn closing(ids: &IdGenerator, text: impl Into<String>) -> Self {
        Self::new(ids.next(IdGenerator::END), text, Author::Bot)
    }

    fn new(id: TurnId, text: impl Into<String>, author: Author) -> Self {
        Self {
            id,
            text: text.into(),
            author,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &TurnId {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn author(&self) -> Author {
        self.author
    }

    pub fn is_user_authored(&self) -> bool {
        self.author == Author::User
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
