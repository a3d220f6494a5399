//! Chat turn identifiers.
//!
//! Identifiers have the shape `{prefix}-{unix_millis}-{counter}`. The counter
//! is process-wide and strictly increasing, so two identifiers minted in the
//! same millisecond still differ.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Identifier of a single [`ChatTurn`](crate::ChatTurn) (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TurnId(String);

impl TurnId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The namespace part of the identifier (`user`, `bot`, `end`, ...)
    pub fn prefix(&self) -> &str {
        self.0.split('-').next().unwrap_or_default()
    }
}

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Produces locally-unique turn identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdGenerator;

impl IdGenerator {
    pub const USER: &'static str = "user";
    pub const BOT: &'static str = "bot";
    pub const END: &'static str = "end";

    pub fn new() -> Self {
        Self
    }

    /// Mint the next identifier in the given namespace.
    pub fn next(&self, prefix: &str) -> TurnId {
        let counter = COUNTER.fetch_add(1, Ordering::Relaxed) + 1;
        let millis = chrono::Utc::now().timestamp_millis();
        TurnId(format!("{}-{}-{}", prefix, millis, counter))
    }
}
