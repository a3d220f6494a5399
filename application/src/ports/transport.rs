//! Chat transport port
//!
//! A persistent, bidirectional text-frame connection to the screening agent.
//! The adapter owns reconnection; the session only sees a sequential stream
//! of [`TransportEvent`]s and writes through a [`FrameSink`].

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

/// Lifecycle events of a connection, delivered in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The socket is open (first connect or a reconnect)
    Opened,
    /// One raw text frame from the server
    FrameReceived(String),
    /// Connection-level failure. `terminal` is set once retries are exhausted.
    TransportError { message: String, terminal: bool },
    /// The socket closed
    Closed,
}

impl TransportEvent {
    pub fn is_terminal_error(&self) -> bool {
        matches!(self, TransportEvent::TransportError { terminal: true, .. })
    }
}

/// Errors surfaced by transport adapters
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Invalid endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("Connection closed")]
    Closed,
}

/// Write half of a connection
///
/// `send` only queues the frame; delivery failures come back as
/// [`TransportEvent::TransportError`].
pub trait FrameSink: Send + Sync {
    fn send(&self, raw: String) -> Result<(), TransportError>;

    /// Close the connection. Calling it again has no further effect.
    fn close(&self);

    fn is_closed(&self) -> bool;
}

/// An established (or establishing) connection
pub struct ChatConnection {
    pub sink: Arc<dyn FrameSink>,
    pub events: mpsc::UnboundedReceiver<TransportEvent>,
}

/// Opens chat connections
pub trait ChatConnector: Send + Sync {
    /// Start connecting to `endpoint`.
    ///
    /// Returns immediately; [`TransportEvent::Opened`] arrives on the event
    /// channel once the socket is up.
    fn connect(&self, endpoint: &str) -> Result<ChatConnection, TransportError>;
}

/// Retry and timeout settings for a connection
#[derive(Debug, Clone, PartialEq)]
pub struct ReconnectPolicy {
    /// Consecutive failed attempts tolerated before giving up
    pub max_retries: u32,
    pub connect_timeout: Duration,
    pub min_delay: Duration,
    pub max_delay: Duration,
    /// Multiplier applied to the delay after each failed attempt
    pub growth: f64,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            connect_timeout: Duration::from_millis(5000),
            min_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(10000),
            growth: 1.3,
        }
    }
}

impl ReconnectPolicy {
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_delays(mut self, min: Duration, max: Duration) -> Self {
        self.min_delay = min;
        self.max_delay = max;
        self
    }

    /// Delay before retry number `retry` (1-based), capped at `max_delay`.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(64) as i32;
        let millis = self.min_delay.as_millis() as f64 * self.growth.powi(exponent);
        let capped = millis.min(self.max_delay.as_millis() as f64);
        Duration::from_millis(capped as u64)
    }

    /// Whether another attempt is allowed after `failed` consecutive failures
    pub fn allows_retry(&self, failed: u32) -> bool {
        failed <= self.max_retries
    }
}
