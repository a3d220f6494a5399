//! Reconnecting WebSocket connection.
//!
//! One background task owns the socket for the lifetime of a connection:
//!
//! ```text
//! connect ──ok──▶ Opened ──▶ pump frames ──dropped──▶ Closed ──┐
//!    │                           │                             │
//!    │                       cancelled ──▶ Closed, exit        │
//!    │                                                         ▼
//!    └──fail / timeout──▶ TransportError ──▶ backoff ──▶ connect again
//! ```
//!
//! Outgoing frames queue on an unbounded channel, so they survive a reconnect
//! and `send` never blocks. A frame whose write fails is held back and written
//! first on the next connection. When the retry cap is exceeded the task emits
//! a terminal `TransportError`, then `Closed`, and exits; a held frame is
//! dropped at that point.

use super::error::WsError;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use screening_application::{
    ChatConnection, ChatConnector, FrameSink, ReconnectPolicy, TransportError, TransportEvent,
};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;
type SocketWriter = SplitSink<Socket, Message>;

/// Opens reconnecting WebSocket connections
pub struct WsConnectionManager;

impl WsConnectionManager {
    /// Start connecting to `endpoint` on a background task.
    ///
    /// Must be called from within a tokio runtime. Only the endpoint syntax
    /// is checked here; connection failures arrive as events.
    pub fn connect(
        endpoint: &str,
        policy: ReconnectPolicy,
    ) -> Result<(WsConnection, mpsc::UnboundedReceiver<TransportEvent>), WsError> {
        validate_endpoint(endpoint)?;

        let (outgoing_tx, outgoing_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let task = ConnectionTask {
            endpoint: endpoint.to_string(),
            policy,
            outgoing: outgoing_rx,
            events: EventEmitter::new(events_tx),
            cancel: cancel.clone(),
            unsent: None,
        };
        tokio::spawn(task.run());

        let connection = WsConnection {
            inner: Arc::new(Handle {
                outgoing: outgoing_tx,
                cancel,
            }),
        };
        Ok((connection, events_rx))
    }
}

fn validate_endpoint(endpoint: &str) -> Result<(), WsError> {
    let invalid = |reason: String| WsError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason,
    };
    if !(endpoint.starts_with("ws://") || endpoint.starts_with("wss://")) {
        return Err(invalid("expected a ws:// or wss:// URL".to_string()));
    }
    endpoint
        .into_client_request()
        .map(|_| ())
        .map_err(|e| invalid(e.to_string()))
}

struct Handle {
    outgoing: mpsc::UnboundedSender<String>,
    cancel: CancellationToken,
}

impl Drop for Handle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Handle to a running connection
///
/// Clones share the connection; dropping the last clone closes it.
#[derive(Clone)]
pub struct WsConnection {
    inner: Arc<Handle>,
}

impl WsConnection {
    /// Queue one text frame
    pub fn send(&self, raw: String) -> Result<(), WsError> {
        if self.is_closed() {
            debug!("Connection closed; dropping outgoing frame");
            return Err(WsError::Closed);
        }
        self.inner.outgoing.send(raw).map_err(|_| {
            debug!("Connection task gone; dropping outgoing frame");
            WsError::Closed
        })
    }

    /// Close the connection. Further calls do nothing.
    pub fn close(&self) {
        if !self.inner.cancel.is_cancelled() {
            debug!("Closing WebSocket connection");
            self.inner.cancel.cancel();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.inner.cancel.is_cancelled() || self.inner.outgoing.is_closed()
    }
}

impl FrameSink for WsConnection {
    fn send(&self, raw: String) -> Result<(), TransportError> {
        WsConnection::send(self, raw).map_err(TransportError::from)
    }

    fn close(&self) {
        WsConnection::close(self);
    }

    fn is_closed(&self) -> bool {
        WsConnection::is_closed(self)
    }
}

/// [`ChatConnector`] backed by [`WsConnectionManager`]
#[derive(Debug, Clone, Default)]
pub struct WsChatConnector {
    policy: ReconnectPolicy,
}

impl WsChatConnector {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self { policy }
    }
}

impl ChatConnector for WsChatConnector {
    fn connect(&self, endpoint: &str) -> Result<ChatConnection, TransportError> {
        let (connection, events) = WsConnectionManager::connect(endpoint, self.policy.clone())?;
        Ok(ChatConnection {
            sink: Arc::new(connection),
            events,
        })
    }
}

/// Sends lifecycle events, never announcing `Closed` twice in a row
struct EventEmitter {
    tx: mpsc::UnboundedSender<TransportEvent>,
    closed_announced: bool,
}

impl EventEmitter {
    fn new(tx: mpsc::UnboundedSender<TransportEvent>) -> Self {
        Self {
            tx,
            closed_announced: false,
        }
    }

    fn emit(&mut self, event: TransportEvent) {
        if event == TransportEvent::Closed {
            if self.closed_announced {
                return;
            }
            self.closed_announced = true;
        } else {
            self.closed_announced = false;
        }
        let _ = self.tx.send(event);
    }

    fn error(&mut self, err: &WsError, terminal: bool) {
        self.emit(TransportEvent::TransportError {
            message: err.to_string(),
            terminal,
        });
    }
}

/// How a connected session ended
enum PumpExit {
    /// `close()` was called or every handle was dropped
    Cancelled,
    /// The socket went away on its own
    Dropped,
}

struct ConnectionTask {
    endpoint: String,
    policy: ReconnectPolicy,
    outgoing: mpsc::UnboundedReceiver<String>,
    events: EventEmitter,
    cancel: CancellationToken,
    /// Frame whose write failed, resent before anything else
    unsent: Option<String>,
}

impl ConnectionTask {
    async fn run(mut self) {
        let mut failed: u32 = 0;

        loop {
            let attempt = tokio::select! {
                _ = self.cancel.cancelled() => break,
                result = tokio::time::timeout(
                    self.policy.connect_timeout,
                    connect_async(self.endpoint.as_str()),
                ) => result,
            };

            match attempt {
                Ok(Ok((socket, _response))) => {
                    info!("Connected to {}", self.endpoint);
                    failed = 0;
                    self.events.emit(TransportEvent::Opened);
                    match self.pump(socket).await {
                        PumpExit::Cancelled => break,
                        PumpExit::Dropped => {
                            warn!("Connection to {} dropped", self.endpoint);
                            self.events.emit(TransportEvent::Closed);
                        }
                    }
                }
                Ok(Err(e)) => {
                    let err = WsError::from(e);
                    warn!("Failed to connect to {}: {}", self.endpoint, err);
                    self.events.error(&err, false);
                }
                Err(_) => {
                    let err = WsError::Timeout(self.policy.connect_timeout);
                    warn!("Failed to connect to {}: {}", self.endpoint, err);
                    self.events.error(&err, false);
                }
            }

            failed += 1;
            if !self.policy.allows_retry(failed) {
                warn!(
                    "Giving up on {} after {} retries",
                    self.endpoint, self.policy.max_retries
                );
                self.events.emit(TransportEvent::TransportError {
                    message: format!(
                        "Could not reconnect after {} attempts",
                        self.policy.max_retries
                    ),
                    terminal: true,
                });
                break;
            }

            let delay = self.policy.delay_for(failed);
            debug!("Reconnecting in {} ms (retry {})", delay.as_millis(), failed);
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        if self.unsent.take().is_some() {
            warn!("Dropping an outgoing frame that was never delivered");
        }
        self.events.emit(TransportEvent::Closed);
        debug!("Connection task for {} finished", self.endpoint);
    }

    /// Shuttle frames until the socket drops or the connection is closed
    async fn pump(&mut self, socket: Socket) -> PumpExit {
        let (mut write, mut read) = socket.split();

        if let Some(raw) = self.unsent.take() {
            debug!("Resending frame from the previous connection");
            if let Err(e) = self.deliver(&mut write, raw).await {
                self.events.error(&e, false);
                return PumpExit::Dropped;
            }
        }

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    if let Err(e) = write.send(Message::Close(None)).await {
                        debug!("Close frame not delivered: {}", e);
                    }
                    return PumpExit::Cancelled;
                }

                frame = self.outgoing.recv() => {
                    let Some(raw) = frame else {
                        let _ = write.send(Message::Close(None)).await;
                        return PumpExit::Cancelled;
                    };
                    if let Err(e) = self.deliver(&mut write, raw).await {
                        self.events.error(&e, false);
                        return PumpExit::Dropped;
                    }
                }

                message = read.next() => match message {
                    Some(Ok(Message::Text(text))) => {
                        trace!("<- {}", text.as_str());
                        self.events
                            .emit(TransportEvent::FrameReceived(text.as_str().to_owned()));
                    }
                    Some(Ok(Message::Close(frame))) => {
                        debug!("Server closed the connection: {:?}", frame);
                        return PumpExit::Dropped;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        self.events.error(&WsError::from(e), false);
                        return PumpExit::Dropped;
                    }
                    None => return PumpExit::Dropped,
                },
            }
        }
    }

    /// Write one frame, holding it for the next connection if the write fails
    async fn deliver(&mut self, write: &mut SocketWriter, raw: String) -> Result<(), WsError> {
        trace!("-> {}", raw);
        match write.send(Message::Text(raw.clone().into())).await {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!("Write failed; frame will be resent after reconnecting");
                self.unsent = Some(raw);
                Err(WsError::from(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::net::TcpListener;
    use tokio::time::timeout;
    use tokio_tungstenite::accept_async;

    // ==================== Helpers ====================

    fn fast_policy(max_retries: u32) -> ReconnectPolicy {
        ReconnectPolicy::default()
            .with_max_retries(max_retries)
            .with_connect_timeout(Duration::from_millis(500))
            .with_delays(Duration::from_millis(10), Duration::from_millis(20))
    }

    async fn next_event(rx: &mut mpsc::UnboundedReceiver<TransportEvent>) -> Option<TransportEvent> {
        timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for transport event")
    }

    /// Local server that echoes every text frame back as a greeting.
    async fn echo_server() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let Ok(mut ws) = accept_async(stream).await else {
                        return;
                    };
                    while let Some(Ok(message)) = ws.next().await {
                        if let Message::Text(text) = message {
                            let reply = serde_json::json!({
                                "type": "greeting",
                                "message": text.as_str(),
                            })
                            .to_string();
                            if ws.send(Message::Text(reply.into())).await.is_err() {
                                break;
                            }
                        }
                    }
                });
            }
        });
        format!("ws://{}", addr)
    }

    async fn unused_endpoint() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("ws://{}", addr)
    }

    // ==================== Tests ====================

    #[test]
    fn rejects_non_websocket_endpoint() {
        let err = validate_endpoint("http://localhost:8080/ws").unwrap_err();
        assert!(matches!(err, WsError::InvalidEndpoint { .. }));
        assert!(validate_endpoint("ws://localhost:8080/ws").is_ok());
    }

    #[tokio::test]
    async fn sends_and_receives_text_frames() {
        let endpoint = echo_server().await;
        let (connection, mut events) =
            WsConnectionManager::connect(&endpoint, fast_policy(5)).unwrap();

        assert_eq!(next_event(&mut events).await, Some(TransportEvent::Opened));
        connection.send("ping".to_string()).unwrap();

        let expected = serde_json::json!({"type": "greeting", "message": "ping"}).to_string();
        assert_eq!(
            next_event(&mut events).await,
            Some(TransportEvent::FrameReceived(expected))
        );
        connection.close();
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let endpoint = echo_server().await;
        let (connection, mut events) =
            WsConnectionManager::connect(&endpoint, fast_policy(5)).unwrap();
        assert_eq!(next_event(&mut events).await, Some(TransportEvent::Opened));

        connection.close();
        connection.close();

        assert_eq!(next_event(&mut events).await, Some(TransportEvent::Closed));
        assert_eq!(next_event(&mut events).await, None);
        assert!(connection.is_closed());
        assert!(matches!(
            connection.send("late".to_string()),
            Err(WsError::Closed)
        ));
    }

    #[tokio::test]
    async fn dropping_last_handle_closes_connection() {
        let endpoint = echo_server().await;
        let (connection, mut events) =
            WsConnectionManager::connect(&endpoint, fast_policy(5)).unwrap();
        assert_eq!(next_event(&mut events).await, Some(TransportEvent::Opened));

        let clone = connection.clone();
        drop(connection);
        assert!(!clone.is_closed());
        drop(clone);

        assert_eq!(next_event(&mut events).await, Some(TransportEvent::Closed));
        assert_eq!(next_event(&mut events).await, None);
    }

    #[tokio::test]
    async fn gives_up_after_retry_cap() {
        let endpoint = unused_endpoint().await;
        let (_connection, mut events) =
            WsConnectionManager::connect(&endpoint, fast_policy(2)).unwrap();

        let mut received = Vec::new();
        while let Some(event) = next_event(&mut events).await {
            received.push(event);
        }

        let soft_errors = received
            .iter()
            .filter(|e| matches!(e, TransportEvent::TransportError { terminal: false, .. }))
            .count();
        assert_eq!(soft_errors, 3);
        assert!(received[received.len() - 2].is_terminal_error());
        assert_eq!(received.last(), Some(&TransportEvent::Closed));
        assert!(!received.contains(&TransportEvent::Opened));
    }

    #[tokio::test]
    async fn reconnects_after_server_drop() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("ws://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            // First connection is dropped right after the handshake.
            let (stream, _) = listener.accept().await.unwrap();
            let ws = accept_async(stream).await.unwrap();
            drop(ws);

            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(stream).await.unwrap();
            while let Some(Ok(_)) = ws.next().await {}
        });

        let (connection, mut events) =
            WsConnectionManager::connect(&endpoint, fast_policy(5)).unwrap();

        assert_eq!(next_event(&mut events).await, Some(TransportEvent::Opened));
        let mut saw_closed = false;
        loop {
            match next_event(&mut events).await {
                Some(TransportEvent::Closed) => saw_closed = true,
                Some(TransportEvent::Opened) => break,
                Some(_) => {}
                None => panic!("connection task ended without reconnecting"),
            }
        }
        assert!(saw_closed);
        connection.close();
    }

    #[tokio::test]
    async fn held_frame_is_written_first_on_the_next_connection() {
        let endpoint = echo_server().await;
        let (outgoing_tx, outgoing_rx) = mpsc::unbounded_channel();
        let (events_tx, mut events) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let task = ConnectionTask {
            endpoint,
            policy: fast_policy(5),
            outgoing: outgoing_rx,
            events: EventEmitter::new(events_tx),
            cancel: cancel.clone(),
            unsent: Some("held".to_string()),
        };
        outgoing_tx.send("queued".to_string()).unwrap();
        tokio::spawn(task.run());

        assert_eq!(next_event(&mut events).await, Some(TransportEvent::Opened));
        let greeting = |text: &str| {
            TransportEvent::FrameReceived(
                serde_json::json!({"type": "greeting", "message": text}).to_string(),
            )
        };
        assert_eq!(next_event(&mut events).await, Some(greeting("held")));
        assert_eq!(next_event(&mut events).await, Some(greeting("queued")));

        cancel.cancel();
        assert_eq!(next_event(&mut events).await, Some(TransportEvent::Closed));
    }

    #[tokio::test]
    async fn connector_maps_invalid_endpoint() {
        let connector = WsChatConnector::new(fast_policy(1));
        let err = connector.connect("localhost:8080").err().unwrap();
        assert!(matches!(err, TransportError::InvalidEndpoint { .. }));
    }
}
