//! Gateway session: owns the live WebSocket and its lifecycle.
//!
//! A session resolves its endpoint through an [`EndpointResolver`], opens
//! the socket, and hands a reader task the connection.  The reader
//! forwards frames in arrival order and reports the connection's end
//! exactly once.  Nothing here reconnects on its own; the holder calls
//! [`GatewaySession::open`] again when it wants a new connection.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use ck_domain::config::GatewayConfig;
use ck_domain::error::{Error, Result};
use ck_domain::resolver::EndpointResolver;
use ck_domain::trace::TraceEvent;
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::error::{Error as WsError, ProtocolError};
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;

use crate::types::{CloseReason, Frame, GatewayEvent, GatewayEvents, SessionState};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How long a shutdown waits for the close frame to be written.
const CLOSE_GRACE: Duration = Duration::from_secs(5);

/// Handle to the reader task of the one live connection.
struct Connection {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// A single-writer gateway session.
///
/// Holds at most one connection at a time: any existing connection is shut
/// down and its reader joined before a new one is opened.
pub struct GatewaySession {
    connect_timeout: Duration,
    url: Option<String>,
    conn: Option<Connection>,
    state: Arc<watch::Sender<SessionState>>,
    last_close: Arc<Mutex<Option<CloseReason>>>,
    connected_at: Option<DateTime<Utc>>,
}

impl GatewaySession {
    pub fn new(cfg: &GatewayConfig) -> Self {
        let (state, _) = watch::channel(SessionState::Idle);
        Self {
            connect_timeout: Duration::from_millis(cfg.connect_timeout_ms),
            url: None,
            conn: None,
            state: Arc::new(state),
            last_close: Arc::new(Mutex::new(None)),
            connected_at: None,
        }
    }

    // ── observers ────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Subscribe to state transitions.
    pub fn watch_state(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// The last resolved gateway URL.
    pub fn gateway_url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// How the most recent connection ended, if it has.
    pub fn last_close(&self) -> Option<CloseReason> {
        self.last_close.lock().clone()
    }

    /// When the current (or most recent) connection opened.
    pub fn connected_at(&self) -> Option<DateTime<Utc>> {
        self.connected_at
    }

    // ── lifecycle ────────────────────────────────────────────────────

    /// Resolve the endpoint and connect.
    ///
    /// On resolver failure the session returns to the state it was in
    /// before the call and no connection is attempted.
    pub async fn open(&mut self, resolver: &dyn EndpointResolver) -> Result<GatewayEvents> {
        self.shutdown().await;

        let previous = self.state();
        transition(&self.state, SessionState::ResolvingEndpoint);

        let url = match resolver.resolve_gateway_url().await {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(error = %e, "gateway endpoint resolution failed");
                transition(&self.state, previous);
                return Err(Error::GatewayUnavailable);
            }
        };
        tracing::debug!(url = %url, "gateway endpoint resolved");

        self.url = Some(url);
        self.connect().await
    }

    /// Record a URL obtained elsewhere, for a later [`connect`](Self::connect).
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = Some(url.into());
    }

    /// Open the socket for the previously resolved URL.
    pub async fn connect(&mut self) -> Result<GatewayEvents> {
        let Some(url) = self.url.clone() else {
            return Err(Error::ConnectionNotReady);
        };

        self.shutdown().await;
        transition(&self.state, SessionState::Connecting);
        tracing::info!(url = %url, "connecting to gateway");

        let ws = match tokio::time::timeout(
            self.connect_timeout,
            tokio_tungstenite::connect_async(url.as_str()),
        )
        .await
        {
            Ok(Ok((ws, _response))) => ws,
            Ok(Err(e)) => return Err(self.connect_failed(&url, e.to_string())),
            Err(_) => {
                let detail = format!(
                    "connect timed out after {}ms",
                    self.connect_timeout.as_millis()
                );
                return Err(self.connect_failed(&url, detail));
            }
        };

        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        *self.last_close.lock() = None;
        self.connected_at = Some(Utc::now());
        // Connected must be published before the reader can publish Closed.
        transition(&self.state, SessionState::Connected);
        tracing::info!(url = %url, "gateway connected");

        let task = tokio::spawn(read_loop(
            ws,
            tx,
            cancel.clone(),
            self.state.clone(),
            self.last_close.clone(),
            url,
        ));
        self.conn = Some(Connection { cancel, task });

        Ok(GatewayEvents { rx })
    }

    /// Close the live connection, if any, and wait for its reader to
    /// finish.  The reader reports `CloseReason::Shutdown` unless the
    /// connection had already ended.
    pub async fn shutdown(&mut self) {
        let Some(conn) = self.conn.take() else {
            return;
        };
        conn.cancel.cancel();
        if let Err(e) = conn.task.await {
            tracing::error!(error = %e, "gateway reader task failed");
            // The reader never got to publish its end.
            self.last_close
                .lock()
                .get_or_insert_with(|| CloseReason::Error(e.to_string()));
            transition(&self.state, SessionState::Closed);
        }
    }

    fn connect_failed(&mut self, url: &str, detail: String) -> Error {
        tracing::warn!(url = %url, error = %detail, "gateway connect failed");
        *self.last_close.lock() = Some(CloseReason::Error(detail.clone()));
        transition(&self.state, SessionState::Closed);
        Error::Gateway(detail)
    }
}

impl Drop for GatewaySession {
    fn drop(&mut self) {
        if let Some(conn) = &self.conn {
            conn.cancel.cancel();
        }
    }
}

/// Publish a state change.  Repeated transitions to the same state are
/// ignored.
fn transition(state: &watch::Sender<SessionState>, to: SessionState) {
    let mut from = to;
    let changed = state.send_if_modified(|current| {
        if *current == to {
            return false;
        }
        from = *current;
        *current = to;
        true
    });
    if changed {
        tracing::debug!(from = %from, to = %to, "gateway state changed");
        TraceEvent::GatewayStateChanged {
            from: from.to_string(),
            to: to.to_string(),
        }
        .emit();
    }
}

/// Reader task: forwards frames until the connection ends, then reports
/// the end once.  Being the only reporter is what makes the terminal
/// transition idempotent: whatever arrives after the first close or error
/// is never read.
async fn read_loop(
    mut ws: WsStream,
    tx: mpsc::UnboundedSender<GatewayEvent>,
    cancel: CancellationToken,
    state: Arc<watch::Sender<SessionState>>,
    last_close: Arc<Mutex<Option<CloseReason>>>,
    url: String,
) {
    let mut delivered: u64 = 0;

    let reason = loop {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                let frame = CloseFrame {
                    code: CloseCode::Normal,
                    reason: "client shutdown".into(),
                };
                match tokio::time::timeout(CLOSE_GRACE, ws.close(Some(frame))).await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => tracing::debug!(error = %e, "close frame not sent"),
                    Err(_) => tracing::debug!("close frame timed out"),
                }
                break CloseReason::Shutdown;
            }

            next = ws.next() => match next {
                Some(Ok(Message::Text(text))) => {
                    delivered += 1;
                    let _ = tx.send(GatewayEvent::Frame(Frame::Text(text)));
                }
                Some(Ok(Message::Binary(data))) => {
                    delivered += 1;
                    let _ = tx.send(GatewayEvent::Frame(Frame::Binary(data)));
                }
                Some(Ok(Message::Close(frame))) => {
                    let (code, reason) = match frame {
                        Some(f) => (u16::from(f.code), f.reason.into_owned()),
                        // 1005: no status code present.
                        None => (1005, String::new()),
                    };
                    // tungstenite queues the close reply; write it out so the
                    // peer sees a completed handshake, not a reset.
                    match tokio::time::timeout(CLOSE_GRACE, ws.flush()).await {
                        Ok(Ok(())) => {}
                        Ok(Err(e)) => tracing::debug!(error = %e, "close reply not sent"),
                        Err(_) => tracing::debug!("close reply timed out"),
                    }
                    break CloseReason::Remote { code, reason };
                }
                // Ping/Pong are answered by tungstenite.
                Some(Ok(_)) => {}
                // 1006: stream ended without a close frame.
                Some(Err(WsError::Protocol(ProtocolError::ResetWithoutClosingHandshake))) | None => {
                    break CloseReason::Remote { code: 1006, reason: String::new() };
                }
                Some(Err(e)) => break CloseReason::Error(e.to_string()),
            },
        }
    };

    tracing::info!(
        url = %url,
        code = ?reason.code(),
        reason = %reason.reason(),
        frames = delivered,
        "gateway connection closed"
    );
    TraceEvent::GatewayClosed {
        url,
        code: reason.code(),
        reason: reason.reason().to_owned(),
        frames_delivered: delivered,
    }
    .emit();

    *last_close.lock() = Some(reason.clone());
    transition(&state, SessionState::Closed);
    let _ = tx.send(GatewayEvent::Closed(reason));
}
