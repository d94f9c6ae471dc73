//! Session lifecycle states and the events a session delivers.

use std::fmt;

use tokio::sync::mpsc;

/// Lifecycle of a [`GatewaySession`](crate::session::GatewaySession).
///
/// ```text
/// Idle → ResolvingEndpoint → Connecting → Connected → Closed
///                 ↑                                      │
///                 └──────── holder-initiated open ───────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Idle,
    ResolvingEndpoint,
    Connecting,
    Connected,
    Closed,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::ResolvingEndpoint => "resolving_endpoint",
            SessionState::Connecting => "connecting",
            SessionState::Connected => "connected",
            SessionState::Closed => "closed",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One inbound data frame, passed through undecoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Binary(Vec<u8>),
}

/// Why a connection ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    /// The remote side closed, or the stream ended (`1006`) without a
    /// close frame.
    Remote { code: u16, reason: String },
    /// Transport failure; the detail is the transport's own message.
    Error(String),
    /// The holder called `shutdown`.
    Shutdown,
}

impl CloseReason {
    /// Numeric close code, when one applies.
    pub fn code(&self) -> Option<u16> {
        match self {
            CloseReason::Remote { code, .. } => Some(*code),
            CloseReason::Shutdown => Some(1000),
            CloseReason::Error(_) => None,
        }
    }

    /// Human-readable reason or error detail.
    pub fn reason(&self) -> &str {
        match self {
            CloseReason::Remote { reason, .. } => reason,
            CloseReason::Error(detail) => detail,
            CloseReason::Shutdown => "client shutdown",
        }
    }
}

/// Notification from a live connection.
///
/// A connection yields any number of `Frame`s followed by exactly one
/// `Closed`, after which the channel ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayEvent {
    Frame(Frame),
    Closed(CloseReason),
}

/// Receiving half of a connection's event channel.
///
/// The channel is unbounded: the reader never waits on a slow consumer
/// and never drops a frame.
#[derive(Debug)]
pub struct GatewayEvents {
    pub(crate) rx: mpsc::UnboundedReceiver<GatewayEvent>,
}

impl GatewayEvents {
    /// Next event, or `None` once the terminal `Closed` has been consumed.
    pub async fn recv(&mut self) -> Option<GatewayEvent> {
        self.rx.recv().await
    }

    /// Non-blocking variant of [`recv`](Self::recv).
    pub fn try_recv(&mut self) -> Option<GatewayEvent> {
        self.rx.try_recv().ok()
    }

    pub fn into_inner(self) -> mpsc::UnboundedReceiver<GatewayEvent> {
        self.rx
    }
}
