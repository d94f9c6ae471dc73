//! `ck-gateway`: the live connection half of cordkit.
//!
//! A [`GatewaySession`] owns at most one WebSocket to the platform's
//! gateway.  It walks a small state machine, delivers inbound frames in
//! order on a [`GatewayEvents`] channel, and reports the end of every
//! connection exactly once.
//!
//! # Connection flow
//!
//! 1. `open(resolver)`: ask the [`EndpointResolver`] for a URL
//!    (`Idle → ResolvingEndpoint`).  Failure → `GatewayUnavailable`, state
//!    restored.
//! 2. Open the socket (`Connecting → Connected`), bounded by
//!    `connect_timeout_ms`.
//! 3. Reader task: every Text/Binary frame becomes `GatewayEvent::Frame`.
//! 4. First of remote close / transport error / `shutdown()` becomes the
//!    single `GatewayEvent::Closed`, state `Closed`, channel ends.
//!
//! No identify or heartbeat payloads are sent: the event protocol sits
//! above this crate.  Reconnecting is always the holder's decision; see
//! [`ReconnectBackoff`] for pacing.
//!
//! [`EndpointResolver`]: ck_domain::resolver::EndpointResolver

pub mod reconnect;
pub mod session;
pub mod types;

// ── Re-exports for ergonomic imports ─────────────────────────────────

pub use reconnect::ReconnectBackoff;
pub use session::GatewaySession;
pub use types::{CloseReason, Frame, GatewayEvent, GatewayEvents, SessionState};
