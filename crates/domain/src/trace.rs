use serde::Serialize;

/// Structured trace events emitted across all cordkit crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    RestCall {
        operation: String,
        endpoint: String,
        status: u16,
        duration_ms: u64,
    },
    GatewayStateChanged {
        from: String,
        to: String,
    },
    GatewayClosed {
        url: String,
        code: Option<u16>,
        reason: String,
        frames_delivered: u64,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "ck_event");
    }
}
