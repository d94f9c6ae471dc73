//! Reconnect pacing with jittered exponential back-off.
//!
//! The session never reconnects by itself.  Holders that want to keep a
//! connection alive use this policy to space out their own calls to
//! `GatewaySession::open` (or `Client::reconnect`).

use std::time::Duration;

use ck_domain::config::ReconnectConfig;

/// Delay schedule for holder-initiated reconnects.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconnectBackoff {
    pub initial_delay: Duration,
    /// Cap applied before jitter.
    pub max_delay: Duration,
    pub backoff_factor: f64,
    /// Consecutive failures tolerated; `0` means unlimited.
    pub max_attempts: u32,
}

impl Default for ReconnectBackoff {
    fn default() -> Self {
        Self::from(&ReconnectConfig::default())
    }
}

impl From<&ReconnectConfig> for ReconnectBackoff {
    fn from(cfg: &ReconnectConfig) -> Self {
        Self {
            initial_delay: Duration::from_millis(cfg.initial_delay_ms),
            max_delay: Duration::from_millis(cfg.max_delay_ms),
            backoff_factor: cfg.backoff_factor,
            max_attempts: cfg.max_attempts,
        }
    }
}

impl ReconnectBackoff {
    /// Delay before attempt `attempt` (0-indexed): exponential, capped at
    /// `max_delay`, plus up to 25% jitter so a fleet of bots dropped by the
    /// same gateway restart doesn't come back in lockstep.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exp = self
            .backoff_factor
            .powi(attempt.min(i32::MAX as u32) as i32);
        let uncapped_ms = self.initial_delay.as_millis() as f64 * exp;
        let capped_ms = uncapped_ms.min(self.max_delay.as_millis() as f64);
        let jitter_ms = capped_ms * 0.25 * jitter_fraction(attempt);
        Duration::from_millis((capped_ms + jitter_ms) as u64)
    }

    /// True once `attempt` consecutive failures have used up the budget.
    pub fn should_give_up(&self, attempt: u32) -> bool {
        self.max_attempts != 0 && attempt >= self.max_attempts
    }
}

/// Deterministic spread in [0, 1) derived from the attempt number.
fn jitter_fraction(attempt: u32) -> f64 {
    // Fibonacci hashing.
    let mixed = attempt.wrapping_add(1).wrapping_mul(0x9E37_79B9);
    f64::from(mixed) / (f64::from(u32::MAX) + 1.0)
}
