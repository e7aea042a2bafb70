//! Wall-clock access — a seam so tests can pin "now".
//!
//! The engine needs real time in exactly three places: stamping
//! `last_save`, stamping a reset, and measuring elapsed offline time on
//! load. All three go through this type.

use crate::types::TimestampMs;

/// Interval at which the external tick driver invokes `add_power`.
pub const TICK_INTERVAL_MS: TimestampMs = 100;

#[derive(Debug, Clone)]
pub struct Clock {
    fixed: Option<TimestampMs>,
}

impl Clock {
    /// Real wall clock.
    pub fn system() -> Self {
        Self { fixed: None }
    }

    /// A clock frozen at `now_ms`. Used in tests.
    pub fn fixed(now_ms: TimestampMs) -> Self {
        Self { fixed: Some(now_ms) }
    }

    pub fn now_ms(&self) -> TimestampMs {
        self.fixed
            .unwrap_or_else(|| chrono::Utc::now().timestamp_millis())
    }
}
