//! Per-message timings.
//!
//! Collected on every run (two `Instant` reads per phase) and surfaced only by
//! `Engine::process_verbose`.

use std::time::Duration;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct RunMetrics {
    /// Total elapsed time for the message.
    pub total: Duration,
    /// Intent classification, including any extraction it ran.
    pub classify: Duration,
    /// Dialogue policy: extraction (when not reused), suggestions, message text.
    pub respond: Duration,
}
