//! Host link liveness
//!
//! The host streams telemetry continuously; silence longer than
//! [`LIVENESS_TIMEOUT_MS`] means it has gone away.

use crate::elapsed_ms;

/// Silence after which the host is considered disconnected
pub const LIVENESS_TIMEOUT_MS: u32 = 10_000;

/// Time after the last transfer page focus at which "Syncing" reverts to idle
pub const SYNC_IDLE_MS: u32 = 2000;

/// Link condition reported by [`LinkMonitor::check`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkStatus {
    /// Data seen within the timeout (or never seen at all)
    Alive,
    /// No data for longer than the timeout
    Expired,
}

/// Tracks when the host last sent telemetry
#[derive(Debug, Clone, Default)]
pub struct LinkMonitor {
    /// Tick of the last data arrival, None before the first one
    last_data_ms: Option<u32>,
}

impl LinkMonitor {
    pub fn new() -> Self {
        Self { last_data_ms: None }
    }

    /// Record a data arrival
    pub fn data_received(&mut self, now_ms: u32) {
        self.last_data_ms = Some(now_ms);
    }

    /// Check the link at `now_ms`
    pub fn check(&self, now_ms: u32) -> LinkStatus {
        match self.last_data_ms {
            Some(last) if elapsed_ms(now_ms, last) > LIVENESS_TIMEOUT_MS => LinkStatus::Expired,
            _ => LinkStatus::Alive,
        }
    }

    /// Milliseconds since the last arrival
    pub fn silence_ms(&self, now_ms: u32) -> Option<u32> {
        self.last_data_ms.map(|last| elapsed_ms(now_ms, last))
    }
}
