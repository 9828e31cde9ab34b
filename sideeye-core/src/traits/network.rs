//! Network broker capability

use crate::telemetry::TelemetrySnapshot;

/// Broker client collaborator
///
/// Delivery, reconnection, and retry semantics belong to the implementor.
pub trait Network {
    /// Publish the current snapshot
    fn publish(&mut self, snapshot: &TelemetrySnapshot);

    /// Give the client a slice of loop time (reconnects, inbound messages)
    fn service(&mut self, _now_ms: u32) {}

    /// Drop stored WiFi credentials ahead of a factory reset
    fn forget_credentials(&mut self);
}
