//! Shared telemetry snapshot
//!
//! The one record describing everything currently known about the host.
//! Only the protocol dispatcher writes it; the interaction layer and the
//! rendering collaborator read it.

pub mod alert;
pub mod history;
pub mod snapshot;

pub use alert::AlertLevel;
pub use history::History;
pub use snapshot::{
    Identity, Metrics, SyncStatus, TelemetrySnapshot, HISTORY_LEN, IDENTITY_FIELD_LEN,
};
