//! Host command dispatch
//!
//! Frames the inbound serial stream, decodes each line into a command,
//! applies it to the telemetry snapshot, and produces the response line
//! (if the command has one). Link liveness is evaluated separately, once
//! per loop tick.

pub mod dispatcher;
pub mod liveness;

pub use dispatcher::{Collaborators, ProtocolDispatcher};
pub use liveness::{LinkMonitor, LinkStatus, LIVENESS_TIMEOUT_MS, SYNC_IDLE_MS};
