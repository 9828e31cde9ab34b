//! Collaborator traits
//!
//! These traits define the interface between the control layer and the
//! parts of the device it drives but does not implement: pixel rendering,
//! the network broker client, and hierarchical file storage. Board crates
//! implement them; tests use the doubles in `crate::mock`.

pub mod display;
pub mod network;
pub mod storage;

pub use display::Display;
pub use network::Network;
pub use storage::{FileStorage, WriteMode};
