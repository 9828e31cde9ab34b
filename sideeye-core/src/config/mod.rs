//! Configuration types
//!
//! Device configuration stored as postcard binary data by the firmware.

pub mod types;

pub use types::*;
