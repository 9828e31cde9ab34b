//! Board-agnostic core logic for the SideEye hardware monitor
//!
//! This crate contains the event and protocol control layer, none of
//! which depends on specific hardware:
//!
//! - Button debouncing and gesture classification
//! - Interaction state machine (screen power, pages, rotation, reset countdown)
//! - Shared telemetry snapshot with bounded throughput history
//! - Host command dispatch and link liveness
//! - Resumable chunked file transfer into hierarchical storage
//! - Collaborator traits (display, network, storage)
//! - Configuration type definitions
//!
//! Everything runs on one cooperative loop: each component is updated with
//! the current millisecond tick and compares it against stored deadlines.

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod config;
pub mod dispatch;
pub mod input;
pub mod interaction;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod sync;
pub mod telemetry;
pub mod traits;

/// Milliseconds elapsed from `since` to `now`, tolerant of tick wrap
///
/// Must stay identical to `sideeye_hal::time::elapsed_ms`.
#[inline]
pub(crate) fn elapsed_ms(now: u32, since: u32) -> u32 {
    now.wrapping_sub(since)
}
