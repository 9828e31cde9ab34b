//! Monotonic time source
//!
//! Every timeout in the firmware is evaluated by comparing a wrapping
//! millisecond counter against stored timestamps; nothing blocks.

/// Free-running millisecond counter
pub trait Monotonic {
    /// Milliseconds since boot, wrapping at `u32::MAX`
    fn now_ms(&self) -> u32;
}

/// Milliseconds elapsed from `since` to `now`, tolerant of counter wrap
///
/// `sideeye-core` carries its own copy; keep the two identical.
#[inline]
pub fn elapsed_ms(now: u32, since: u32) -> u32 {
    now.wrapping_sub(since)
}
