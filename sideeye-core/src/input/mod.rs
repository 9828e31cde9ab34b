//! Button input
//!
//! Turns per-tick raw samples of the single user button into discrete
//! gestures. Debounce, double-click, and hold windows are all evaluated
//! against the tick passed in; nothing here waits.

pub mod button;
pub mod events;

pub use button::{ButtonClassifier, DEBOUNCE_MS, DOUBLE_CLICK_MS, HOLD_MS, LONG_HOLD_MS};
pub use events::{ButtonSample, Gesture};
