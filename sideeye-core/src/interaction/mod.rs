//! User interaction state machine
//!
//! Turns button gestures and inbound-data activity into screen power,
//! page, and rotation changes. Rendering itself is requested, never
//! performed here: the controller raises a pending [`Refresh`] that the
//! firmware loop flushes through the display collaborator.

pub mod controller;
pub mod page;

pub use controller::{
    InteractionController, InteractionState, Refresh, COUNTDOWN_START_MS, DEFAULT_PAGE_DWELL_MS,
    IDLE_SCREEN_OFF_MS,
};
pub use page::{Page, Rotation};
