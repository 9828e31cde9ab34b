//! Button debouncing and gesture classification
//!
//! The classifier is fed one raw sample per loop tick:
//!
//! ```text
//!   raw ──► debounce (50 ms) ──► stable level ──► press/release edges
//!                                                  │
//!            ┌─────────────────────────────────────┤
//!            ▼                                     ▼
//!   press within 300 ms of an     release without Hold arms a pending
//!   armed click => DoubleClick    click; 300 ms later => Click
//!
//!   while pressed: > 800 ms => Hold (once), > 10 s => LongHold (once)
//! ```
//!
//! At most one gesture is returned per tick. When several conditions
//! become true on the same tick, the one evaluated last wins (order:
//! DoubleClick, Hold, LongHold, Click). With a loop period far below the
//! thresholds this never happens in practice.

use super::events::{ButtonSample, Gesture};
use crate::elapsed_ms;

/// Raw level must be stable this long before it is trusted
pub const DEBOUNCE_MS: u32 = 50;

/// Window after a release in which a new press is a double click
pub const DOUBLE_CLICK_MS: u32 = 300;

/// Press duration after which Hold is reported
pub const HOLD_MS: u32 = 800;

/// Press duration after which LongHold (factory reset) is reported
pub const LONG_HOLD_MS: u32 = 10_000;

/// Debouncing gesture classifier for a single button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonClassifier {
    /// Last raw sample
    raw_pressed: bool,
    /// Debounced level
    stable_pressed: bool,
    /// Tick of the last raw level change
    last_change_ms: u32,
    /// Tick the current press was promoted to stable
    press_start_ms: u32,
    hold_reported: bool,
    long_hold_reported: bool,
    /// Current press already produced a DoubleClick
    double_click_press: bool,
    /// Release tick of a click waiting out the double-click window
    pending_click_ms: Option<u32>,
    /// Tick of the most recent update
    now_ms: u32,
}

impl Default for ButtonClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ButtonClassifier {
    /// Create a classifier for a released button
    pub fn new() -> Self {
        Self {
            raw_pressed: false,
            stable_pressed: false,
            last_change_ms: 0,
            press_start_ms: 0,
            hold_reported: false,
            long_hold_reported: false,
            double_click_press: false,
            pending_click_ms: None,
            now_ms: 0,
        }
    }

    /// Feed one raw sample
    ///
    /// `pressed` is the logical level (already inverted for active-low
    /// wiring). Returns the gesture completed on this tick, if any.
    pub fn update(&mut self, pressed: bool, now_ms: u32) -> Option<Gesture> {
        self.now_ms = now_ms;
        let mut event = None;

        if pressed != self.raw_pressed {
            self.raw_pressed = pressed;
            self.last_change_ms = now_ms;
        }

        if pressed != self.stable_pressed
            && elapsed_ms(now_ms, self.last_change_ms) > DEBOUNCE_MS
        {
            self.stable_pressed = pressed;
            if pressed {
                if let Some(gesture) = self.on_press(now_ms) {
                    event = Some(gesture);
                }
            } else {
                self.on_release(now_ms);
            }
        }

        if self.stable_pressed {
            let held = elapsed_ms(now_ms, self.press_start_ms);

            if !self.hold_reported && held > HOLD_MS {
                event = Some(Gesture::Hold);
                self.hold_reported = true;
                self.pending_click_ms = None;
            }

            if !self.long_hold_reported && held > LONG_HOLD_MS {
                event = Some(Gesture::LongHold);
                self.long_hold_reported = true;
            }
        }

        if let Some(released_ms) = self.pending_click_ms {
            if elapsed_ms(now_ms, released_ms) > DOUBLE_CLICK_MS {
                self.pending_click_ms = None;
                event = Some(Gesture::Click);
            }
        }

        event
    }

    /// Feed one raw sample and bundle the result with the debounced state
    pub fn sample(&mut self, pressed: bool, now_ms: u32) -> ButtonSample {
        let gesture = self.update(pressed, now_ms);
        ButtonSample {
            gesture,
            pressed: self.is_pressed(),
            press_duration_ms: self.press_duration(),
        }
    }

    /// Debounced pressed level
    pub fn is_pressed(&self) -> bool {
        self.stable_pressed
    }

    /// Duration of the current press as of the last update (0 when released)
    pub fn press_duration(&self) -> u32 {
        if self.stable_pressed {
            elapsed_ms(self.now_ms, self.press_start_ms)
        } else {
            0
        }
    }

    fn on_press(&mut self, now_ms: u32) -> Option<Gesture> {
        self.press_start_ms = now_ms;
        self.hold_reported = false;
        self.long_hold_reported = false;
        self.double_click_press = false;

        match self.pending_click_ms {
            Some(released_ms) if elapsed_ms(now_ms, released_ms) < DOUBLE_CLICK_MS => {
                self.pending_click_ms = None;
                self.double_click_press = true;
                Some(Gesture::DoubleClick)
            }
            _ => None,
        }
    }

    fn on_release(&mut self, now_ms: u32) {
        if !self.hold_reported && !self.double_click_press {
            self.pending_click_ms = Some(now_ms);
        }
    }
}
