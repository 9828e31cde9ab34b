//! Interaction controller
//!
//! Gesture handling:
//!
//! | gesture     | screen off            | screen on                            |
//! |-------------|-----------------------|--------------------------------------|
//! | Click       | wake, full refresh    | next page (not while provisioning)   |
//! | DoubleClick | toggle rotation       | toggle rotation                      |
//! | Hold        | wake, full refresh    | defer screen-off until release       |
//! | LongHold    | request factory reset | request factory reset                |
//!
//! Holding the button past [`COUNTDOWN_START_MS`] turns the deferred
//! screen-off into a reset countdown instead; releasing early cancels it.

use log::{debug, info};

use super::page::{Page, Rotation};
use crate::elapsed_ms;
use crate::input::{ButtonSample, Gesture, LONG_HOLD_MS};
use crate::traits::Display;

/// Press duration after which the reset countdown overlay appears
pub const COUNTDOWN_START_MS: u32 = 2000;

/// Inactivity after which the screen is switched off
pub const IDLE_SCREEN_OFF_MS: u32 = 60_000;

/// Default time each page stays up while cycling
pub const DEFAULT_PAGE_DWELL_MS: u32 = 5000;

/// Kind of redraw requested from the display
///
/// Ordered so that merging two requests keeps the larger one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Refresh {
    /// Update dynamic values only
    Values,
    /// Redraw the static layout as well
    Full,
}

/// Screen power, page, and rotation state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionState {
    pub screen_on: bool,
    /// A Hold asked for screen-off; applied on release
    pub screen_off_deferred: bool,
    pub countdown_active: bool,
    /// Last countdown value drawn
    pub countdown_shown: Option<u8>,
    pub last_activity_ms: u32,
    pub page: Page,
    pub last_page_change_ms: u32,
    pub rotation: Rotation,
    pub page_dwell_ms: u32,
    pub pending_refresh: Option<Refresh>,
}

/// Orchestrates UI transitions from gestures and activity
#[derive(Debug, Clone)]
pub struct InteractionController {
    state: InteractionState,
}

impl InteractionController {
    /// Create a controller with the screen on and a full redraw pending
    pub fn new(rotation: Rotation, page_dwell_ms: u32, now_ms: u32) -> Self {
        Self {
            state: InteractionState {
                screen_on: true,
                screen_off_deferred: false,
                countdown_active: false,
                countdown_shown: None,
                last_activity_ms: now_ms,
                page: Page::Identity,
                last_page_change_ms: now_ms,
                rotation,
                page_dwell_ms,
                pending_refresh: Some(Refresh::Full),
            },
        }
    }

    /// Apply one classifier tick
    ///
    /// Returns true when a factory reset was requested.
    pub fn update<D: Display>(
        &mut self,
        display: &mut D,
        sample: ButtonSample,
        provisioning: bool,
        now_ms: u32,
    ) -> bool {
        let mut reset_requested = false;

        if let Some(gesture) = sample.gesture {
            self.state.last_activity_ms = now_ms;

            match gesture {
                Gesture::Click => {
                    if !self.state.screen_on {
                        self.set_screen(display, true);
                        self.request_refresh(Refresh::Full);
                    } else if !provisioning {
                        self.state.page = self.state.page.next();
                        self.state.last_page_change_ms = now_ms;
                        self.request_refresh(Refresh::Full);
                    }
                }
                Gesture::DoubleClick => {
                    let rotation = self.state.rotation.toggled();
                    self.set_rotation(display, rotation);
                    if !provisioning {
                        self.request_refresh(Refresh::Full);
                    }
                }
                Gesture::Hold => {
                    if !self.state.screen_on {
                        self.set_screen(display, true);
                        self.request_refresh(Refresh::Full);
                    } else {
                        self.state.screen_off_deferred = true;
                    }
                }
                Gesture::LongHold => {
                    info!("factory reset requested");
                    reset_requested = true;
                }
            }
        }

        if sample.pressed && sample.press_duration_ms > COUNTDOWN_START_MS {
            self.state.screen_off_deferred = false;
            if !self.state.screen_on {
                self.set_screen(display, true);
            }

            let remaining_ms = LONG_HOLD_MS.saturating_sub(sample.press_duration_ms);
            let remaining = remaining_ms.div_ceil(1000) as u8;
            if self.state.countdown_shown != Some(remaining) {
                display.show_reset_countdown(remaining, !self.state.countdown_active);
                self.state.countdown_active = true;
                self.state.countdown_shown = Some(remaining);
            }
        }

        if !sample.pressed {
            if self.state.screen_off_deferred {
                self.state.screen_off_deferred = false;
                self.set_screen(display, false);
            }
            if self.state.countdown_active {
                debug!("reset countdown cancelled");
                self.state.countdown_active = false;
                self.state.countdown_shown = None;
                self.request_refresh(Refresh::Full);
            }
        }

        if self.state.screen_on
            && elapsed_ms(now_ms, self.state.last_activity_ms) > IDLE_SCREEN_OFF_MS
        {
            debug!("idle, screen off");
            self.set_screen(display, false);
            self.state.screen_off_deferred = false;
        }

        reset_requested
    }

    /// Record inbound activity, waking the screen if it was off
    pub fn notify_activity<D: Display>(&mut self, display: &mut D, now_ms: u32) {
        self.state.last_activity_ms = now_ms;
        if !self.state.screen_on {
            self.set_screen(display, true);
        }
    }

    /// Jump to `page` and restart its dwell timer
    pub fn focus_page(&mut self, page: Page, now_ms: u32) {
        if self.state.page != page {
            self.state.page = page;
            self.request_refresh(Refresh::Full);
        }
        self.state.last_page_change_ms = now_ms;
    }

    /// Advance to the next page once the dwell time has passed
    ///
    /// Only cycles while the host is connected, the screen is on, and no
    /// reset countdown is showing. Returns true if the page changed.
    pub fn cycle_pages(&mut self, connected: bool, now_ms: u32) -> bool {
        if !connected || !self.state.screen_on || self.state.countdown_active {
            return false;
        }
        if elapsed_ms(now_ms, self.state.last_page_change_ms) <= self.state.page_dwell_ms {
            return false;
        }

        self.state.page = self.state.page.next();
        self.state.last_page_change_ms = now_ms;
        self.request_refresh(Refresh::Full);
        true
    }

    /// Ask for a redraw; merged with any pending request
    pub fn request_refresh(&mut self, refresh: Refresh) {
        self.state.pending_refresh = Some(match self.state.pending_refresh {
            Some(pending) => pending.max(refresh),
            None => refresh,
        });
    }

    /// Take the pending redraw
    ///
    /// Held back while the reset countdown owns the screen.
    pub fn take_refresh(&mut self) -> Option<Refresh> {
        if self.state.countdown_active {
            return None;
        }
        self.state.pending_refresh.take()
    }

    pub fn set_rotation<D: Display>(&mut self, display: &mut D, rotation: Rotation) {
        self.state.rotation = rotation;
        display.set_rotation(rotation);
    }

    pub fn set_page_dwell(&mut self, page_dwell_ms: u32) {
        self.state.page_dwell_ms = page_dwell_ms;
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn page(&self) -> Page {
        self.state.page
    }

    pub fn rotation(&self) -> Rotation {
        self.state.rotation
    }

    pub fn is_screen_on(&self) -> bool {
        self.state.screen_on
    }

    pub fn is_countdown_active(&self) -> bool {
        self.state.countdown_active
    }

    pub fn last_page_change_ms(&self) -> u32 {
        self.state.last_page_change_ms
    }

    fn set_screen<D: Display>(&mut self, display: &mut D, on: bool) {
        self.state.screen_on = on;
        display.set_backlight(on);
    }
}
