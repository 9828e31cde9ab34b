//! Gestures produced by the button classifier

/// A classified button gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gesture {
    /// Press and release with no second press inside the double-click window
    Click,
    /// Second press started inside the double-click window
    DoubleClick,
    /// Press held past the hold threshold (reported once per press)
    Hold,
    /// Press held past the factory-reset threshold (reported once per press)
    LongHold,
}

impl Gesture {
    /// Check if this gesture is reported while the button is still down
    pub fn is_held(&self) -> bool {
        matches!(self, Gesture::Hold | Gesture::LongHold)
    }
}

/// Everything the interaction layer needs from one classifier tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonSample {
    /// Gesture completed on this tick, if any
    pub gesture: Option<Gesture>,
    /// Debounced level
    pub pressed: bool,
    /// Time the current press has lasted (0 when released)
    pub press_duration_ms: u32,
}

impl ButtonSample {
    /// A released, idle button
    pub const IDLE: ButtonSample = ButtonSample {
        gesture: None,
        pressed: false,
        press_duration_ms: 0,
    };
}
