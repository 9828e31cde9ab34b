//! GPIO pin abstractions

/// Digital input pin
///
/// Implementations should handle the actual hardware register reading
/// for the specific chip, including any pull-up configuration.
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Active-low push button wired to an [`InputPin`] with a pull-up
///
/// The pin idles high; pressing the button pulls it to ground.
pub struct ActiveLowButton<P> {
    pin: P,
}

impl<P: InputPin> ActiveLowButton<P> {
    /// Wrap a pulled-up input pin
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Sample the raw (undebounced) pressed level
    pub fn is_pressed(&self) -> bool {
        self.pin.is_low()
    }

    /// Release the underlying pin
    pub fn into_inner(self) -> P {
        self.pin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    struct FakePin(Cell<bool>);

    impl InputPin for FakePin {
        fn is_high(&self) -> bool {
            self.0.get()
        }
    }

    #[test]
    fn test_active_low_mapping() {
        let button = ActiveLowButton::new(FakePin(Cell::new(true)));
        assert!(!button.is_pressed());

        let pin = button.into_inner();
        pin.0.set(false);
        let button = ActiveLowButton::new(pin);
        assert!(button.is_pressed());
    }
}
