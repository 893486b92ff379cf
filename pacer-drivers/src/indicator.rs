//! GPIO cadence indicator
//!
//! Drives an LED (directly or via a transistor) from a GPIO pin.

use embedded_hal::digital::OutputPin;
use pacer_core::traits::Indicator;

/// GPIO indicator output
///
/// The pin can be configured as active-high (default) or active-low.
pub struct GpioIndicator<P> {
    pin: P,
    /// If true, indicator ON = pin LOW
    inverted: bool,
    /// Current logical state
    on: bool,
}

impl<P: OutputPin> GpioIndicator<P> {
    /// Create a new GPIO indicator
    ///
    /// # Arguments
    /// - `pin`: The GPIO pin to control
    /// - `inverted`: If true, the indicator is lit when the pin is LOW
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut indicator = Self {
            pin,
            inverted,
            on: false,
        };
        indicator.set_on(false);
        indicator
    }

    /// Create a new GPIO indicator with active-high output
    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    /// Create a new GPIO indicator with active-low output
    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }

    /// Check if the indicator is lit
    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Release the pin
    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> Indicator for GpioIndicator<P> {
    fn set_on(&mut self, on: bool) {
        self.on = on;

        let result = if on != self.inverted {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };

        if result.is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Indicator pin write failed");
        }
    }
}
