//! GPIO heater output
//!
//! Drives the heating element through a GPIO pin (directly or via an
//! SSR/MOSFET). Pin errors cannot be reported through
//! [`HeaterOutput::set_on`]; on MCU GPIOs they are infallible.

use embedded_hal::digital::OutputPin;

use reflow_core::traits::HeaterOutput;

/// Heater element behind a GPIO pin
///
/// The pin can be configured as active-high (default) or active-low for
/// SSRs with inverted inputs.
pub struct GpioHeater<P> {
    pin: P,
    /// If true, heater ON = pin LOW
    inverted: bool,
    /// Current logical state (true = heater on)
    on: bool,
}

impl<P: OutputPin> GpioHeater<P> {
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut heater = Self {
            pin,
            inverted,
            on: false,
        };
        // The element must start off
        heater.set_on(false);
        heater
    }

    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }
}

impl<P: OutputPin> HeaterOutput for GpioHeater<P> {
    fn set_on(&mut self, on: bool) {
        self.on = on;

        if on != self.inverted {
            let _ = self.pin.set_high();
        } else {
            let _ = self.pin.set_low();
        }
    }

    fn is_on(&self) -> bool {
        self.on
    }
}
