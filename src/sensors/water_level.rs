//! Reservoir float switch.
//!
//! A single float switch wired to a pull-up input: the float closes the
//! contact to ground when the water drops below it, so LOW = water low.
//! A failed read is reported as "not low"; a flaky line must not spam
//! low-water alerts.

use embedded_hal::digital::{Error as _, InputPin};
use log::warn;

pub struct FloatSwitch<P> {
    pin: P,
    last_low: bool,
}

impl<P: InputPin> FloatSwitch<P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            last_low: false,
        }
    }

    /// Sample the switch.  Returns `true` when the water level is low.
    pub fn read_low(&mut self) -> bool {
        self.last_low = match self.pin.is_low() {
            Ok(low) => low,
            Err(e) => {
                warn!("Float switch read failed ({:?})", e.kind());
                false
            }
        };
        self.last_low
    }

    /// Result of the most recent [`read_low`](Self::read_low).
    pub fn needs_refill(&self) -> bool {
        self.last_low
    }
}
