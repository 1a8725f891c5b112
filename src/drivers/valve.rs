//! Latching (bistable) valve driver, e.g. via an H-bridge motor shield.
//!
//! Two output lines: the control line selects the direction (HIGH = open,
//! LOW = close) and the enable line powers the bridge.  A fixed-width
//! pulse on the enable line moves the valve, which then holds its
//! position unpowered.
//!
//! ## Actuation contract
//!
//! - Every call to `open()`/`close()` sends a full pulse, even if the
//!   valve is already in that position.  Callers guard against redundant
//!   pulses; this driver is a dumb actuator.
//! - The pulse blocks the calling thread for `pulse_width_ms`.
//! - There is no position feedback.  `is_open()` is the last commanded
//!   state and a stuck valve cannot be detected.  Line write errors are
//!   logged and the sequence carries on, so the enable line is always
//!   driven low at the end of a pulse.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{Error as _, OutputPin, PinState};
use log::{debug, info, warn};

use crate::app::ports::ValvePort;

const OPEN_LEVEL: PinState = PinState::High;
const CLOSED_LEVEL: PinState = PinState::Low;

pub struct LatchingValve<C, E, D> {
    control: C,
    enable: E,
    delay: D,
    pulse_width_ms: u32,
    is_open: bool,
    pulses: u32,
}

impl<C: OutputPin, E: OutputPin, D: DelayNs> LatchingValve<C, E, D> {
    /// Take ownership of the lines and drive the valve closed.
    ///
    /// The closing pulse is sent unconditionally: after a reset the
    /// physical position is unknown.
    pub fn new(control: C, enable: E, delay: D, pulse_width_ms: u32) -> Self {
        let mut valve = Self {
            control,
            enable,
            delay,
            pulse_width_ms,
            is_open: false,
            pulses: 0,
        };
        drive(&mut valve.control, CLOSED_LEVEL, "control");
        drive(&mut valve.enable, PinState::Low, "enable");
        valve.close();
        valve
    }

    fn pulse(&mut self, direction: PinState) {
        debug!("Valve: {}ms pulse, control={:?}", self.pulse_width_ms, direction);
        drive(&mut self.control, direction, "control");
        drive(&mut self.enable, PinState::High, "enable");
        self.delay.delay_ms(self.pulse_width_ms);
        drive(&mut self.enable, PinState::Low, "enable");
        self.pulses = self.pulses.wrapping_add(1);
    }

    /// Pulses sent since construction (including the initial close).
    pub fn pulse_count(&self) -> u32 {
        self.pulses
    }
}

impl<C: OutputPin, E: OutputPin, D: DelayNs> ValvePort for LatchingValve<C, E, D> {
    fn open(&mut self) {
        self.pulse(OPEN_LEVEL);
        self.is_open = true;
        info!("Valve opened");
    }

    fn close(&mut self) {
        self.pulse(CLOSED_LEVEL);
        self.is_open = false;
        info!("Valve closed");
    }

    fn is_open(&self) -> bool {
        self.is_open
    }
}

fn drive<P: OutputPin>(pin: &mut P, level: PinState, line: &str) {
    if let Err(e) = pin.set_state(level) {
        warn!("Valve: {} line write failed ({:?})", line, e.kind());
    }
}
