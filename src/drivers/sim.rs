//! Host-side simulation of GPIO lines and the blocking delay.
//!
//! Every line write and delay is appended to a trace shared by the whole
//! [`SimBus`], so tests can assert the exact order of an actuation
//! sequence across several pins.  Delays are recorded, not slept.

use core::cell::{Cell, RefCell};
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorKind, ErrorType, InputPin, OutputPin};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimOp {
    Write { line: &'static str, high: bool },
    Delay { ns: u64 },
}

type Trace = Rc<RefCell<Vec<SimOp>>>;

#[derive(Default)]
pub struct SimBus {
    trace: Trace,
}

impl SimBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output(&self, line: &'static str) -> SimOutputPin {
        SimOutputPin {
            line,
            fail: false,
            trace: Rc::clone(&self.trace),
        }
    }

    /// An output whose writes always fail (nothing is traced for it).
    pub fn failing_output(&self, line: &'static str) -> SimOutputPin {
        SimOutputPin {
            fail: true,
            ..self.output(line)
        }
    }

    pub fn delay(&self) -> SimDelay {
        SimDelay {
            trace: Rc::clone(&self.trace),
        }
    }

    pub fn trace(&self) -> Vec<SimOp> {
        self.trace.borrow().clone()
    }

    pub fn clear(&self) {
        self.trace.borrow_mut().clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimPinError;

impl embedded_hal::digital::Error for SimPinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

pub struct SimOutputPin {
    line: &'static str,
    fail: bool,
    trace: Trace,
}

impl SimOutputPin {
    fn write(&mut self, high: bool) -> Result<(), SimPinError> {
        if self.fail {
            return Err(SimPinError);
        }
        self.trace.borrow_mut().push(SimOp::Write {
            line: self.line,
            high,
        });
        Ok(())
    }
}

impl ErrorType for SimOutputPin {
    type Error = SimPinError;
}

impl OutputPin for SimOutputPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(true)
    }
}

/// Input line whose level is set from the test.  Clones share the level.
#[derive(Clone, Default)]
pub struct SimInputPin {
    level: Rc<Cell<bool>>,
    fail: Rc<Cell<bool>>,
}

impl SimInputPin {
    pub fn new(high: bool) -> Self {
        let pin = Self::default();
        pin.set(high);
        pin
    }

    pub fn set(&self, high: bool) {
        self.level.set(high);
    }

    /// Make subsequent reads fail.
    pub fn set_failing(&self, fail: bool) {
        self.fail.set(fail);
    }
}

impl ErrorType for SimInputPin {
    type Error = SimPinError;
}

impl InputPin for SimInputPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        if self.fail.get() {
            return Err(SimPinError);
        }
        Ok(self.level.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

pub struct SimDelay {
    trace: Trace,
}

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.trace.borrow_mut().push(SimOp::Delay { ns: u64::from(ns) });
    }

    fn delay_us(&mut self, us: u32) {
        self.trace
            .borrow_mut()
            .push(SimOp::Delay { ns: u64::from(us) * 1_000 });
    }

    fn delay_ms(&mut self, ms: u32) {
        self.trace
            .borrow_mut()
            .push(SimOp::Delay { ns: u64::from(ms) * 1_000_000 });
    }
}
