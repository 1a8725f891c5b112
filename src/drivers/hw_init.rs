//! One-shot hardware peripheral initialization.
//!
//! Claims the valve and float-switch GPIOs listed in [`pins`] and wraps
//! them in the drivers.  Called once from `main()` before the control
//! loop starts.

use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{AnyInputPin, AnyOutputPin, Input, Output, PinDriver, Pull};
use log::info;

use crate::drivers::valve::LatchingValve;
use crate::error::Error;
use crate::pins;
use crate::sensors::water_level::FloatSwitch;

pub type OutputLine = PinDriver<'static, AnyOutputPin, Output>;
pub type EspValve = LatchingValve<OutputLine, OutputLine, FreeRtos>;
pub type EspFloatSwitch = FloatSwitch<PinDriver<'static, AnyInputPin, Input>>;

/// Configure both valve lines as outputs and drive the valve closed.
pub fn init_valve(pulse_width_ms: u32) -> Result<EspValve, Error> {
    // SAFETY: each valve GPIO is claimed exactly once, here, from the
    // single main task before the control loop starts.
    let (control, enable) = unsafe {
        (
            AnyOutputPin::new(pins::VALVE_CONTROL_GPIO),
            AnyOutputPin::new(pins::VALVE_ENABLE_GPIO),
        )
    };
    let control = PinDriver::output(control).map_err(|_| Error::Init("valve control line"))?;
    let enable = PinDriver::output(enable).map_err(|_| Error::Init("valve enable line"))?;

    let valve = LatchingValve::new(control, enable, FreeRtos, pulse_width_ms);
    info!(
        "hw_init: valve on GPIO{}/{} ({}ms pulse)",
        pins::VALVE_CONTROL_GPIO,
        pins::VALVE_ENABLE_GPIO,
        pulse_width_ms
    );
    Ok(valve)
}

/// Configure the float switch input with its pull-up.
pub fn init_float_switch() -> Result<EspFloatSwitch, Error> {
    // SAFETY: same single-claim discipline as `init_valve`.
    let pin = unsafe { AnyInputPin::new(pins::WATER_LEVEL_GPIO) };
    let mut driver = PinDriver::input(pin).map_err(|_| Error::Init("float switch line"))?;
    driver
        .set_pull(Pull::Up)
        .map_err(|_| Error::Init("float switch pull-up"))?;
    info!("hw_init: float switch on GPIO{}", pins::WATER_LEVEL_GPIO);
    Ok(FloatSwitch::new(driver))
}
