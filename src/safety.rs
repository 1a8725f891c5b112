//! Reservoir watch.
//!
//! Runs every loop iteration after the station tick.  When the float
//! switch reports low water it raises [`AppEvent::WaterLevelLow`], at most
//! once per `water_check_interval_secs`, so a reservoir that stays empty
//! produces one reminder a day instead of one per loop.
//!
//! ## Alert lifecycle
//!
//! 1. The first low reading after boot alerts immediately.  There is no
//!    boot grace period: a reservoir already empty at power-up is reported
//!    at second 0, not one interval later.
//! 2. Further low readings are suppressed until the interval has elapsed
//!    since the last alert.
//! 3. Refilling does not reset the throttle; a level that flaps around the
//!    float still alerts at most once per interval.

use embedded_hal::digital::InputPin;
use log::warn;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::sensors::water_level::FloatSwitch;

pub struct ReservoirWatch {
    interval_secs: u32,
    /// Station-clock second of the last alert.
    last_alert: Option<u32>,
}

impl ReservoirWatch {
    pub fn new(interval_secs: u32) -> Self {
        Self {
            interval_secs,
            last_alert: None,
        }
    }

    /// Decide whether a reading at `now` warrants an alert.
    pub fn poll(&mut self, level_low: bool, now: u32) -> bool {
        if !level_low {
            return false;
        }
        if let Some(last) = self.last_alert {
            if now.wrapping_sub(last) < self.interval_secs {
                return false;
            }
        }
        self.last_alert = Some(now);
        warn!("Water level low");
        true
    }

    /// Sample the switch and emit an alert through `sink` if due.
    pub fn evaluate<P: InputPin>(
        &mut self,
        switch: &mut FloatSwitch<P>,
        now: u32,
        sink: &mut impl EventSink,
    ) -> bool {
        let alert = self.poll(switch.read_low(), now);
        if alert {
            sink.emit(&AppEvent::WaterLevelLow);
        }
        alert
    }
}
