//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing one line per application event to
//! the logger (UART / USB-CDC on the device, stderr on the host).

use log::{info, warn};

use crate::app::events::{AppEvent, StationEventKind};
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => info!("START | remote station online"),
            AppEvent::Station(e) => {
                let what = match e.kind {
                    StationEventKind::Opened => "opened",
                    StationEventKind::ClosedByCommand => "closed",
                    StationEventKind::ClosedByTimer => "closed by timer",
                };
                info!("VALVE | {} | station={}", what, e.station_id);
            }
            AppEvent::WaterLevelLow => warn!("WATER | level low"),
        }
    }
}
