//! Outbound application events.
//!
//! The [`StationService`](super::service::StationService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on
//! the other side decide what to do with them: log to serial, push a
//! notification, etc.  The core has no delivery or retry responsibility.

use super::commands::SUPPORTED_STATION;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The control loop has started.
    Started,

    /// A valve lifecycle transition.
    Station(StationEvent),

    /// The reservoir float switch reports low water.
    WaterLevelLow,
}

impl AppEvent {
    /// Short human-readable text suitable for a push notification.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Started => "Remote station started",
            Self::Station(e) => e.reason(),
            Self::WaterLevelLow => "Water level low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationEventKind {
    Opened,
    ClosedByCommand,
    ClosedByTimer,
}

/// A valve transition on a given station.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StationEvent {
    pub kind: StationEventKind,
    pub station_id: u8,
}

impl StationEvent {
    pub fn new(kind: StationEventKind) -> Self {
        Self {
            kind,
            station_id: SUPPORTED_STATION,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self.kind {
            StationEventKind::Opened => "Valve opened",
            StationEventKind::ClosedByCommand => "Valve closed",
            StationEventKind::ClosedByTimer => "Valve closed by timer",
        }
    }
}
