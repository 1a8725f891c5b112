//! Mock hardware adapters for integration tests.
//!
//! Records every valve call and every emitted event so tests can assert
//! on the full history without touching real GPIO.

use std::cell::Cell;
use std::rc::Rc;

use remote_station::app::commands::{CommandOutcome, StationCommand, StationLimits};
use remote_station::app::events::{AppEvent, StationEvent, StationEventKind};
use remote_station::app::ports::{EventSink, MillisSource, ValvePort};
use remote_station::app::service::StationService;

// ── Valve call record ─────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValveCall {
    Open,
    Close,
}

// ── MockValve ─────────────────────────────────────────────────

#[derive(Default)]
pub struct MockValve {
    pub calls: Vec<ValveCall>,
    open: bool,
}

#[allow(dead_code)]
impl MockValve {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open_now(&self) -> bool {
        self.open
    }

    pub fn pulses(&self) -> usize {
        self.calls.len()
    }
}

impl ValvePort for MockValve {
    fn open(&mut self) {
        self.calls.push(ValveCall::Open);
        self.open = true;
    }

    fn close(&mut self) {
        self.calls.push(ValveCall::Close);
        self.open = false;
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

// ── FakeMillis ────────────────────────────────────────────────

/// Hand-cranked millisecond counter.  Clones share the same counter.
#[derive(Clone, Default)]
pub struct FakeMillis(Rc<Cell<u32>>);

#[allow(dead_code)]
impl FakeMillis {
    pub fn starting_at(ms: u32) -> Self {
        Self(Rc::new(Cell::new(ms)))
    }

    pub fn advance_ms(&self, ms: u32) {
        self.0.set(self.0.get().wrapping_add(ms));
    }

    pub fn advance_secs(&self, secs: u32) {
        for _ in 0..secs {
            self.advance_ms(1_000);
        }
    }
}

impl MillisSource for FakeMillis {
    fn millis(&self) -> u32 {
        self.0.get()
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Valve transitions only, in emission order.
    pub fn station_kinds(&self) -> Vec<StationEventKind> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Station(StationEvent { kind, .. }) => Some(*kind),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}

// ── Fixture ───────────────────────────────────────────────────

pub struct Rig {
    pub station: StationService<FakeMillis>,
    pub valve: MockValve,
    pub sink: RecordingSink,
    pub clock: FakeMillis,
}

#[allow(dead_code)]
impl Rig {
    pub fn new() -> Self {
        Self::with_clock(FakeMillis::default())
    }

    pub fn with_clock(clock: FakeMillis) -> Self {
        Self {
            station: StationService::new(StationLimits::default(), clock.clone()),
            valve: MockValve::new(),
            sink: RecordingSink::new(),
            clock,
        }
    }

    pub fn apply(&mut self, station_id: i32, enable: i32, duration_secs: i32) -> CommandOutcome {
        let cmd = StationCommand::new(station_id, enable, duration_secs);
        self.station.apply(cmd, &mut self.valve, &mut self.sink)
    }

    pub fn tick(&mut self) -> bool {
        self.station.tick(&mut self.valve, &mut self.sink)
    }
}
