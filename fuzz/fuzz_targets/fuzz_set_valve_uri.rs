//! Fuzz target: arbitrary request URIs through the protocol parser and
//! the station service.
//!
//! The valve may open or close at most once per request, and a timer may
//! only be running while the valve is open.

#![no_main]

use libfuzzer_sys::fuzz_target;
use remote_station::app::commands::{StationCommand, StationLimits};
use remote_station::app::events::AppEvent;
use remote_station::app::ports::{EventSink, MillisSource, ValvePort};
use remote_station::app::service::StationService;
use remote_station::protocol::{QueryArgs, Route, render_status_page, split_uri};

struct Frozen;

impl MillisSource for Frozen {
    fn millis(&self) -> u32 {
        0
    }
}

#[derive(Default)]
struct Valve {
    open: bool,
    pulses: u32,
}

impl ValvePort for Valve {
    fn open(&mut self) {
        self.open = true;
        self.pulses += 1;
    }

    fn close(&mut self) {
        self.open = false;
        self.pulses += 1;
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

struct Discard;

impl EventSink for Discard {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let Ok(uri) = core::str::from_utf8(data) else {
        return;
    };

    let mut station = StationService::new(StationLimits::default(), Frozen);
    let mut valve = Valve::default();

    for request in uri.split('\n') {
        let (path, query) = split_uri(request);
        if let Route::SetValve { .. } = Route::from_path(path) {
            let before = valve.pulses;
            let cmd = StationCommand::from_query(&QueryArgs::parse(query));
            station.apply(cmd, &mut valve, &mut Discard);
            assert!(valve.pulses - before <= 1);
        }
        let status = station.status(&valve);
        if status.seconds_remaining.is_some() {
            assert!(status.is_open);
        }
        let _ = render_status_page(&status);
    }
});
