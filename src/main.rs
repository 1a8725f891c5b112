//! Remote Station Firmware Main Entry Point
//!
//! One latching valve driven over HTTP by an OpenSprinkler controller.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HTTP server ──post()──▶ CommandMailbox    StatusBoard ◀─┐     │
//! │  LogEventSink  PushoverNotifier  NvsAdapter  SystemMillis│     │
//! │                                                          │     │
//! │  ──────────────── Port Trait Boundary ───────────────────│     │
//! │                                                          │     │
//! │  ┌────────────────────────────────────────────────────┐  │     │
//! │  │        StationService (pure logic, loop-owned)     │──┘     │
//! │  │  Clock · CountdownTimer · command validation       │        │
//! │  └────────────────────────────────────────────────────┘        │
//! │                                                                │
//! │  LatchingValve · FloatSwitch + ReservoirWatch                  │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::peripherals::Peripherals;
use log::{debug, error, info, warn};

use remote_station::adapters::log_sink::LogEventSink;
use remote_station::adapters::nvs::NvsAdapter;
use remote_station::adapters::pushover::PushoverNotifier;
use remote_station::adapters::time::SystemMillis;
use remote_station::adapters::{http, wifi};
use remote_station::app::ports::ConfigPort;
use remote_station::app::service::StationService;
use remote_station::config::StationConfig;
use remote_station::drivers::hw_init;
use remote_station::events::{CommandMailbox, StatusBoard};
use remote_station::safety::ReservoirWatch;

static MAILBOX: CommandMailbox = CommandMailbox::new();
static STATUS: StatusBoard = StatusBoard::new();

/// Pause before restarting after a failed network bring-up.
const RESTART_DELAY_MS: u32 = 5_000;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Remote Station v{}               ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Load config from NVS (or defaults) ─────────────────
    let config = match NvsAdapter::new().and_then(|nvs| nvs.load()) {
        Ok(cfg) => match cfg.validate() {
            Ok(()) => cfg,
            Err(e) => {
                warn!("Stored config invalid ({}), using defaults", e);
                StationConfig::default()
            }
        },
        Err(e) => {
            warn!("NVS config load failed ({}), using defaults", e);
            StationConfig::default()
        }
    };

    // ── 3. Peripherals (valve is driven closed here) ──────────
    let mut valve = hw_init::init_valve(config.pulse_width_ms)?;
    let mut float_switch = hw_init::init_float_switch()?;

    // ── 4. Network ────────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let _wifi = match wifi::connect(peripherals.modem, sysloop, &config) {
        Ok(w) => w,
        Err(e) => {
            error!("WiFi bring-up failed: {:#}, restarting", e);
            FreeRtos::delay_ms(RESTART_DELAY_MS);
            esp_idf_svc::hal::reset::restart();
        }
    };
    let _server = http::start(&MAILBOX, &STATUS, config.firmware_version)?;

    // ── 5. App service and sinks ──────────────────────────────
    let notifier = config
        .pushover
        .clone()
        .map(|creds| PushoverNotifier::new(creds, &config.hostname));
    let mut sinks = (LogEventSink::new(), notifier);

    let mut station = StationService::new(config.limits(), SystemMillis::new());
    let mut reservoir = ReservoirWatch::new(config.water_check_interval_secs);
    station.start(&mut sinks);

    info!("System ready. Entering control loop.");

    // ── 6. Control loop ───────────────────────────────────────
    loop {
        MAILBOX.drain(|cmd| {
            let outcome = station.apply(cmd, &mut valve, &mut sinks);
            debug!("{:?} -> {:?}", cmd, outcome);
        });

        station.tick(&mut valve, &mut sinks);
        STATUS.publish(&station.status(&valve));

        let now = station.now();
        reservoir.evaluate(&mut float_switch, now, &mut sinks);

        FreeRtos::delay_ms(config.loop_interval_ms);
    }
}
