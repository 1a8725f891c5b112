//! Station service: the hexagonal core.
//!
//! [`StationService`] owns the clock and the countdown timer of the single
//! supported station.  The valve and the event sink are injected at each
//! call site, so the whole service runs on the host against mock adapters.
//!
//! ```text
//!  StationCommand ──▶ ┌──────────────────────┐ ──▶ EventSink
//!                     │    StationService    │
//!       ValvePort ◀── │   Clock · Timer      │
//!                     └──────────────────────┘
//! ```
//!
//! State space is `{Closed, Open} × {Disarmed, Armed}`, driven by
//! [`apply`](StationService::apply) and [`tick`](StationService::tick).
//! Within one call the valve is always mutated (and its event emitted)
//! before the timer changes.

use log::{info, warn};

use super::clock::Clock;
use super::commands::{
    CommandOutcome, StationCommand, StationLimits, TimerAction, ValidCommand, ValveAction,
};
use super::events::{AppEvent, StationEvent, StationEventKind};
use super::ports::{EventSink, MillisSource, ValvePort};
use super::timer::CountdownTimer;

/// Read-only view for the status page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StationStatus {
    pub is_open: bool,
    /// `None` when no timer is armed.
    pub seconds_remaining: Option<u32>,
}

impl StationStatus {
    /// Remaining seconds with the protocol's `-1` for "no timer".
    pub fn remaining_or_unarmed(&self) -> i64 {
        self.seconds_remaining.map_or(-1, i64::from)
    }
}

pub struct StationService<S> {
    clock: Clock<S>,
    timer: CountdownTimer,
    limits: StationLimits,
    applied: u32,
    rejected: u32,
}

impl<S: MillisSource> StationService<S> {
    pub fn new(limits: StationLimits, millis: S) -> Self {
        Self {
            clock: Clock::new(millis),
            timer: CountdownTimer::new(limits.max_arm_duration_secs),
            limits,
            applied: 0,
            rejected: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started);
        info!(
            "StationService started (cycle limit {}s, timer cap {}s)",
            self.limits.max_command_duration_secs, self.limits.max_arm_duration_secs
        );
    }

    // ── Command handling ──────────────────────────────────────

    /// Validate and apply one set-valve command.
    ///
    /// Malformed commands are dropped without touching the valve or the
    /// timer and without emitting anything; the outcome is returned for
    /// logging only.
    pub fn apply(
        &mut self,
        cmd: StationCommand,
        valve: &mut impl ValvePort,
        sink: &mut impl EventSink,
    ) -> CommandOutcome {
        info!(
            "Set valve request: sid={} en={} t={}",
            cmd.station_id, cmd.enable, cmd.duration_secs
        );

        let valid = match cmd.validate(&self.limits) {
            Ok(valid) => valid,
            Err(reason) => {
                warn!("Ignoring set valve request: {}", reason);
                self.rejected = self.rejected.wrapping_add(1);
                return CommandOutcome::Rejected(reason);
            }
        };
        self.applied = self.applied.wrapping_add(1);

        match valid {
            ValidCommand::Open { duration_secs } => {
                let valve_action = if valve.is_open() {
                    ValveAction::Unchanged
                } else {
                    valve.open();
                    emit_station(sink, StationEventKind::Opened);
                    ValveAction::Opened
                };

                let now = self.clock.now();
                let timer_action = match self.timer.set(duration_secs, now) {
                    Ok(()) => TimerAction::Armed { duration_secs },
                    Err(refused) => {
                        warn!("Timer not armed ({}), valve left under manual control", refused);
                        self.timer.clear();
                        TimerAction::ArmRefused { duration_secs }
                    }
                };

                CommandOutcome::Applied {
                    valve: valve_action,
                    timer: timer_action,
                }
            }
            ValidCommand::Close => {
                let valve_action = if valve.is_open() {
                    valve.close();
                    emit_station(sink, StationEventKind::ClosedByCommand);
                    ValveAction::Closed
                } else {
                    ValveAction::Unchanged
                };

                let timer_action = if self.timer.is_armed() {
                    self.timer.clear();
                    TimerAction::Cleared
                } else {
                    TimerAction::Unchanged
                };

                CommandOutcome::Applied {
                    valve: valve_action,
                    timer: timer_action,
                }
            }
        }
    }

    // ── Per-iteration orchestration ───────────────────────────

    /// Close the valve if the timer has expired.  Returns `true` when the
    /// timer fired on this call.
    pub fn tick(&mut self, valve: &mut impl ValvePort, sink: &mut impl EventSink) -> bool {
        let now = self.clock.now();
        if !self.timer.is_triggered(now) {
            return false;
        }

        info!("Timer triggered");
        if valve.is_open() {
            valve.close();
            emit_station(sink, StationEventKind::ClosedByTimer);
        }
        self.timer.clear();
        true
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn status(&mut self, valve: &impl ValvePort) -> StationStatus {
        let now = self.clock.now();
        StationStatus {
            is_open: valve.is_open(),
            seconds_remaining: self.timer.remaining(now),
        }
    }

    /// Current station clock reading in seconds.
    pub fn now(&mut self) -> u32 {
        self.clock.now()
    }

    /// Seed the station clock (e.g. after SNTP).  Never moves it backward.
    ///
    /// A pending timer is shifted by the same jump so its remaining time
    /// is preserved.
    pub fn seed_clock(&mut self, seconds: u32) -> u32 {
        let before = self.clock.now();
        let after = self.clock.set(seconds);
        self.timer.rebase(after.wrapping_sub(before));
        after
    }

    pub fn is_timer_armed(&self) -> bool {
        self.timer.is_armed()
    }

    /// `(applied, rejected)` command counts since boot.
    pub fn command_counts(&self) -> (u32, u32) {
        (self.applied, self.rejected)
    }
}

fn emit_station(sink: &mut impl EventSink, kind: StationEventKind) {
    sink.emit(&AppEvent::Station(StationEvent::new(kind)));
}
