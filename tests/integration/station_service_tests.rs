//! Integration tests for the StationService → valve → events pipeline.
//!
//! These run on the host and drive the service exactly as the control
//! loop does: commands through `apply`, expiry through `tick`, time
//! through a hand-cranked millisecond counter.

use super::mock_hw::{FakeMillis, MockValve, RecordingSink, Rig, ValveCall};

use remote_station::app::commands::{
    CommandOutcome, RejectReason, StationCommand, StationLimits, TimerAction, ValveAction,
};
use remote_station::app::events::{AppEvent, StationEventKind};
use remote_station::app::service::{StationService, StationStatus};

// ── Scenario A: open with timer, close on expiry ─────────────

#[test]
fn timed_open_closes_itself_after_expiry() {
    let mut rig = Rig::new();

    let outcome = rig.apply(0, 1, 120);
    assert_eq!(
        outcome,
        CommandOutcome::Applied {
            valve: ValveAction::Opened,
            timer: TimerAction::Armed { duration_secs: 120 },
        }
    );
    assert!(rig.valve.is_open_now());
    assert_eq!(rig.sink.station_kinds(), vec![StationEventKind::Opened]);
    assert_eq!(
        rig.station.status(&rig.valve),
        StationStatus {
            is_open: true,
            seconds_remaining: Some(120),
        }
    );

    rig.clock.advance_secs(60);
    assert!(!rig.tick(), "timer must not fire early");
    assert!(rig.valve.is_open_now());
    assert_eq!(rig.station.status(&rig.valve).seconds_remaining, Some(60));

    rig.clock.advance_secs(61);
    assert!(rig.tick());
    assert!(!rig.valve.is_open_now());
    assert!(!rig.station.is_timer_armed());
    assert_eq!(
        rig.sink.station_kinds(),
        vec![StationEventKind::Opened, StationEventKind::ClosedByTimer]
    );
    assert_eq!(rig.valve.calls, vec![ValveCall::Open, ValveCall::Close]);
}

// ── Scenario B: open then explicit close ─────────────────────

#[test]
fn explicit_close_disarms_timer() {
    let mut rig = Rig::new();

    rig.apply(0, 1, 120);
    let outcome = rig.apply(0, 0, 0);
    assert_eq!(
        outcome,
        CommandOutcome::Applied {
            valve: ValveAction::Closed,
            timer: TimerAction::Cleared,
        }
    );
    assert_eq!(
        rig.sink.station_kinds(),
        vec![StationEventKind::Opened, StationEventKind::ClosedByCommand]
    );
    assert!(!rig.station.is_timer_armed());
    assert_eq!(rig.station.status(&rig.valve).remaining_or_unarmed(), -1);

    // Nothing left to fire.
    rig.clock.advance_secs(200);
    assert!(!rig.tick());
    assert_eq!(rig.valve.pulses(), 2);
}

// ── Scenario C: wrong station ─────────────────────────────────

#[test]
fn wrong_station_is_ignored() {
    let mut rig = Rig::new();

    let outcome = rig.apply(1, 1, 50);
    assert_eq!(outcome, CommandOutcome::Rejected(RejectReason::UnknownStation(1)));
    assert!(rig.sink.events.is_empty());
    assert!(rig.valve.calls.is_empty());
    assert!(!rig.station.is_timer_armed());
    assert_eq!(rig.station.command_counts(), (0, 1));
}

// ── Scenario D: duration above the command cap ───────────────

#[test]
fn over_long_duration_is_ignored() {
    let mut rig = Rig::new();

    let outcome = rig.apply(0, 1, 5000);
    assert!(matches!(
        outcome,
        CommandOutcome::Rejected(RejectReason::DurationTooLong { requested: 5000, .. })
    ));
    assert!(rig.sink.events.is_empty());
    assert!(rig.valve.calls.is_empty());
    assert!(!rig.station.is_timer_armed());
}

#[test]
fn rejected_command_leaves_running_timer_alone() {
    let mut rig = Rig::new();
    rig.apply(0, 1, 100);
    rig.clock.advance_secs(10);

    rig.apply(0, 2, 10);
    rig.apply(0, 1, -5);
    rig.apply(3, 0, 0);

    assert!(rig.valve.is_open_now());
    assert_eq!(rig.station.status(&rig.valve).seconds_remaining, Some(90));
    assert_eq!(rig.station.command_counts(), (1, 3));
}

// ── Idempotence ──────────────────────────────────────────────

#[test]
fn repeated_open_pulses_once_but_rearms() {
    let mut rig = Rig::new();

    rig.apply(0, 1, 30);
    rig.clock.advance_secs(20);
    let outcome = rig.apply(0, 1, 300);

    assert_eq!(
        outcome,
        CommandOutcome::Applied {
            valve: ValveAction::Unchanged,
            timer: TimerAction::Armed { duration_secs: 300 },
        }
    );
    assert_eq!(rig.sink.station_kinds(), vec![StationEventKind::Opened]);
    assert_eq!(rig.valve.calls, vec![ValveCall::Open]);

    // The first arm (30s) would have fired by now; the second has not.
    rig.clock.advance_secs(20);
    assert!(!rig.tick());
    assert_eq!(rig.station.status(&rig.valve).seconds_remaining, Some(280));
}

#[test]
fn close_on_closed_valve_does_not_pulse() {
    let mut rig = Rig::new();

    let outcome = rig.apply(0, 0, 0);
    assert_eq!(
        outcome,
        CommandOutcome::Applied {
            valve: ValveAction::Unchanged,
            timer: TimerAction::Unchanged,
        }
    );
    assert!(rig.valve.calls.is_empty());
    assert!(rig.sink.events.is_empty());
}

// ── Edge cases ───────────────────────────────────────────────

#[test]
fn zero_duration_open_closes_on_next_tick() {
    let mut rig = Rig::new();

    rig.apply(0, 1, 0);
    assert!(rig.valve.is_open_now());
    assert!(rig.station.is_timer_armed());

    assert!(rig.tick());
    assert!(!rig.valve.is_open_now());
    assert_eq!(
        rig.sink.station_kinds(),
        vec![StationEventKind::Opened, StationEventKind::ClosedByTimer]
    );
}

#[test]
fn arm_refusal_leaves_valve_open_without_timer() {
    let clock = FakeMillis::default();
    let limits = StationLimits {
        max_command_duration_secs: 1000,
        max_arm_duration_secs: 60,
    };
    let mut station = StationService::new(limits, clock.clone());
    let mut valve = MockValve::new();
    let mut sink = RecordingSink::new();

    station.apply(StationCommand::new(0, 1, 30), &mut valve, &mut sink);
    assert!(station.is_timer_armed());

    let outcome = station.apply(StationCommand::new(0, 1, 120), &mut valve, &mut sink);
    assert_eq!(
        outcome,
        CommandOutcome::Applied {
            valve: ValveAction::Unchanged,
            timer: TimerAction::ArmRefused { duration_secs: 120 },
        }
    );
    assert!(valve.is_open_now());
    assert!(!station.is_timer_armed(), "previous expiry must not survive");

    clock.advance_secs(500);
    assert!(!station.tick(&mut valve, &mut sink));
    assert!(valve.is_open_now());
}

#[test]
fn timer_fires_even_if_valve_was_already_closed() {
    let mut rig = Rig::new();
    rig.apply(0, 1, 10);

    // Simulate an out-of-band close that bypasses the service.
    use remote_station::app::ports::ValvePort;
    rig.valve.close();
    rig.sink.clear();

    rig.clock.advance_secs(10);
    assert!(rig.tick());
    assert!(rig.sink.events.is_empty(), "no event without a transition");
    assert!(!rig.station.is_timer_armed());
}

#[test]
fn start_announces_service() {
    let mut rig = Rig::new();
    rig.station.start(&mut rig.sink);
    assert_eq!(rig.sink.events, vec![AppEvent::Started]);
}

// ── Clock seeding and wraparound ─────────────────────────────

#[test]
fn backward_seed_does_not_rewind_running_timer() {
    let mut rig = Rig::new();
    assert_eq!(rig.station.seed_clock(10_000), 10_000);
    rig.apply(0, 1, 60);

    rig.clock.advance_secs(30);
    assert_eq!(rig.station.seed_clock(5), 10_030, "backward seed is clamped");
    assert_eq!(rig.station.status(&rig.valve).seconds_remaining, Some(30));
}

#[test]
fn forward_seed_while_armed_keeps_remaining_time() {
    let mut rig = Rig::new();
    rig.apply(0, 1, 600);
    rig.clock.advance_secs(10);

    assert_eq!(rig.station.seed_clock(1_760_000_000), 1_760_000_000);
    assert!(!rig.tick(), "clock jump must not fire the timer");
    assert!(rig.valve.is_open_now());
    assert_eq!(rig.station.status(&rig.valve).seconds_remaining, Some(590));

    rig.clock.advance_secs(590);
    assert!(rig.tick());
    assert!(!rig.valve.is_open_now());
    assert_eq!(
        rig.sink.station_kinds(),
        vec![StationEventKind::Opened, StationEventKind::ClosedByTimer]
    );
}

#[test]
fn timer_survives_millisecond_counter_wrap() {
    let clock = FakeMillis::starting_at(u32::MAX - 20);
    let mut rig = Rig::with_clock(clock);

    rig.apply(0, 1, 5);
    rig.clock.advance_secs(4);
    assert!(!rig.tick());
    rig.clock.advance_secs(1);
    assert!(rig.tick());
    assert!(!rig.valve.is_open_now());
}
