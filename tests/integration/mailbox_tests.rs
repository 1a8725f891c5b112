//! Integration tests for the HTTP-task → control-loop hand-off.
//!
//! Commands are posted from a separate thread, as the server task does,
//! and drained into the service on the test thread, as the loop does.

use super::mock_hw::{Rig, ValveCall};

use remote_station::app::commands::StationCommand;
use remote_station::events::{COMMAND_QUEUE_CAP, CommandMailbox, StatusBoard};

static MAILBOX: CommandMailbox = CommandMailbox::new();
static BOARD: StatusBoard = StatusBoard::new();

#[test]
fn commands_posted_from_another_thread_apply_in_order() {
    let poster = std::thread::spawn(|| {
        assert!(MAILBOX.post(StationCommand::new(0, 1, 120)));
        assert!(MAILBOX.post(StationCommand::new(0, 0, 0)));
        assert!(MAILBOX.post(StationCommand::new(0, 1, 30)));
    });
    poster.join().unwrap();

    let mut rig = Rig::new();
    let n = MAILBOX.drain(|cmd| {
        rig.station.apply(cmd, &mut rig.valve, &mut rig.sink);
    });
    assert_eq!(n, 3);
    assert_eq!(
        rig.valve.calls,
        vec![ValveCall::Open, ValveCall::Close, ValveCall::Open]
    );

    BOARD.publish(&rig.station.status(&rig.valve));
    let seen = std::thread::spawn(|| BOARD.snapshot()).join().unwrap();
    assert!(seen.is_open);
    assert_eq!(seen.seconds_remaining, Some(30));
}

#[test]
fn overflow_is_dropped_not_blocking() {
    let mailbox = CommandMailbox::new();
    let accepted = (0..COMMAND_QUEUE_CAP + 3)
        .filter(|_| mailbox.post(StationCommand::new(0, 1, 10)))
        .count();
    assert_eq!(accepted, COMMAND_QUEUE_CAP);
}
