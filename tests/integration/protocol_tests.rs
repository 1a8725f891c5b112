//! Integration tests for the HTTP protocol surface feeding the service.
//!
//! Request URIs are parsed exactly as the server adapter does, the
//! resulting command is applied, and the page rendered from the status.

use super::mock_hw::{Rig, ValveCall};

use remote_station::app::commands::StationCommand;
use remote_station::app::events::StationEventKind;
use remote_station::protocol::{
    QueryArgs, REDIRECT_TO_ROOT, Route, not_found_message, options_json, render_status_page,
    split_uri,
};

fn command_for(uri: &str) -> (Route, StationCommand) {
    let (path, query) = split_uri(uri);
    let args = QueryArgs::parse(query);
    (Route::from_path(path), StationCommand::from_query(&args))
}

#[test]
fn controller_open_request_opens_valve() {
    let mut rig = Rig::new();
    let (route, cmd) = command_for("/cm?pw=opendoor&sid=0&en=1&t=600");
    assert_eq!(route, Route::SetValve { from_web: false });

    rig.station.apply(cmd, &mut rig.valve, &mut rig.sink);
    assert_eq!(rig.valve.calls, vec![ValveCall::Open]);

    let page = render_status_page(&rig.station.status(&rig.valve));
    assert!(page.contains("Station 0 - Open Timer - 600"));
}

#[test]
fn web_toggle_request_uses_page_defaults() {
    let mut rig = Rig::new();
    let (route, cmd) = command_for("/_cm?sid=0&en=1&t=120");
    assert_eq!(route, Route::SetValve { from_web: true });
    assert_eq!(REDIRECT_TO_ROOT, "<script>window.location=\"/\";</script>\n");

    rig.station.apply(cmd, &mut rig.valve, &mut rig.sink);
    rig.clock.advance_secs(120);
    rig.tick();
    assert_eq!(
        rig.sink.station_kinds(),
        vec![StationEventKind::Opened, StationEventKind::ClosedByTimer]
    );
}

#[test]
fn garbage_arguments_never_actuate() {
    let mut rig = Rig::new();
    for uri in [
        "/cm?sid=x&en=1&t=10",
        "/cm?sid=0&en=2&t=10",
        "/cm?sid=0&en=1&t=-10",
        "/cm?sid=0&en=1&t=99999999999",
        "/cm?sid=-1&en=1&t=10",
    ] {
        let (_, cmd) = command_for(uri);
        // "x" parses as station 0, so only that one is expected to open.
        rig.station.apply(cmd, &mut rig.valve, &mut rig.sink);
    }
    assert_eq!(rig.valve.calls, vec![ValveCall::Open]);
    assert_eq!(rig.station.command_counts(), (1, 4));
}

#[test]
fn missing_duration_on_open_arms_immediate_close() {
    let mut rig = Rig::new();
    let (_, cmd) = command_for("/cm?sid=0&en=1");
    assert_eq!(cmd, StationCommand::new(0, 1, 0));

    rig.station.apply(cmd, &mut rig.valve, &mut rig.sink);
    assert!(rig.tick());
    assert_eq!(rig.valve.calls, vec![ValveCall::Open, ValveCall::Close]);
}

#[test]
fn options_and_unknown_paths() {
    assert_eq!(Route::from_path("/jo"), Route::Options);
    assert_eq!(options_json(216), "{\"fwv\":216,\"re\":1}");

    let (path, query) = split_uri("/favicon.ico");
    assert_eq!(Route::from_path(path), Route::NotFound);
    let msg = not_found_message(path, "GET", &QueryArgs::parse(query));
    assert!(msg.contains("URI: /favicon.ico"));
    assert!(msg.contains("Arguments: 0"));
}

#[test]
fn status_page_reports_unarmed_timer_as_minus_one() {
    let mut rig = Rig::new();
    let page = render_status_page(&rig.station.status(&rig.valve));
    assert!(page.contains("Station 0 - Closed Timer - -1"));
    assert!(page.contains("content='5'"));
}
