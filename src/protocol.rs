//! OpenSprinkler remote-station HTTP surface, without the server.
//!
//! The controller drives a remote station with plain GET requests:
//!
//! | Path  | Purpose                                                   |
//! |-------|-----------------------------------------------------------|
//! | `/cm` | set valve: `?pw=..&sid=<station>&en=<0/1>&t=<seconds>`   |
//! | `/_cm`| same, from the built-in web page (answers with a redirect)|
//! | `/jo` | options probe, answered with firmware version + remote flag|
//! | `/`   | human status page with a toggle button                    |
//!
//! This module turns URIs into [`Route`]s and [`StationCommand`]s and
//! renders the response bodies.  It never fails: unparsable numbers read
//! as `0`, and the station service decides what is acceptable.  The `pw`
//! argument is ignored.

use core::fmt::Write as _;

use serde::Serialize;

use crate::app::commands::StationCommand;
use crate::app::service::StationStatus;

/// Query arguments kept per request; anything beyond is ignored.
pub const MAX_QUERY_ARGS: usize = 8;

/// Duration the web page's toggle button requests when opening.
pub const WEB_TOGGLE_DURATION_SECS: u32 = 120;

/// Body sent after a `/_cm` request so the browser returns to the status page.
pub const REDIRECT_TO_ROOT: &str = "<script>window.location=\"/\";</script>\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    StatusPage,
    /// `from_web` is set for `/_cm`, which expects a redirect back to `/`.
    SetValve { from_web: bool },
    Options,
    NotFound,
}

impl Route {
    pub fn from_path(path: &str) -> Self {
        match path {
            "/" => Self::StatusPage,
            "/cm" => Self::SetValve { from_web: false },
            "/_cm" => Self::SetValve { from_web: true },
            "/jo" => Self::Options,
            _ => Self::NotFound,
        }
    }
}

/// Split a request URI into path and query string.
pub fn split_uri(uri: &str) -> (&str, &str) {
    uri.split_once('?').unwrap_or((uri, ""))
}

/// Borrowed `name=value` pairs of a query string, in order.
#[derive(Debug, Default)]
pub struct QueryArgs<'a> {
    pairs: heapless::Vec<(&'a str, &'a str), MAX_QUERY_ARGS>,
}

impl<'a> QueryArgs<'a> {
    pub fn parse(query: &'a str) -> Self {
        let mut pairs = heapless::Vec::new();
        for part in query.split('&').filter(|p| !p.is_empty()) {
            let pair = part.split_once('=').unwrap_or((part, ""));
            if pairs.push(pair).is_err() {
                break;
            }
        }
        Self { pairs }
    }

    /// First value for `name`.
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.pairs.iter().find(|(k, _)| *k == name).map(|(_, v)| *v)
    }

    /// Integer value for `name`, parsed leniently; missing reads as `0`.
    pub fn int_arg(&self, name: &str) -> i32 {
        self.get(name).map_or(0, lenient_int)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(&'a str, &'a str)> {
        self.pairs.iter()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Leading optional sign and decimal digits; everything after the first
/// non-digit is ignored, no digits at all reads as `0`.  Saturates at the
/// `i32` range.
pub fn lenient_int(s: &str) -> i32 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let limit = i64::from(i32::MAX) + 1;
    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        value = (value * 10 + i64::from(b - b'0')).min(limit);
    }
    let value = if negative { -value } else { value };
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

impl StationCommand {
    /// Read `sid`, `en` and `t` from a set-valve request.
    pub fn from_query(args: &QueryArgs<'_>) -> Self {
        Self::new(args.int_arg("sid"), args.int_arg("en"), args.int_arg("t"))
    }
}

#[derive(Serialize)]
struct Options {
    fwv: u16,
    re: u8,
}

/// `/jo` body: firmware version and the "remote extension" flag.
pub fn options_json(firmware_version: u16) -> String {
    let options = Options {
        fwv: firmware_version,
        re: 1,
    };
    serde_json::to_string(&options).unwrap_or_else(|_| String::from("{}"))
}

/// Auto-refreshing status page with one toggle button for station 0.
pub fn render_status_page(status: &StationStatus) -> String {
    let (label, colour) = if status.is_open {
        ("Open", "Green")
    } else {
        ("Closed", "Red")
    };

    format!(
        "<html>\
         <head>\
         <meta http-equiv='refresh' content='5'/>\
         <title>Remote Station</title>\
         </head>\
         <body>\
         <script>\
         var valve_status={open};\
         function sf(valve) {{\
         _cm.elements[0].value=valve;\
         _cm.elements[1].value=1-valve_status;\
         _cm.elements[2].value={toggle};\
         _cm.submit()\
         }}\
         </script>\
         <form name=_cm action=_cm method=get>\
         <input type=hidden name=sid>\
         <input type=hidden name=en>\
         <input type=hidden name=t>\
         </form>\
         <input type=button value='Station 0 - {label} Timer - {remaining}' id=s0 \
         style='white-space:normal;width:200px;height:100px;font-size:20px;background-color:{colour}' \
         onClick=sf(0)>\
         </body>\
         </html>",
        open = u8::from(status.is_open),
        toggle = WEB_TOGGLE_DURATION_SECS,
        label = label,
        remaining = status.remaining_or_unarmed(),
        colour = colour,
    )
}

/// Plain-text 404 body listing what was requested.
pub fn not_found_message(uri: &str, method: &str, args: &QueryArgs<'_>) -> String {
    let mut msg = format!(
        "File Not Found\n\nURI: {}\nMethod: {}\nArguments: {}\n",
        uri,
        method,
        args.len()
    );
    for (name, value) in args.iter() {
        let _ = writeln!(msg, " {}: {}", name, value);
    }
    msg
}
