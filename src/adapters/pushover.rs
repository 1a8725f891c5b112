//! Pushover.net notification adapter.
//!
//! Implements [`EventSink`] by posting valve transitions and low-water
//! alerts to the Pushover messages API, titled with the station hostname.
//! `Started` is not pushed.
//!
//! Delivery is best effort: one attempt, no retry, failures logged.  The
//! POST blocks the control loop for its duration, which bounds how often
//! the loop can run while notifications are flowing.
//!
//! - **`target_os = "espidf"`**: HTTPS via `EspHttpConnection` and the
//!   ESP-IDF certificate bundle.
//! - **all other targets**: the request body is built and logged only.

use core::fmt::Write as _;

use heapless::String;
use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::config::PushoverConfig;
use crate::error::NotifyError;

pub const PUSHOVER_URL: &str = "https://api.pushover.net/1/messages.json";

/// Capacity of the form body; every field is percent-encoded.
pub const BODY_CAP: usize = 512;

pub type FormBody = String<BODY_CAP>;

pub struct PushoverNotifier {
    credentials: PushoverConfig,
    title: String<32>,
    sent: u32,
    failed: u32,
}

impl PushoverNotifier {
    pub fn new(credentials: PushoverConfig, title: &str) -> Self {
        let mut t = String::new();
        for c in title.chars() {
            if t.push(c).is_err() {
                break;
            }
        }
        Self {
            credentials,
            title: t,
            sent: 0,
            failed: 0,
        }
    }

    /// `token=..&user=..&title=..&message=..`, form-urlencoded.
    pub fn form_body(&self, message: &str) -> Result<FormBody, NotifyError> {
        let mut body = FormBody::new();
        let fields = [
            ("token", self.credentials.token.as_str()),
            ("user", self.credentials.user.as_str()),
            ("title", self.title.as_str()),
            ("message", message),
        ];
        for (i, (name, value)) in fields.iter().enumerate() {
            if i > 0 {
                body.push('&').map_err(|_| NotifyError::BodyTooLong)?;
            }
            body.push_str(name).map_err(|_| NotifyError::BodyTooLong)?;
            body.push('=').map_err(|_| NotifyError::BodyTooLong)?;
            percent_encode(value, &mut body)?;
        }
        Ok(body)
    }

    /// (delivered, failed) notification counts.
    pub fn stats(&self) -> (u32, u32) {
        (self.sent, self.failed)
    }

    pub fn send(&mut self, message: &str) -> Result<(), NotifyError> {
        let body = self.form_body(message)?;
        info!("Pushover: sending '{}'", message);
        post(&body)
    }
}

impl EventSink for PushoverNotifier {
    fn emit(&mut self, event: &AppEvent) {
        if matches!(event, AppEvent::Started) {
            return;
        }
        match self.send(event.reason()) {
            Ok(()) => self.sent = self.sent.wrapping_add(1),
            Err(e) => {
                self.failed = self.failed.wrapping_add(1);
                warn!("Pushover: '{}' not delivered ({})", event.reason(), e);
            }
        }
    }
}

/// Form-urlencode `value` into `out` (unreserved bytes pass through).
pub fn percent_encode<const N: usize>(value: &str, out: &mut String<N>) -> Result<(), NotifyError> {
    for b in value.bytes() {
        let pushed = if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~') {
            out.push(char::from(b)).is_ok()
        } else {
            write!(out, "%{:02X}", b).is_ok()
        };
        if !pushed {
            return Err(NotifyError::BodyTooLong);
        }
    }
    Ok(())
}

#[cfg(target_os = "espidf")]
fn post(body: &str) -> Result<(), NotifyError> {
    use esp_idf_svc::http::client::{Configuration, EspHttpConnection};
    use esp_idf_svc::http::Method;

    let mut conn = EspHttpConnection::new(&Configuration {
        crt_bundle_attach: Some(esp_idf_svc::sys::esp_crt_bundle_attach),
        ..Default::default()
    })
    .map_err(|_| NotifyError::Connect)?;

    let mut len = String::<8>::new();
    write!(len, "{}", body.len()).map_err(|_| NotifyError::BodyTooLong)?;
    let headers = [
        ("Content-Type", "application/x-www-form-urlencoded"),
        ("Content-Length", len.as_str()),
        ("Connection", "close"),
    ];

    conn.initiate_request(Method::Post, PUSHOVER_URL, &headers)
        .map_err(|_| NotifyError::Connect)?;
    let mut written = 0;
    while written < body.len() {
        written += conn
            .write(&body.as_bytes()[written..])
            .map_err(|_| NotifyError::Connect)?;
    }
    conn.initiate_response().map_err(|_| NotifyError::Connect)?;

    let status = conn.status();
    debug!("Pushover: HTTP {}", status);
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(NotifyError::Status(status))
    }
}

#[cfg(not(target_os = "espidf"))]
fn post(body: &str) -> Result<(), NotifyError> {
    debug!("Pushover (sim): POST {} [{} bytes]", PUSHOVER_URL, body.len());
    Ok(())
}
