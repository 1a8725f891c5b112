//! Unified error types for the remote-station firmware.
//!
//! `Error` covers hardware bring-up; `NotifyError` covers push delivery.
//! The domain core itself has no error path: rejected commands are
//! outcomes, and valve actuation cannot report failure.  Configuration
//! problems use [`ConfigError`](crate::app::ports::ConfigError).

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Peripheral or service initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Notification errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyError {
    /// Request body did not fit the fixed-size buffer.
    BodyTooLong,
    /// Connection to the push service failed.
    Connect,
    /// The push service answered with a non-2xx status.
    Status(u16),
}

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BodyTooLong => write!(f, "request body too long"),
            Self::Connect => write!(f, "connection failed"),
            Self::Status(code) => write!(f, "HTTP status {code}"),
        }
    }
}
