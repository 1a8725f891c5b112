//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ StationService (domain)
//! ```
//!
//! Driven adapters (valve lines, millisecond counter, event sinks, config
//! storage) implement these traits.  The
//! [`StationService`](super::service::StationService) consumes them via
//! generics, so the domain core never touches hardware directly.

use crate::config::StationConfig;

use super::events::AppEvent;

// ───────────────────────────────────────────────────────────────
// Time port (driven adapter: hardware counter → domain)
// ───────────────────────────────────────────────────────────────

/// A free-running millisecond counter.
///
/// The counter is allowed to wrap at `u32::MAX`; consumers must only ever
/// look at wrapping differences between two readings.
pub trait MillisSource {
    fn millis(&self) -> u32;
}

impl<T: MillisSource + ?Sized> MillisSource for &T {
    fn millis(&self) -> u32 {
        (**self).millis()
    }
}

// ───────────────────────────────────────────────────────────────
// Valve port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the single latching valve.
///
/// Implementations actuate unconditionally: calling [`open`](Self::open)
/// on an already-open valve pulses the hardware again.  Guarding against
/// redundant pulses is the caller's job.
pub trait ValvePort {
    /// Pulse the valve into the open position.
    fn open(&mut self);

    /// Pulse the valve into the closed position.
    fn close(&mut self);

    /// Last commanded position (there is no position sensor).
    fn is_open(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / notification)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`]s through this port.
/// Adapters decide where they go (serial log, push notification, ...).
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}

impl<S: EventSink> EventSink for Option<S> {
    fn emit(&mut self, event: &AppEvent) {
        if let Some(sink) = self {
            sink.emit(event);
        }
    }
}

impl<A: EventSink, B: EventSink> EventSink for (A, B) {
    fn emit(&mut self, event: &AppEvent) {
        self.0.emit(event);
        self.1.emit(event);
    }
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists station configuration.
///
/// Implementations MUST validate before persisting.  Invalid ranges are
/// rejected with [`ConfigError::ValidationFailed`], not silently clamped.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`StationConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<StationConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &StationConfig) -> Result<(), ConfigError>;
}

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
