//! Inbound station commands and their validation.
//!
//! A [`StationCommand`] is the `(sid, en, t)` triple of the remote-station
//! protocol, exactly as the transport parsed it.  Fields are kept as raw
//! signed integers so that nothing the transport hands over is trusted;
//! [`StationCommand::validate`] is the only way to a [`ValidCommand`].

use core::fmt;

/// The only station index this device answers to.
pub const SUPPORTED_STATION: u8 = 0;

/// Protocol-level bounds applied before any valve or timer mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StationLimits {
    /// Outer cap on a command's duration (the controller's refresh window).
    pub max_command_duration_secs: u32,
    /// Cap on what the countdown timer will accept.
    pub max_arm_duration_secs: u32,
}

impl Default for StationLimits {
    fn default() -> Self {
        Self {
            max_command_duration_secs: 1000,
            max_arm_duration_secs: 3600,
        }
    }
}

/// Raw command as received from the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StationCommand {
    pub station_id: i32,
    pub enable: i32,
    pub duration_secs: i32,
}

/// A command that passed protocol validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidCommand {
    Open { duration_secs: u32 },
    Close,
}

/// Why a command was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    UnknownStation(i32),
    BadEnableFlag(i32),
    NegativeDuration(i32),
    DurationTooLong { requested: i32, max: u32 },
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownStation(sid) => write!(f, "unknown station id {}", sid),
            Self::BadEnableFlag(en) => write!(f, "enable flag {} is not 0 or 1", en),
            Self::NegativeDuration(t) => write!(f, "negative duration {}s", t),
            Self::DurationTooLong { requested, max } => {
                write!(f, "duration {}s exceeds cycle limit {}s", requested, max)
            }
        }
    }
}

impl StationCommand {
    pub fn new(station_id: i32, enable: i32, duration_secs: i32) -> Self {
        Self {
            station_id,
            enable,
            duration_secs,
        }
    }

    /// Check every field against the protocol bounds.
    pub fn validate(&self, limits: &StationLimits) -> Result<ValidCommand, RejectReason> {
        if self.station_id != i32::from(SUPPORTED_STATION) {
            return Err(RejectReason::UnknownStation(self.station_id));
        }
        if self.duration_secs < 0 {
            return Err(RejectReason::NegativeDuration(self.duration_secs));
        }
        let duration_secs = self.duration_secs as u32;
        if duration_secs > limits.max_command_duration_secs {
            return Err(RejectReason::DurationTooLong {
                requested: self.duration_secs,
                max: limits.max_command_duration_secs,
            });
        }
        match self.enable {
            1 => Ok(ValidCommand::Open { duration_secs }),
            0 => Ok(ValidCommand::Close),
            other => Err(RejectReason::BadEnableFlag(other)),
        }
    }
}

// ── Outcomes ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValveAction {
    Opened,
    Closed,
    /// Already in the requested position; no pulse sent.
    Unchanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    Armed { duration_secs: u32 },
    Cleared,
    /// Duration above the timer cap: timer cleared, valve left under
    /// manual control.
    ArmRefused { duration_secs: u32 },
    Unchanged,
}

/// Result of [`StationService::apply`](super::service::StationService::apply),
/// for logging only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Rejected(RejectReason),
    Applied { valve: ValveAction, timer: TimerAction },
}
