//! Station configuration parameters
//!
//! All tunable parameters for the remote station.
//! Values can be overridden via NVS (non-volatile storage).
//!
//! Network and notification credentials for a fresh board come from the
//! build environment ([`BuildSettings::from_env`]):
//!
//! - `WIFI_SSID`, `WIFI_PSK`
//! - `STATION_HOSTNAME`
//! - `PUSHOVER_TOKEN`, `PUSHOVER_USER`
//!
//! Unset variables leave the stock default in place.

use heapless::String;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::app::commands::StationLimits;
use crate::app::ports::ConfigError;

/// Pushover.net credentials.  Notifications are disabled when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushoverConfig {
    pub token: String<32>,
    pub user: String<32>,
}

/// Core station configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationConfig {
    // --- Network ---
    /// DHCP hostname, also used as the notification title
    pub hostname: String<32>,
    pub wifi_ssid: String<32>,
    pub wifi_password: String<64>,

    // --- Valve ---
    /// Enable-line pulse that latches the valve (milliseconds)
    pub pulse_width_ms: u32,

    // --- Protocol ---
    /// Longest duration the countdown timer accepts (seconds)
    pub max_arm_duration_secs: u32,
    /// Longest duration a set-valve command may carry (seconds).
    /// The controller re-sends the station state well inside this window.
    pub max_command_duration_secs: u32,
    /// Firmware version reported to the controller by `/jo`
    pub firmware_version: u16,

    // --- Timing ---
    /// Control loop interval (milliseconds)
    pub loop_interval_ms: u32,
    /// Minimum spacing of low-water alerts (seconds)
    pub water_check_interval_secs: u32,

    // --- Notification ---
    pub pushover: Option<PushoverConfig>,
}

/// Credentials baked in at compile time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSettings {
    pub wifi_ssid: Option<&'static str>,
    pub wifi_password: Option<&'static str>,
    pub hostname: Option<&'static str>,
    pub pushover_token: Option<&'static str>,
    pub pushover_user: Option<&'static str>,
}

impl BuildSettings {
    /// Nothing supplied: stock defaults only.
    pub const NONE: Self = Self {
        wifi_ssid: None,
        wifi_password: None,
        hostname: None,
        pushover_token: None,
        pushover_user: None,
    };

    pub const fn from_env() -> Self {
        Self {
            wifi_ssid: option_env!("WIFI_SSID"),
            wifi_password: option_env!("WIFI_PSK"),
            hostname: option_env!("STATION_HOSTNAME"),
            pushover_token: option_env!("PUSHOVER_TOKEN"),
            pushover_user: option_env!("PUSHOVER_USER"),
        }
    }
}

/// Copy a build-time value into a fixed-capacity field.  Empty or
/// oversized values are dropped.
fn bounded<const N: usize>(name: &str, value: Option<&str>) -> Option<String<N>> {
    let value = value.filter(|v| !v.is_empty())?;
    match String::try_from(value) {
        Ok(s) => Some(s),
        Err(_) => {
            warn!("Build setting {} longer than {} bytes, ignored", name, N);
            None
        }
    }
}

impl Default for StationConfig {
    fn default() -> Self {
        Self::with_build_settings(&BuildSettings::from_env())
    }
}

impl StationConfig {
    /// Stock parameters with whatever credentials `settings` supplies.
    ///
    /// Pushover is enabled only when both token and user are present.
    pub fn with_build_settings(settings: &BuildSettings) -> Self {
        let hostname = bounded("STATION_HOSTNAME", settings.hostname).unwrap_or_else(|| {
            let mut h = String::new();
            // "remote-station" always fits in 32 bytes.
            let _ = h.push_str("remote-station");
            h
        });

        let pushover = match (
            bounded("PUSHOVER_TOKEN", settings.pushover_token),
            bounded("PUSHOVER_USER", settings.pushover_user),
        ) {
            (Some(token), Some(user)) => Some(PushoverConfig { token, user }),
            _ => None,
        };

        Self {
            hostname,
            wifi_ssid: bounded("WIFI_SSID", settings.wifi_ssid).unwrap_or_default(),
            wifi_password: bounded("WIFI_PSK", settings.wifi_password).unwrap_or_default(),

            pulse_width_ms: 50,

            max_arm_duration_secs: 3600,
            max_command_duration_secs: 1000,
            firmware_version: 216,

            loop_interval_ms: 100,
            water_check_interval_secs: 24 * 60 * 60,

            pushover,
        }
    }

    /// Bounds consumed by the station service.
    pub fn limits(&self) -> StationLimits {
        StationLimits {
            max_command_duration_secs: self.max_command_duration_secs,
            max_arm_duration_secs: self.max_arm_duration_secs,
        }
    }

    /// Range-check every field.  Out-of-range values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hostname.is_empty() {
            return Err(ConfigError::ValidationFailed("hostname must not be empty"));
        }
        if !(10..=500).contains(&self.pulse_width_ms) {
            return Err(ConfigError::ValidationFailed(
                "pulse_width_ms must be 10–500",
            ));
        }
        if !(1..=86_400).contains(&self.max_arm_duration_secs) {
            return Err(ConfigError::ValidationFailed(
                "max_arm_duration_secs must be 1–86400",
            ));
        }
        if !(1..=86_400).contains(&self.max_command_duration_secs) {
            return Err(ConfigError::ValidationFailed(
                "max_command_duration_secs must be 1–86400",
            ));
        }
        if !(10..=1000).contains(&self.loop_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "loop_interval_ms must be 10–1000",
            ));
        }
        if !(60..=7 * 86_400).contains(&self.water_check_interval_secs) {
            return Err(ConfigError::ValidationFailed(
                "water_check_interval_secs must be 60–604800",
            ));
        }
        if let Some(p) = &self.pushover {
            if p.token.is_empty() || p.user.is_empty() {
                return Err(ConfigError::ValidationFailed(
                    "pushover token and user must both be set",
                ));
            }
        }
        Ok(())
    }
}
