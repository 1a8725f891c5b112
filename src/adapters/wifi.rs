//! WiFi station-mode adapter.
//!
//! Credentials come from [`StationConfig`] and are checked before the
//! radio is touched.  Bring-up is one blocking attempt: the caller
//! restarts the chip when it fails, there is no reconnection loop.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `BlockingWifi<EspWifi>` from `esp_idf_svc::wifi`.
//! - **all targets**: credential validation, host-testable.

use core::fmt;

use crate::config::StationConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)"),
        }
    }
}

impl core::error::Error for ConnectivityError {}

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

pub fn validate_ssid(ssid: &str) -> Result<(), ConnectivityError> {
    if ssid.is_empty() || ssid.len() > 32 || !is_printable_ascii(ssid) {
        return Err(ConnectivityError::InvalidSsid);
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ConnectivityError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(ConnectivityError::InvalidPassword);
    }
    Ok(())
}

/// Check the configured credentials before bring-up.
pub fn validate_credentials(config: &StationConfig) -> Result<(), ConnectivityError> {
    if config.wifi_ssid.is_empty() {
        return Err(ConnectivityError::NoCredentials);
    }
    validate_ssid(&config.wifi_ssid)?;
    validate_password(&config.wifi_password)
}

#[cfg(target_os = "espidf")]
pub use esp::connect;

#[cfg(target_os = "espidf")]
mod esp {
    use anyhow::{Context, anyhow};
    use esp_idf_svc::eventloop::EspSystemEventLoop;
    use esp_idf_svc::hal::modem::Modem;
    use esp_idf_svc::wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi};
    use log::info;

    use super::validate_credentials;
    use crate::config::StationConfig;

    /// Join the configured network and wait for an IP address.
    ///
    /// The returned driver must be kept alive for the connection to persist.
    pub fn connect(
        modem: Modem,
        sysloop: EspSystemEventLoop,
        config: &StationConfig,
    ) -> anyhow::Result<BlockingWifi<EspWifi<'static>>> {
        validate_credentials(config)?;

        let mut wifi = BlockingWifi::wrap(EspWifi::new(modem, sysloop.clone(), None)?, sysloop)?;

        let auth_method = if config.wifi_password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        wifi.set_configuration(&Configuration::Client(ClientConfiguration {
            ssid: config
                .wifi_ssid
                .as_str()
                .try_into()
                .map_err(|_| anyhow!("SSID does not fit"))?,
            password: config
                .wifi_password
                .as_str()
                .try_into()
                .map_err(|_| anyhow!("password does not fit"))?,
            auth_method,
            ..Default::default()
        }))?;
        wifi.wifi_mut()
            .sta_netif_mut()
            .set_hostname(&config.hostname)
            .context("setting hostname")?;

        wifi.start()?;
        info!("WiFi: connecting to '{}'", config.wifi_ssid);
        wifi.connect().context("WiFi connect")?;
        wifi.wait_netif_up().context("waiting for DHCP")?;

        let ip = wifi.wifi().sta_netif().get_ip_info()?;
        info!("WiFi: connected, IP {}", ip.ip);
        Ok(wifi)
    }
}
