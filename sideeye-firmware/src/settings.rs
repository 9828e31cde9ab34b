//! Remote settings
//!
//! Settings arrive as `<prefix>/<device id>/set/<key>` broker messages
//! with a plain decimal payload. Applying one updates the in-memory
//! configuration and reports what changed so the loop can apply it live.

use core::str::FromStr;

use sideeye_core::config::DeviceConfig;
use sideeye_core::interaction::Rotation;

use crate::config::ConfigError;

/// Minimum accepted page dwell (ms)
pub const MIN_PAGE_DWELL_MS: u32 = 1000;

/// Errors that can occur while applying a setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingError {
    /// Key is not a known setting
    UnknownKey,
    /// Payload is not valid for the key
    InvalidValue,
    /// Setting applied but could not be stored
    Persist(ConfigError),
}

impl From<ConfigError> for SettingError {
    fn from(e: ConfigError) -> Self {
        SettingError::Persist(e)
    }
}

/// What an accepted setting changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingChange {
    Brightness(u8),
    Rotation(Rotation),
    PageDwell(u32),
    /// One of the CPU/RAM thresholds
    Thresholds,
}

/// Apply `value` to the setting named `key`
pub fn apply_setting(
    config: &mut DeviceConfig,
    key: &str,
    value: &str,
) -> Result<SettingChange, SettingError> {
    match key {
        "brightness" => {
            let level = parse(value)?;
            config.brightness = level;
            Ok(SettingChange::Brightness(level))
        }
        "rotation" => {
            let rotation = Rotation::from_u8(parse(value)?).ok_or(SettingError::InvalidValue)?;
            config.rotation = rotation;
            Ok(SettingChange::Rotation(rotation))
        }
        "cycle_duration" => {
            let dwell: u32 = parse(value)?;
            if dwell < MIN_PAGE_DWELL_MS {
                return Err(SettingError::InvalidValue);
            }
            config.page_dwell_ms = dwell;
            Ok(SettingChange::PageDwell(dwell))
        }
        "cpu_warning" => set_percent(&mut config.thresholds.cpu_warning, value),
        "cpu_critical" => set_percent(&mut config.thresholds.cpu_critical, value),
        "ram_warning" => set_percent(&mut config.thresholds.ram_warning, value),
        "ram_critical" => set_percent(&mut config.thresholds.ram_critical, value),
        _ => Err(SettingError::UnknownKey),
    }
}

fn set_percent(slot: &mut u8, value: &str) -> Result<SettingChange, SettingError> {
    let percent: u8 = parse(value)?;
    if percent > 100 {
        return Err(SettingError::InvalidValue);
    }
    *slot = percent;
    Ok(SettingChange::Thresholds)
}

/// Parse a decimal payload; number entities may send "42.0"
fn parse<T: FromStr>(value: &str) -> Result<T, SettingError> {
    let value = value.trim();
    let integral = value.strip_suffix(".0").unwrap_or(value);
    integral.parse().map_err(|_| SettingError::InvalidValue)
}
