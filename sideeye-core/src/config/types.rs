//! Configuration type definitions
//!
//! These types represent the persisted device configuration: display
//! preferences, resource alert thresholds, and the broker target.

use heapless::String;

use crate::interaction::{Rotation, DEFAULT_PAGE_DWELL_MS};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration layout version; stored data with another version is rejected
pub const CONFIG_VERSION: u8 = 1;

/// Maximum length of broker text settings
pub const MAX_SETTING_LEN: usize = 40;

/// Default broker port
pub const DEFAULT_MQTT_PORT: u16 = 1883;

/// Default topic prefix
pub const DEFAULT_TOPIC_PREFIX: &str = "side-eye";

/// Default Home Assistant discovery prefix
pub const DEFAULT_DISCOVERY_PREFIX: &str = "homeassistant";

pub type SettingString = String<MAX_SETTING_LEN>;

/// Broker connection settings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MqttSettings {
    /// Host name or address; empty disables the broker client
    pub server: SettingString,
    pub port: u16,
    pub user: SettingString,
    pub password: SettingString,
    /// First topic level (`<prefix>/<device id>/...`)
    pub topic_prefix: SettingString,
    pub discovery_prefix: SettingString,
}

impl Default for MqttSettings {
    fn default() -> Self {
        Self {
            server: String::new(),
            port: DEFAULT_MQTT_PORT,
            user: String::new(),
            password: String::new(),
            topic_prefix: setting(DEFAULT_TOPIC_PREFIX),
            discovery_prefix: setting(DEFAULT_DISCOVERY_PREFIX),
        }
    }
}

impl MqttSettings {
    /// Check if a broker has been configured
    pub fn is_configured(&self) -> bool {
        !self.server.is_empty()
    }

    /// Check if the broker expects credentials
    pub fn has_credentials(&self) -> bool {
        !self.user.is_empty()
    }
}

/// Resource usage thresholds (percent)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Thresholds {
    pub cpu_warning: u8,
    pub cpu_critical: u8,
    pub ram_warning: u8,
    pub ram_critical: u8,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            cpu_warning: 50,
            cpu_critical: 80,
            ram_warning: 50,
            ram_critical: 80,
        }
    }
}

/// Complete device configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceConfig {
    /// Layout version
    pub version: u8,
    /// Backlight brightness (0-255)
    pub brightness: u8,
    pub rotation: Rotation,
    /// Time each page stays up while cycling (ms)
    pub page_dwell_ms: u32,
    pub thresholds: Thresholds,
    pub mqtt: MqttSettings,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            brightness: 255,
            rotation: Rotation::Landscape,
            page_dwell_ms: DEFAULT_PAGE_DWELL_MS,
            thresholds: Thresholds::default(),
            mqtt: MqttSettings::default(),
        }
    }
}

/// Build a setting string, cutting at a character boundary if too long
pub fn setting(value: &str) -> SettingString {
    let mut out = SettingString::new();
    for c in value.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
