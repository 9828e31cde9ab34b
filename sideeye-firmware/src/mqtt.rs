//! Broker topics and payloads
//!
//! The broker client itself lives in the board crate; this module gives it
//! the topic layout and message bodies:
//!
//! ```text
//! <prefix>/<id>/state              {"hostname":..,"ip":..,"mac":..,"rssi":..}
//! <prefix>/<id>/state/<setting>    retained decimal value per setting
//! <prefix>/<id>/status             "online" / "offline" (last will)
//! <prefix>/<id>/set/<setting>      inbound setting updates
//! <discovery>/sensor/side_eye_<id>_<key>/config   Home Assistant discovery
//! ```

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use serde::Serialize;
use sideeye_core::config::DeviceConfig;
use sideeye_core::telemetry::TelemetrySnapshot;

use crate::device_id::DeviceId;

/// Status payload while connected
pub const STATUS_ONLINE: &str = "online";

/// Status payload registered as last will
pub const STATUS_OFFLINE: &str = "offline";

/// Topic names for one device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topics {
    base: String,
    state: String,
    status: String,
    set_filter: String,
}

impl Topics {
    pub fn new(prefix: &str, id: &DeviceId) -> Self {
        let base = format!("{}/{}", prefix, id);
        Self {
            state: format!("{}/state", base),
            status: format!("{}/status", base),
            set_filter: format!("{}/set/#", base),
            base,
        }
    }

    /// `<prefix>/<id>`
    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Subscription filter for setting updates
    pub fn set_filter(&self) -> &str {
        &self.set_filter
    }

    /// Retained per-setting state topic
    pub fn setting_state(&self, key: &str) -> String {
        format!("{}/{}", self.state, key)
    }

    /// Setting key addressed by an inbound `set` topic
    pub fn setting_key<'a>(&self, topic: &'a str) -> Option<&'a str> {
        let key = topic
            .strip_prefix(self.base.as_str())?
            .strip_prefix("/set/")?;
        if key.is_empty() || key.contains('/') {
            None
        } else {
            Some(key)
        }
    }
}

#[derive(Serialize)]
struct StateMessage<'a> {
    hostname: &'a str,
    ip: &'a str,
    mac: &'a str,
    rssi: i32,
}

/// Body of the state topic
pub fn state_message(snapshot: &TelemetrySnapshot, rssi: i32) -> Result<Vec<u8>, serde_json::Error> {
    let identity = snapshot.identity();
    serde_json::to_vec(&StateMessage {
        hostname: &identity.hostname,
        ip: &identity.ip,
        mac: &identity.mac,
        rssi,
    })
}

/// Current value of every remotely settable key, for the retained state topics
pub fn setting_values(config: &DeviceConfig) -> [(&'static str, u32); 7] {
    [
        ("brightness", config.brightness.into()),
        ("rotation", config.rotation.as_u8().into()),
        ("cycle_duration", config.page_dwell_ms),
        ("cpu_warning", config.thresholds.cpu_warning.into()),
        ("cpu_critical", config.thresholds.cpu_critical.into()),
        ("ram_warning", config.thresholds.ram_warning.into()),
        ("ram_critical", config.thresholds.ram_critical.into()),
    ]
}

#[derive(Serialize)]
struct DiscoveryDevice<'a> {
    identifiers: [&'a str; 1],
    name: &'a str,
    model: &'static str,
    manufacturer: &'static str,
    sw_version: &'a str,
}

#[derive(Serialize)]
struct SensorDiscovery<'a> {
    name: String,
    state_topic: &'a str,
    value_template: String,
    unique_id: String,
    icon: &'static str,
    device: DiscoveryDevice<'a>,
}

#[derive(Serialize)]
struct StatusDiscovery<'a> {
    name: String,
    state_topic: &'a str,
    unique_id: String,
    device_class: &'static str,
    payload_on: &'static str,
    payload_off: &'static str,
    device: DiscoveryDevice<'a>,
}

/// Sensors announced for Home Assistant: (label, state key, icon)
const SENSORS: [(&str, &str, &str); 4] = [
    ("Hostname", "hostname", "mdi:label"),
    ("IP Address", "ip", "mdi:ip-network"),
    ("MAC Address", "mac", "mdi:ethernet"),
    ("WiFi RSSI", "rssi", "mdi:wifi"),
];

/// Retained discovery messages as (topic, body) pairs
pub fn discovery_messages(
    discovery_prefix: &str,
    topics: &Topics,
    id: &DeviceId,
    version: &str,
) -> Result<Vec<(String, Vec<u8>)>, serde_json::Error> {
    let unique_base = format!("side_eye_{}", id);
    let device_name = format!("SideEye {}", id);
    let device = || DiscoveryDevice {
        identifiers: [unique_base.as_str()],
        name: device_name.as_str(),
        model: "ESP32-C6 GEEK",
        manufacturer: "Waveshare",
        sw_version: version,
    };

    let mut messages = Vec::with_capacity(SENSORS.len() + 1);
    for (label, key, icon) in SENSORS {
        let body = serde_json::to_vec(&SensorDiscovery {
            name: format!("{} {}", device_name, label),
            state_topic: topics.state(),
            value_template: format!("{{{{ value_json.{} }}}}", key),
            unique_id: format!("{}_{}", unique_base, key),
            icon,
            device: device(),
        })?;
        let topic = format!("{}/sensor/{}_{}/config", discovery_prefix, unique_base, key);
        messages.push((topic, body));
    }

    let body = serde_json::to_vec(&StatusDiscovery {
        name: format!("{} Status", device_name),
        state_topic: topics.status(),
        unique_id: format!("{}_status", unique_base),
        device_class: "connectivity",
        payload_on: STATUS_ONLINE,
        payload_off: STATUS_OFFLINE,
        device: device(),
    })?;
    let topic = format!("{}/binary_sensor/{}_status/config", discovery_prefix, unique_base);
    messages.push((topic, body));

    Ok(messages)
}
