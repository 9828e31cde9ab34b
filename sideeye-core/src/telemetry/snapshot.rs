//! Telemetry snapshot record

use heapless::String;
use sideeye_protocol::{IdentityPayload, StatsPayload};

use super::alert::AlertLevel;
use super::history::History;

/// Number of throughput samples kept for each direction
pub const HISTORY_LEN: usize = 60;

/// Maximum stored length of each identity field, in bytes
pub const IDENTITY_FIELD_LEN: usize = 64;

type Field = String<IDENTITY_FIELD_LEN>;

/// Host identity strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub hostname: Field,
    pub ip: Field,
    pub mac: Field,
    pub os: Field,
    pub user: Field,
}

impl Identity {
    /// Placeholder identity shown before the host has introduced itself
    pub fn placeholder() -> Self {
        Self {
            hostname: field("Unknown"),
            ip: field("No IP"),
            mac: field("No MAC"),
            os: field("Unknown"),
            user: field("Unknown"),
        }
    }
}

/// Latest host resource metrics
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Metrics {
    pub cpu_percent: f32,
    pub ram_used: u64,
    pub ram_total: u64,
    pub disk_used: u64,
    pub disk_total: u64,
    /// Bytes per second
    pub net_up: u64,
    /// Bytes per second
    pub net_down: u64,
    /// Seconds
    pub uptime: u64,
    pub thermal_c: f32,
    pub gpu_percent: f32,
}

impl Metrics {
    /// RAM usage as 0-100 (0 when the total is unknown)
    pub fn ram_percent(&self) -> f32 {
        percent(self.ram_used, self.ram_total)
    }

    /// Disk usage as 0-100 (0 when the total is unknown)
    pub fn disk_percent(&self) -> f32 {
        percent(self.disk_used, self.disk_total)
    }
}

fn percent(used: u64, total: u64) -> f32 {
    if total == 0 {
        0.0
    } else {
        (used as f64 * 100.0 / total as f64) as f32
    }
}

/// Status of the most recent file transfer, shown on the storage page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncStatus {
    #[default]
    Idle,
    Syncing,
    Error,
}

impl SyncStatus {
    /// Text for the storage page
    pub fn label(self) -> &'static str {
        match self {
            SyncStatus::Idle => "Idle",
            SyncStatus::Syncing => "Syncing...",
            SyncStatus::Error => "Error!",
        }
    }
}

/// Current known state of the host and the link
///
/// Created once at startup with placeholder values. Mutated only by the
/// protocol dispatcher (command decode and liveness timeout).
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySnapshot {
    identity: Identity,
    metrics: Metrics,
    net_up_history: History<HISTORY_LEN>,
    net_down_history: History<HISTORY_LEN>,
    alert: AlertLevel,
    sync_status: SyncStatus,
    /// A command arrived since the loop last checked
    fresh_data: bool,
    connected: bool,
}

impl Default for TelemetrySnapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetrySnapshot {
    pub fn new() -> Self {
        Self {
            identity: Identity::placeholder(),
            metrics: Metrics::default(),
            net_up_history: History::new(),
            net_down_history: History::new(),
            alert: AlertLevel::Normal,
            sync_status: SyncStatus::Idle,
            fresh_data: false,
            connected: false,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Upload throughput, oldest first
    pub fn net_up_history(&self) -> &History<HISTORY_LEN> {
        &self.net_up_history
    }

    /// Download throughput, oldest first
    pub fn net_down_history(&self) -> &History<HISTORY_LEN> {
        &self.net_down_history
    }

    pub fn alert(&self) -> AlertLevel {
        self.alert
    }

    pub fn sync_status(&self) -> SyncStatus {
        self.sync_status
    }

    pub fn is_fresh(&self) -> bool {
        self.fresh_data
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Overwrite the identity fields and mark the link live
    pub(crate) fn apply_identity(&mut self, payload: &IdentityPayload) {
        self.identity = Identity {
            hostname: field(&payload.hostname),
            ip: field(&payload.ip),
            mac: field(&payload.mac),
            os: field(&payload.os),
            user: field(&payload.user),
        };
        self.mark_live();
    }

    /// Overwrite the metrics, extend the throughput history, and mark the
    /// link live
    ///
    /// Returns the previous alert level.
    pub(crate) fn apply_stats(&mut self, payload: &StatsPayload) -> AlertLevel {
        self.metrics = Metrics {
            cpu_percent: payload.cpu_percent,
            ram_used: payload.ram_used,
            ram_total: payload.ram_total,
            disk_used: payload.disk_used,
            disk_total: payload.disk_total,
            net_up: payload.net_up,
            net_down: payload.net_down,
            uptime: payload.uptime,
            thermal_c: payload.thermal_c,
            gpu_percent: payload.gpu_percent,
        };
        self.net_up_history.push(payload.net_up);
        self.net_down_history.push(payload.net_down);

        let previous = self.alert;
        self.alert = AlertLevel::from_u8(payload.alert_level);
        self.mark_live();
        previous
    }

    pub(crate) fn set_sync_status(&mut self, status: SyncStatus) {
        self.sync_status = status;
    }

    pub(crate) fn set_disconnected(&mut self) {
        self.connected = false;
    }

    /// Clear the fresh-data flag, returning whether it was set
    pub(crate) fn take_fresh(&mut self) -> bool {
        core::mem::replace(&mut self.fresh_data, false)
    }

    fn mark_live(&mut self) {
        self.connected = true;
        self.fresh_data = true;
    }
}

/// Copy `value` into a bounded field, cutting at a character boundary
fn field(value: &str) -> Field {
    let mut out = Field::new();
    for c in value.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
