//! Message types for the SideEye host protocol
//!
//! Message types are divided into two categories:
//! - Host → Device: telemetry updates and storage/version requests
//! - Device → Host: responses to the requests
//!
//! Host messages are decoded in two steps: the envelope's `type` tag is
//! matched once against the closed set of known commands, then only that
//! command's `data` payload is deserialized. Unknown tags decode to
//! [`HostCommand::Unknown`] instead of failing.

use alloc::string::String;
use alloc::vec::Vec;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// Command tags: Host → Device
pub const TAG_IDENTITY: &str = "Identity";
pub const TAG_STATS: &str = "Stats";
pub const TAG_LIST_FILES: &str = "ListFiles";
pub const TAG_WRITE_CHUNK: &str = "WriteChunk";
pub const TAG_GET_VERSION: &str = "GetVersion";

/// Message carried by every chunk acknowledgement, successful or not
pub const CHUNK_WRITTEN_MESSAGE: &str = "Chunk written";

/// Default directory for `ListFiles` without a path
pub const ROOT_PATH: &str = "/";

/// Errors that can occur while decoding a host line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Line is not a JSON object with a string `type`
    InvalidJson,
    /// Command requires a `data` object but none was sent
    MissingData,
    /// `data` is present but does not match the command's fields
    InvalidPayload,
}

/// Errors that can occur while encoding a device response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// Serializer rejected the response
    Serialize,
}

/// Host identity fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityPayload {
    pub hostname: String,
    pub ip: String,
    pub mac: String,
    pub os: String,
    pub user: String,
}

/// Host resource metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsPayload {
    /// CPU load, 0-100
    pub cpu_percent: f32,
    /// Bytes
    pub ram_used: u64,
    /// Bytes
    pub ram_total: u64,
    /// Bytes
    pub disk_used: u64,
    /// Bytes
    pub disk_total: u64,
    /// Bytes per second
    pub net_up: u64,
    /// Bytes per second
    pub net_down: u64,
    /// Seconds
    pub uptime: u64,
    pub thermal_c: f32,
    pub gpu_percent: f32,
    /// 0 = normal, 1 = warning, 2 = critical
    pub alert_level: u8,
}

/// One chunk of a resumable file transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkPayload {
    /// Absolute destination path on device storage
    pub path: String,
    /// Byte offset of this chunk; 0 starts a new file
    pub offset: u64,
    /// Base64 (standard alphabet, padded) chunk bytes
    pub data: String,
}

#[derive(Deserialize)]
struct ListFilesPayload {
    #[serde(default = "root_path")]
    path: String,
}

fn root_path() -> String {
    String::from(ROOT_PATH)
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Option<Value>,
}

/// Commands sent by the host
#[derive(Debug, Clone, PartialEq)]
pub enum HostCommand {
    /// Overwrite the host identity
    Identity(IdentityPayload),
    /// Overwrite the resource metrics
    Stats(StatsPayload),
    /// List a storage directory
    ListFiles { path: String },
    /// Write one chunk of a file
    WriteChunk(ChunkPayload),
    /// Report the firmware version
    GetVersion,
    /// Well-formed message with a tag this firmware does not know
    Unknown,
}

impl HostCommand {
    /// Decode one framed line
    pub fn decode(line: &[u8]) -> Result<Self, DecodeError> {
        let envelope: Envelope =
            serde_json::from_slice(line).map_err(|_| DecodeError::InvalidJson)?;

        match envelope.kind.as_str() {
            TAG_IDENTITY => Ok(HostCommand::Identity(payload(envelope.data)?)),
            TAG_STATS => Ok(HostCommand::Stats(payload(envelope.data)?)),
            TAG_LIST_FILES => {
                let path = match envelope.data {
                    Some(Value::Null) | None => root_path(),
                    Some(data) => {
                        serde_json::from_value::<ListFilesPayload>(data)
                            .map_err(|_| DecodeError::InvalidPayload)?
                            .path
                    }
                };
                Ok(HostCommand::ListFiles { path })
            }
            TAG_WRITE_CHUNK => Ok(HostCommand::WriteChunk(payload(envelope.data)?)),
            TAG_GET_VERSION => Ok(HostCommand::GetVersion),
            _ => Ok(HostCommand::Unknown),
        }
    }

    /// Wire tag of this command (`None` for unknown tags)
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            HostCommand::Identity(_) => Some(TAG_IDENTITY),
            HostCommand::Stats(_) => Some(TAG_STATS),
            HostCommand::ListFiles { .. } => Some(TAG_LIST_FILES),
            HostCommand::WriteChunk(_) => Some(TAG_WRITE_CHUNK),
            HostCommand::GetVersion => Some(TAG_GET_VERSION),
            HostCommand::Unknown => None,
        }
    }
}

fn payload<T: DeserializeOwned>(data: Option<Value>) -> Result<T, DecodeError> {
    let value = data.ok_or(DecodeError::MissingData)?;
    serde_json::from_value(value).map_err(|_| DecodeError::InvalidPayload)
}

/// One storage directory entry, with the short keys the host expects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Entry name
    #[serde(rename = "n")]
    pub name: String,
    /// Size in bytes (0 for directories)
    #[serde(rename = "s")]
    pub size: u64,
    /// True for directories
    #[serde(rename = "d")]
    pub is_dir: bool,
}

/// Outcome of a storage operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResult {
    pub success: bool,
    pub message: String,
}

impl OperationResult {
    /// Acknowledgement for a `WriteChunk`
    pub fn chunk_written(success: bool) -> Self {
        Self {
            success,
            message: String::from(CHUNK_WRITTEN_MESSAGE),
        }
    }
}

/// Responses sent back to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum DeviceResponse {
    /// Reply to `ListFiles`
    FileList { data: Vec<FileEntry> },
    /// Reply to `WriteChunk`
    OperationResult { data: OperationResult },
    /// Reply to `GetVersion`
    Version { version: String },
}

impl DeviceResponse {
    /// Serialize as one newline-terminated line
    pub fn encode_line(&self) -> Result<Vec<u8>, EncodeError> {
        let mut bytes = serde_json::to_vec(self).map_err(|_| EncodeError::Serialize)?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}
