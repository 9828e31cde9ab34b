//! SideEye Host Protocol
//!
//! This crate defines the serial protocol between the companion host
//! (which samples system telemetry) and the SideEye device.
//!
//! # Protocol Overview
//!
//! Every message is one UTF-8 JSON object on its own line, terminated by
//! `\n` or `\r`:
//!
//! ```text
//! {"type":"Stats","data":{"cpu_percent":12.5,...}}\n
//! {"type":"WriteChunk","data":{"path":"/a/b.txt","offset":0,"data":"SGVsbG8="}}\n
//! {"type":"GetVersion"}\n
//! ```
//!
//! Lines are capped at [`MAX_LINE_LEN`] bytes. There is no checksum and no
//! retry: a line that fails to frame or decode is discarded and the host
//! is expected to resend.

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod frame;
pub mod messages;

pub use frame::{Line, LineFramer, MAX_LINE_LEN};
pub use messages::{
    ChunkPayload, DecodeError, DeviceResponse, FileEntry, HostCommand, IdentityPayload,
    OperationResult, StatsPayload, CHUNK_WRITTEN_MESSAGE,
};
