//! SideEye firmware
//!
//! Wires the board-agnostic control layer to a board's peripherals and
//! runs it as one cooperative loop. The board crate builds a [`Hardware`]
//! bundle, calls [`Firmware::boot`], then calls [`Firmware::poll`] forever
//! with the current millisecond tick, restarting the chip when it returns
//! [`LoopAction::Restart`].
//!
//! # Loop iteration
//!
//! ```text
//!   button sample ─► classifier ─► interaction ──(LongHold)──► factory reset
//!   network service
//!   liveness / sync status housekeeping
//!   page cycling
//!   critical banner flash
//!   serial bytes ─► framer ─► dispatcher ─► response lines
//!   pending refresh ─► display.render
//! ```

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod app;
pub mod config;
pub mod device_id;
pub mod mqtt;
pub mod platform;
pub mod settings;

#[cfg(test)]
mod testing;

pub use app::{Firmware, LoopAction, BANNER_FLASH_MS, RX_BUDGET};
pub use config::{ConfigError, ConfigPersistence};
pub use device_id::DeviceId;
pub use platform::{Hardware, Platform};
pub use settings::{SettingChange, SettingError};

/// Version reported to the host and in discovery metadata
pub const FIRMWARE_VERSION: &str = env!("CARGO_PKG_VERSION");
