//! SideEye Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the firmware loop is written
//! against. A board crate (ESP32-C6 GEEK, or a host simulator) implements
//! them and hands the resulting peripherals to `sideeye-firmware`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (sideeye-firmware)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  sideeye-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  board crate  │       │ host simulator│
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::InputPin`] - Digital input (the single user button)
//! - [`uart::UartRx`], [`uart::UartTx`] - Host serial link
//! - [`flash::KvStore`] - Persistent key-value configuration storage
//! - [`time::Monotonic`] - Millisecond tick counter

#![no_std]
#![deny(unsafe_code)]

pub mod flash;
pub mod gpio;
pub mod time;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use flash::{FlashError, KvStore, StorageKey};
pub use gpio::InputPin;
pub use time::Monotonic;
pub use uart::{UartRx, UartTx};
