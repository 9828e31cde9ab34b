//! Board peripheral bundle

use sideeye_core::traits::{Display, FileStorage, Network};
use sideeye_hal::gpio::ActiveLowButton;
use sideeye_hal::{InputPin, KvStore, UartRx, UartTx};

/// Peripheral types provided by a board crate
pub trait Platform {
    /// Pulled-up input the user button pulls low
    type Button: InputPin;
    /// Host serial link
    type Serial: UartRx + UartTx;
    type Display: Display;
    type Network: Network;
    /// SD card or similar hierarchical storage
    type Storage: FileStorage;
    /// Persistent key-value configuration store
    type ConfigStore: KvStore;
}

/// Initialized peripherals handed to [`crate::Firmware::boot`]
pub struct Hardware<P: Platform> {
    pub button: ActiveLowButton<P::Button>,
    pub serial: P::Serial,
    pub display: P::Display,
    pub network: P::Network,
    pub storage: P::Storage,
    pub config_store: P::ConfigStore,
    /// Station MAC address, source of the device id
    pub mac: [u8; 6],
}
