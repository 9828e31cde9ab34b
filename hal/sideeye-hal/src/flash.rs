//! Flash storage abstractions
//!
//! Provides a trait for persistent key-value storage that can be
//! implemented by chip-specific HALs (NVS partition, LittleFS file, ...).

/// Storage keys for configuration data
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum StorageKey {
    /// Device configuration (binary postcard format)
    DeviceConfig = 0,
    /// WiFi credentials owned by the provisioning layer
    WifiCredentials = 1,
}

impl StorageKey {
    /// All keys, in storage order
    pub const ALL: [StorageKey; 2] = [StorageKey::DeviceConfig, StorageKey::WifiCredentials];

    /// Get the key as a byte value
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Create a key from a byte value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(StorageKey::DeviceConfig),
            1 => Some(StorageKey::WifiCredentials),
            _ => None,
        }
    }
}

/// Errors from flash storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashError {
    /// Flash operation failed
    Flash,
    /// Key not found
    NotFound,
    /// Buffer too small for the data
    BufferTooSmall,
    /// Storage is full
    Full,
}

/// Key-value storage trait
///
/// Writes replace the whole value stored under a key.
pub trait KvStore {
    /// Read a value by key into the provided buffer
    ///
    /// Returns the number of bytes read.
    fn read(&mut self, key: StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError>;

    /// Write a value by key
    fn write(&mut self, key: StorageKey, data: &[u8]) -> Result<(), FlashError>;

    /// Remove a single key
    fn remove(&mut self, key: StorageKey) -> Result<(), FlashError>;

    /// Check if a key exists in storage
    fn exists(&mut self, key: StorageKey) -> bool;

    /// Erase all stored data
    fn erase_all(&mut self) -> Result<(), FlashError> {
        for key in StorageKey::ALL {
            match self.remove(key) {
                Ok(()) | Err(FlashError::NotFound) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}
