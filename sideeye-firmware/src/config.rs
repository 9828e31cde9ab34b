//! Configuration persistence
//!
//! Loads the device configuration from the key-value store.
//! Falls back to defaults if nothing has been stored yet.

use log::{debug, info, warn};

use sideeye_core::config::{DeviceConfig, CONFIG_VERSION};
use sideeye_hal::{FlashError, KvStore, StorageKey};

/// Maximum serialized config size (binary)
const MAX_CONFIG_SIZE: usize = 512;

/// Configuration persistence errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Store operation failed
    Flash(FlashError),
    /// Serialization failed
    Serialize,
    /// Deserialization failed
    Deserialize,
    /// Config version mismatch
    VersionMismatch,
}

impl From<FlashError> for ConfigError {
    fn from(e: FlashError) -> Self {
        ConfigError::Flash(e)
    }
}

/// Configuration persistence manager
pub struct ConfigPersistence<K> {
    store: K,
}

impl<K: KvStore> ConfigPersistence<K> {
    pub fn new(store: K) -> Self {
        Self { store }
    }

    /// Consume this persistence manager and return the underlying store
    pub fn into_store(self) -> K {
        self.store
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    /// Load configuration from the store
    pub fn load(&mut self) -> Result<DeviceConfig, ConfigError> {
        let mut buffer = [0u8; MAX_CONFIG_SIZE];
        let len = self.store.read(StorageKey::DeviceConfig, &mut buffer)?;

        debug!("read {} bytes of config", len);

        let config: DeviceConfig =
            postcard::from_bytes(&buffer[..len]).map_err(|_| ConfigError::Deserialize)?;

        if config.version != CONFIG_VERSION {
            warn!(
                "config version mismatch: found {}, expected {}",
                config.version, CONFIG_VERSION
            );
            return Err(ConfigError::VersionMismatch);
        }

        log_config_summary(&config);
        Ok(config)
    }

    /// Load configuration, using defaults when none is stored or it is unreadable
    pub fn load_or_default(&mut self) -> DeviceConfig {
        match self.load() {
            Ok(config) => config,
            Err(ConfigError::Flash(FlashError::NotFound)) => {
                info!("no stored config, using defaults");
                DeviceConfig::default()
            }
            Err(e) => {
                warn!("failed to load config: {:?}, using defaults", e);
                DeviceConfig::default()
            }
        }
    }

    /// Store configuration
    pub fn save(&mut self, config: &DeviceConfig) -> Result<(), ConfigError> {
        let mut buffer = [0u8; MAX_CONFIG_SIZE];
        let bytes = postcard::to_slice(config, &mut buffer).map_err(|_| ConfigError::Serialize)?;
        self.store.write(StorageKey::DeviceConfig, bytes)?;
        info!("config saved ({} bytes)", bytes.len());
        Ok(())
    }

    /// Erase everything in the store (factory reset)
    pub fn erase(&mut self) -> Result<(), ConfigError> {
        self.store.erase_all()?;
        Ok(())
    }
}

fn log_config_summary(config: &DeviceConfig) {
    info!("configuration loaded");
    debug!("  brightness {}", config.brightness);
    debug!("  rotation {:?}", config.rotation);
    debug!("  page dwell {} ms", config.page_dwell_ms);
    if config.mqtt.is_configured() {
        debug!("  broker {}:{}", config.mqtt.server, config.mqtt.port);
    } else {
        debug!("  no broker configured");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemKv;
    use sideeye_core::config::setting;
    use sideeye_core::interaction::Rotation;

    #[test]
    fn test_missing_config_uses_defaults() {
        let mut persistence = ConfigPersistence::new(MemKv::new());
        assert_eq!(
            persistence.load(),
            Err(ConfigError::Flash(FlashError::NotFound))
        );
        assert_eq!(persistence.load_or_default(), DeviceConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let mut persistence = ConfigPersistence::new(MemKv::new());
        let mut config = DeviceConfig::default();
        config.brightness = 40;
        config.rotation = Rotation::LandscapeInverted;
        config.mqtt.server = setting("broker.local");
        persistence.save(&config).unwrap();

        assert_eq!(persistence.load(), Ok(config));
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let mut persistence = ConfigPersistence::new(MemKv::new());
        let mut config = DeviceConfig::default();
        config.version = CONFIG_VERSION + 1;
        persistence.save(&config).unwrap();

        assert_eq!(persistence.load(), Err(ConfigError::VersionMismatch));
        assert_eq!(persistence.load_or_default(), DeviceConfig::default());
    }

    #[test]
    fn test_garbage_rejected() {
        let mut store = MemKv::new();
        store.write(StorageKey::DeviceConfig, &[0xFF; 3]).unwrap();
        let mut persistence = ConfigPersistence::new(store);
        assert_eq!(persistence.load(), Err(ConfigError::Deserialize));
    }

    #[test]
    fn test_erase() {
        let mut persistence = ConfigPersistence::new(MemKv::new());
        persistence.save(&DeviceConfig::default()).unwrap();
        persistence.erase().unwrap();
        assert!(!persistence.store().contains(StorageKey::DeviceConfig));
    }
}
