//! Device identity
//!
//! The device id is the last three bytes of the station MAC address as
//! upper-case hex. It names the provisioning access point, the broker
//! client, and the device's topics.

use core::fmt::{self, Write};

use heapless::String;

/// Prefix of the access point and broker client names
pub const NAME_PREFIX: &str = "SideEye-";

/// Six hex digit device id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceId(String<6>);

impl DeviceId {
    /// Derive the id from a station MAC address
    pub fn from_mac(mac: [u8; 6]) -> Self {
        let mut id = String::new();
        // Six hex digits fill the buffer exactly
        let _ = write!(id, "{:02X}{:02X}{:02X}", mac[3], mac[4], mac[5]);
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Access point and broker client name, `SideEye-<id>`
    pub fn client_name(&self) -> String<14> {
        let mut name = String::new();
        let _ = name.push_str(NAME_PREFIX);
        let _ = name.push_str(&self.0);
        name
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_mac() {
        let id = DeviceId::from_mac([0x24, 0x0A, 0xC4, 0x1b, 0x2c, 0x03]);
        assert_eq!(id.as_str(), "1B2C03");
        assert_eq!(id.client_name().as_str(), "SideEye-1B2C03");
    }
}
