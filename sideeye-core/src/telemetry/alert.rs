//! Host alert severity

/// Alert severity reported by the host, ordered by urgency
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlertLevel {
    #[default]
    Normal = 0,
    Warning = 1,
    Critical = 2,
}

impl AlertLevel {
    /// Convert from the wire value
    ///
    /// Values above 2 are treated as Critical.
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => AlertLevel::Normal,
            1 => AlertLevel::Warning,
            _ => AlertLevel::Critical,
        }
    }

    /// Convert to the wire value
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Check if the banner should flash
    pub fn is_critical(self) -> bool {
        self == AlertLevel::Critical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(AlertLevel::Normal < AlertLevel::Warning);
        assert!(AlertLevel::Warning < AlertLevel::Critical);
    }

    #[test]
    fn test_from_u8() {
        assert_eq!(AlertLevel::from_u8(0), AlertLevel::Normal);
        assert_eq!(AlertLevel::from_u8(1), AlertLevel::Warning);
        assert_eq!(AlertLevel::from_u8(2), AlertLevel::Critical);
        assert_eq!(AlertLevel::from_u8(9), AlertLevel::Critical);
        assert_eq!(AlertLevel::Warning.as_u8(), 1);
    }
}
