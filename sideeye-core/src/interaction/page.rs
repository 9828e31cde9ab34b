//! Display pages and orientation

/// Screens shown by the device, in cycling order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Page {
    /// Host name, address, OS, and user
    #[default]
    Identity,
    /// CPU, RAM, and GPU load; focused on alert escalation
    Resources,
    /// Link and broker status
    Status,
    /// File transfer status; focused while chunks arrive
    Storage,
    /// Host temperature
    Thermal,
    /// Throughput graphs
    Network,
}

impl Page {
    pub const ALL: [Page; 6] = [
        Page::Identity,
        Page::Resources,
        Page::Status,
        Page::Storage,
        Page::Thermal,
        Page::Network,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Position in the cycling order
    pub fn index(self) -> usize {
        self as usize
    }

    /// Page at `index`, wrapping modulo the page count
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::COUNT]
    }

    /// Following page, wrapping back to the first
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }
}

/// The two supported landscape orientations
///
/// Values match the panel driver's rotation index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rotation {
    #[default]
    Landscape = 1,
    LandscapeInverted = 3,
}

impl Rotation {
    /// The other orientation
    pub fn toggled(self) -> Self {
        match self {
            Rotation::Landscape => Rotation::LandscapeInverted,
            Rotation::LandscapeInverted => Rotation::Landscape,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Parse a panel rotation index; only 1 and 3 are supported
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Rotation::Landscape),
            3 => Some(Rotation::LandscapeInverted),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_cycle_wraps() {
        let mut page = Page::Identity;
        for _ in 0..Page::COUNT {
            page = page.next();
        }
        assert_eq!(page, Page::Identity);
        assert_eq!(Page::Network.next(), Page::Identity);
        assert_eq!(Page::from_index(7), Page::Resources);
    }

    #[test]
    fn test_page_index_matches_order() {
        for (i, page) in Page::ALL.iter().enumerate() {
            assert_eq!(page.index(), i);
        }
    }

    #[test]
    fn test_rotation() {
        assert_eq!(Rotation::Landscape.toggled(), Rotation::LandscapeInverted);
        assert_eq!(Rotation::LandscapeInverted.toggled(), Rotation::Landscape);
        assert_eq!(Rotation::from_u8(3), Some(Rotation::LandscapeInverted));
        assert_eq!(Rotation::from_u8(2), None);
        assert_eq!(Rotation::Landscape.as_u8(), 1);
    }
}
