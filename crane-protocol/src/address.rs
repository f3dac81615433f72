//! Node addressing on the shared bus

/// A 7-bit bus address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NodeAddress(u8);

impl NodeAddress {
    /// Coordinator node (bluetooth, gripper, verification master)
    pub const COORDINATOR: Self = Self(1);
    /// Motion node (three stepper motors)
    pub const MOTION: Self = Self(2);
    /// Display node (LCD and status LED)
    pub const DISPLAY: Self = Self(3);

    /// Highest valid 7-bit address
    pub const MAX: u8 = 0x7F;

    /// Create an address, rejecting values that do not fit in 7 bits
    pub const fn new(raw: u8) -> Option<Self> {
        if raw <= Self::MAX {
            Some(Self(raw))
        } else {
            None
        }
    }

    /// Raw address value
    pub const fn get(self) -> u8 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seven_bit_range() {
        assert_eq!(NodeAddress::new(0x7F).map(NodeAddress::get), Some(0x7F));
        assert_eq!(NodeAddress::new(0x80), None);
    }

    #[test]
    fn test_well_known_addresses() {
        assert_eq!(NodeAddress::COORDINATOR.get(), 1);
        assert_eq!(NodeAddress::MOTION.get(), 2);
        assert_eq!(NodeAddress::DISPLAY.get(), 3);
    }
}
