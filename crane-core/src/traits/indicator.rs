//! Status LED traits

/// An RGB colour for a tri-colour status LED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Colour {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Colour {
    pub const OFF: Self = Self::rgb(0, 0, 0);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Low supply voltage warning
    pub const AMBER: Self = Self::rgb(255, 84, 0);

    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    pub fn is_off(self) -> bool {
        self == Self::OFF
    }
}

/// Tri-colour status LED
pub trait StatusIndicator {
    /// Show `colour`
    fn set_colour(&mut self, colour: Colour);
}
