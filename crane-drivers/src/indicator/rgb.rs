//! Tri-colour status LED on three GPIO lines

use crane_core::traits::{Colour, StatusIndicator};
use crane_hal::OutputPin;

/// Common-cathode RGB LED, one pin per channel
///
/// Channels are on/off only: any non-zero component lights its LED.
pub struct RgbIndicator<P> {
    red: P,
    green: P,
    blue: P,
    colour: Colour,
}

impl<P: OutputPin> RgbIndicator<P> {
    pub fn new(red: P, green: P, blue: P) -> Self {
        let mut led = Self {
            red,
            green,
            blue,
            colour: Colour::OFF,
        };
        led.set_colour(Colour::OFF);
        led
    }

    /// Last colour shown
    pub fn colour(&self) -> Colour {
        self.colour
    }
}

impl<P: OutputPin> StatusIndicator for RgbIndicator<P> {
    fn set_colour(&mut self, colour: Colour) {
        self.red.set_state(colour.red > 0);
        self.green.set_state(colour.green > 0);
        self.blue.set_state(colour.blue > 0);
        self.colour = colour;
    }
}
