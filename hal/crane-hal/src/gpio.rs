//! Digital output
//!
//! Every line the crane nodes drive directly is a push-pull output: step,
//! direction and enable lines, the status LEDs, the LCD bus and the stepper
//! power relay. Nothing reads a GPIO input.

/// Digital output pin
pub trait OutputPin {
    fn set_high(&mut self);

    fn set_low(&mut self);

    /// Drive the pin to `high`
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Last level written to the pin
    fn is_set_high(&self) -> bool;

    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}
