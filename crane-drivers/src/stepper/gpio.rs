//! GPIO step/direction stepper drivers
//!
//! Three A4988-style drivers, each wired with a step, a direction and an
//! active-low enable line.

use crane_core::traits::{Direction, StepperOutputs};
use crane_hal::{Delay, OutputPin};
use crane_protocol::MotorChannel;

/// Default step pulse high time (µs)
pub const STEP_PULSE_US: u32 = 3;

/// Pins of one stepper driver
pub struct StepperPins<P> {
    pub step: P,
    pub dir: P,
    /// Active low
    pub enable: P,
}

/// Step/direction outputs for the three motion-node drivers
///
/// Drivers start disabled; [`StepperOutputs::enable_all`] turns them on.
pub struct GpioStepperBank<P, W> {
    motors: [StepperPins<P>; 3],
    delay: W,
}

impl<P: OutputPin, W: Delay> GpioStepperBank<P, W> {
    /// Create a bank from the pins of motors 1, 2 and 3
    pub fn new(motors: [StepperPins<P>; 3], delay: W) -> Self {
        let mut bank = Self {
            motors,
            delay,
        };
        for motor in bank.motors.iter_mut() {
            motor.step.set_low();
            motor.enable.set_high();
        }
        bank
    }

    /// Pins of `channel`
    pub fn pins(&self, channel: MotorChannel) -> &StepperPins<P> {
        &self.motors[channel.index()]
    }

    /// Check whether the driver of `channel` is enabled
    pub fn is_enabled(&self, channel: MotorChannel) -> bool {
        self.pins(channel).enable.is_set_low()
    }
}

impl<P: OutputPin, W: Delay> StepperOutputs for GpioStepperBank<P, W> {
    fn set_direction(&mut self, channel: MotorChannel, dir: Direction) {
        self.motors[channel.index()].dir.set_state(dir.is_high());
    }

    fn step(&mut self, channel: MotorChannel) {
        let pin = &mut self.motors[channel.index()].step;
        pin.set_high();
        self.delay.delay_us(STEP_PULSE_US);
        pin.set_low();
    }

    fn enable(&mut self, channel: MotorChannel, enabled: bool) {
        self.motors[channel.index()].enable.set_state(!enabled);
    }
}
