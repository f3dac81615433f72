//! Stepper output trait
//!
//! Abstracts the step/direction/enable pins of the three stepper drivers on
//! the motion node (A4988-style step/dir inputs).

use crane_protocol::MotorChannel;

/// Motor rotation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Clockwise rotation (direction pin high)
    Clockwise,
    /// Counter-clockwise rotation (direction pin low)
    #[default]
    CounterClockwise,
}

impl Direction {
    /// Direction implied by the sign of a rate
    ///
    /// Zero maps to counter-clockwise, like a low direction pin.
    pub fn from_rate(rps: f32) -> Self {
        if rps > 0.0 {
            Direction::Clockwise
        } else {
            Direction::CounterClockwise
        }
    }

    /// Level of the direction pin
    pub fn is_high(self) -> bool {
        self == Direction::Clockwise
    }
}

/// Step/direction outputs of the motion node's drivers
pub trait StepperOutputs {
    /// Drive the direction pin of `channel`
    fn set_direction(&mut self, channel: MotorChannel, dir: Direction);

    /// Emit one step pulse (rising then falling edge, fixed width)
    fn step(&mut self, channel: MotorChannel);

    /// Set direction, then step
    ///
    /// The direction pin must settle before the step edge or the driver
    /// may take the step the wrong way.
    fn step_toward(&mut self, channel: MotorChannel, dir: Direction) {
        self.set_direction(channel, dir);
        self.step(channel);
    }

    /// Enable or disable the driver of `channel`
    ///
    /// When disabled, the motor is free to rotate and does not hold position.
    fn enable(&mut self, channel: MotorChannel, enabled: bool);

    /// Enable or disable all drivers
    fn enable_all(&mut self, enabled: bool) {
        for channel in MotorChannel::ALL {
            self.enable(channel, enabled);
        }
    }
}
