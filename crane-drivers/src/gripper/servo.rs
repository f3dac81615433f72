//! Hobby servo gripper
//!
//! Angle 0..=180° maps linearly onto a 544..=2400 µs pulse, the range
//! common hobby servos accept.

use crane_core::traits::GripperActuator;
use crane_hal::PwmPin;

/// Pulse width at 0° (µs)
pub const MIN_PULSE_US: u16 = 544;

/// Pulse width at 180° (µs)
pub const MAX_PULSE_US: u16 = 2400;

/// Largest commandable angle
pub const MAX_ANGLE: u8 = 180;

/// Pulse width for `degrees`, clamped to the servo's range
pub fn pulse_width_us(degrees: u8) -> u16 {
    let degrees = degrees.min(MAX_ANGLE) as u32;
    let span = (MAX_PULSE_US - MIN_PULSE_US) as u32;
    MIN_PULSE_US + (degrees * span / MAX_ANGLE as u32) as u16
}

/// Gripper driven by a servo on a PWM output
pub struct ServoGripper<P> {
    pwm: P,
    angle: Option<u8>,
}

impl<P: PwmPin> ServoGripper<P> {
    pub fn new(pwm: P) -> Self {
        Self { pwm, angle: None }
    }

    /// Last commanded angle, if any
    pub fn angle(&self) -> Option<u8> {
        self.angle
    }
}

impl<P: PwmPin> GripperActuator for ServoGripper<P> {
    fn set_angle(&mut self, degrees: u8) {
        let degrees = degrees.min(MAX_ANGLE);
        self.pwm.set_pulse_width_us(pulse_width_us(degrees));
        self.angle = Some(degrees);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Default)]
    struct MockPwm {
        width_us: u16,
    }

    impl PwmPin for MockPwm {
        fn set_pulse_width_us(&mut self, width_us: u16) {
            self.width_us = width_us;
        }
    }

    #[test]
    fn test_endpoints() {
        assert_eq!(pulse_width_us(0), 544);
        assert_eq!(pulse_width_us(90), 1472);
        assert_eq!(pulse_width_us(180), 2400);
        assert_eq!(pulse_width_us(255), 2400);
    }

    #[test]
    fn test_set_angle_drives_pwm() {
        let mut gripper = ServoGripper::new(MockPwm::default());
        assert_eq!(gripper.angle(), None);

        gripper.set_angle(160);
        assert_eq!(gripper.angle(), Some(160));
        assert_eq!(gripper.pwm.width_us, pulse_width_us(160));

        gripper.set_angle(200);
        assert_eq!(gripper.angle(), Some(180));
    }

    proptest! {
        #[test]
        fn prop_pulse_width_is_monotonic(a in 0u8..180) {
            prop_assert!(pulse_width_us(a) <= pulse_width_us(a + 1));
            prop_assert!((MIN_PULSE_US..=MAX_PULSE_US).contains(&pulse_width_us(a)));
        }
    }
}
