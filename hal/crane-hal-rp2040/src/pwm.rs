//! Servo PWM output
//!
//! The PWM slice runs at 1 MHz (125 MHz system clock / 125) with a
//! 20 000 count period, giving a 50 Hz frame in which one count is 1 µs.

use embassy_rp::pwm::{Config, Pwm};

/// Servo frame period (µs)
pub const FRAME_US: u16 = 20_000;

/// Clock divider for 1 µs counts
const DIVIDER: u8 = 125;

/// Servo output on channel A of a PWM slice
pub struct ServoPwm {
    pwm: Pwm<'static>,
    config: Config,
}

impl ServoPwm {
    pub fn new(mut pwm: Pwm<'static>) -> Self {
        let mut config = Config::default();
        config.divider = DIVIDER.into();
        config.top = FRAME_US - 1;
        config.compare_a = 0;
        pwm.set_config(&config);
        Self { pwm, config }
    }
}

impl crane_hal::PwmPin for ServoPwm {
    fn set_pulse_width_us(&mut self, width_us: u16) {
        self.config.compare_a = width_us.min(FRAME_US);
        self.pwm.set_config(&self.config);
    }
}
