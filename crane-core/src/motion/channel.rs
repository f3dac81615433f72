//! Per-motor step timing

use crate::config::SchedulerConfig;
use crate::traits::Direction;

/// Delay reported for a stopped channel (ms)
pub const DISABLED_DELAY_MS: u16 = 250;

/// Time between step pulses of one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepDelay {
    /// Channel does not step
    #[default]
    Disabled,
    /// One pulse every `n` milliseconds (n ≥ 1)
    Every(u16),
}

impl StepDelay {
    /// Delay for a signed rate in rotations per second
    ///
    /// `|rps| <= epsilon` (and NaN) disables the channel; otherwise the
    /// delay is `round(pulse_constant / |rps|)`, at least 1 ms.
    pub fn from_rate(rps: f32, config: &SchedulerConfig) -> Self {
        let magnitude = if rps < 0.0 { -rps } else { rps };
        if !(magnitude > config.epsilon) {
            return StepDelay::Disabled;
        }

        let exact = config.pulse_constant / magnitude;
        // Float to int casts saturate
        let rounded = (exact + 0.5) as u32;
        StepDelay::Every(rounded.clamp(1, u16::MAX as u32) as u16)
    }

    /// Delay in milliseconds, `None` when disabled
    pub fn millis(self) -> Option<u16> {
        match self {
            StepDelay::Disabled => None,
            StepDelay::Every(ms) => Some(ms),
        }
    }

    /// Delay in milliseconds, with the disabled sentinel
    pub fn as_millis(self) -> u16 {
        self.millis().unwrap_or(DISABLED_DELAY_MS)
    }

    pub fn is_enabled(self) -> bool {
        self != StepDelay::Disabled
    }
}

/// Timing state of one stepper channel
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepperChannel {
    /// Requested rate (rotations per second, sign = direction)
    pub rate_rps: f32,
    /// Derived step delay
    pub delay: StepDelay,
    /// Direction derived from the rate sign
    pub direction: Direction,
}

impl StepperChannel {
    /// Recompute delay and direction for a new rate
    pub fn set_rate(&mut self, rps: f32, config: &SchedulerConfig) {
        // Replaced as a whole, never field by field
        *self = Self {
            rate_rps: rps,
            delay: StepDelay::from_rate(rps, config),
            direction: Direction::from_rate(rps),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_and_tiny_rates_disable() {
        let config = SchedulerConfig::default();
        assert_eq!(StepDelay::from_rate(0.0, &config), StepDelay::Disabled);
        assert_eq!(StepDelay::from_rate(0.02, &config), StepDelay::Disabled);
        assert_eq!(StepDelay::from_rate(-0.01, &config), StepDelay::Disabled);
        assert_eq!(StepDelay::from_rate(f32::NAN, &config), StepDelay::Disabled);
        assert_eq!(StepDelay::from_rate(0.0, &config).as_millis(), DISABLED_DELAY_MS);
    }

    #[test]
    fn test_unit_rate_is_pulse_constant() {
        let config = SchedulerConfig::default();
        assert_eq!(StepDelay::from_rate(1.0, &config), StepDelay::Every(5));
        assert_eq!(StepDelay::from_rate(-1.0, &config), StepDelay::Every(5));
    }

    #[test]
    fn test_delay_rounds_and_clamps() {
        let config = SchedulerConfig::default();
        // 5 / 1.5 = 3.33
        assert_eq!(StepDelay::from_rate(1.5, &config), StepDelay::Every(3));
        // 5 / 2.0 = 2.5
        assert_eq!(StepDelay::from_rate(2.0, &config), StepDelay::Every(3));
        // 5 / 100 = 0.05
        assert_eq!(StepDelay::from_rate(100.0, &config), StepDelay::Every(1));
        // 5 / 0.021 = 238.1
        assert_eq!(StepDelay::from_rate(0.021, &config), StepDelay::Every(238));
    }

    #[test]
    fn test_channel_direction_follows_sign() {
        let config = SchedulerConfig::default();
        let mut channel = StepperChannel::default();
        channel.set_rate(-0.5, &config);
        assert_eq!(channel.direction, Direction::CounterClockwise);
        assert_eq!(channel.delay, StepDelay::Every(10));
        channel.set_rate(0.5, &config);
        assert_eq!(channel.direction, Direction::Clockwise);
    }
}
