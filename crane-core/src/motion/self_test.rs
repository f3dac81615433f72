//! Motor self-test
//!
//! Each motor is driven forward and then in reverse at a fixed pulse
//! interval so an operator can see every axis move during verification.

use crane_hal::Timer;
use crane_protocol::MotorChannel;

use crate::traits::{Direction, StepperOutputs};

/// One leg of the self-test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SelfTestRun {
    pub channel: MotorChannel,
    pub direction: Direction,
    /// Time between step pulses (µs)
    pub interval_us: u32,
}

const fn run(channel: MotorChannel, direction: Direction, interval_us: u32) -> SelfTestRun {
    SelfTestRun {
        channel,
        direction,
        interval_us,
    }
}

/// Self-test legs in execution order
pub const SELF_TEST_RUNS: [SelfTestRun; 6] = [
    run(MotorChannel::One, Direction::Clockwise, 250),
    run(MotorChannel::One, Direction::CounterClockwise, 500),
    run(MotorChannel::Two, Direction::Clockwise, 750),
    run(MotorChannel::Two, Direction::CounterClockwise, 1000),
    run(MotorChannel::Three, Direction::Clockwise, 5000),
    run(MotorChannel::Three, Direction::CounterClockwise, 2500),
];

impl SelfTestRun {
    /// Step continuously for `duration_ms`, blocking
    ///
    /// Returns the number of pulses emitted.
    pub fn execute<S, T>(&self, outputs: &mut S, timer: &mut T, duration_ms: u32) -> u32
    where
        S: StepperOutputs,
        T: Timer,
    {
        let start = timer.now_ms();
        let mut pulses = 0;
        while timer.elapsed_ms(start) < duration_ms as u64 {
            outputs.step_toward(self.channel, self.direction);
            timer.delay_us(self.interval_us);
            pulses += 1;
        }
        debug!(
            "self-test motor {}: {} pulses",
            self.channel.number(),
            pulses
        );
        pulses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockStepper, MockTimer, StepperEvent};

    #[test]
    fn test_every_motor_runs_both_ways() {
        for channel in MotorChannel::ALL {
            let legs: std::vec::Vec<_> = SELF_TEST_RUNS
                .iter()
                .filter(|r| r.channel == channel)
                .map(|r| r.direction)
                .collect();
            assert_eq!(legs, [Direction::Clockwise, Direction::CounterClockwise]);
        }
    }

    #[test]
    fn test_execute_steps_for_duration() {
        let mut outputs = MockStepper::default();
        let mut timer = MockTimer::new();

        // 5 ms interval over 1000 ms
        let pulses = SELF_TEST_RUNS[4].execute(&mut outputs, &mut timer, 1000);

        assert_eq!(pulses, 200);
        assert_eq!(outputs.steps(MotorChannel::Three), 200);
        assert_eq!(
            &outputs.events[..2],
            [
                StepperEvent::Direction(MotorChannel::Three, Direction::Clockwise),
                StepperEvent::Step(MotorChannel::Three),
            ]
        );
    }
}
