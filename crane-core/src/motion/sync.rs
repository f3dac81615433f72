//! Synchronised stepping of the three motion-node motors
//!
//! A synchronisation cycle is a run of 1 ms ticks long enough for every
//! enabled channel to complete a whole number of step periods, so all
//! channels return to phase at the end of the cycle. Each channel pulses
//! on the ticks where its elapsed time equals its delay.
//!
//! The cycle blocks the node for its whole duration. Phase alignment is
//! only as good as the 1 ms tick (±1 ms jitter per pulse).

use crane_hal::Delay;
use crane_protocol::MotorChannel;

use super::channel::{StepDelay, StepperChannel};
use crate::config::SchedulerConfig;
use crate::traits::{Direction, StepperOutputs};

/// Pairs checked by the two-equal shortcut: (first, second, third)
const PAIRS: [(usize, usize, usize); 3] = [(0, 1, 2), (1, 2, 0), (0, 2, 1)];

/// Length of one synchronisation cycle in ticks (ms)
///
/// This is an approximation of the least common multiple, kept as
/// predictable policy:
///
/// 1. Disabled channels count as `disabled_stand_in_ms`. If all three
///    values are then equal, that value is the cycle.
/// 2. If two *enabled* delays are equal, the cycle is `equal × third`, or
///    `equal × equal` when the third channel is disabled. Only exact when
///    the equal delay shares no factor with the third.
/// 3. Otherwise the enabled delays are searched: the smallest multiple of
///    the largest delay, by a factor up to `search_factors`, that every
///    enabled delay divides.
/// 4. If the search fails, the product of the enabled delays.
pub fn cycle_length(delays: &[StepDelay; 3], config: &SchedulerConfig) -> u32 {
    let stand_in = config.disabled_stand_in_ms as u32;
    let values = delays.map(|d| d.millis().map_or(stand_in, u32::from));
    if values[0] == values[1] && values[1] == values[2] {
        return values[0];
    }

    for (first, second, third) in PAIRS {
        if let (Some(a), Some(b)) = (delays[first].millis(), delays[second].millis()) {
            if a == b {
                let equal = a as u32;
                let other = delays[third].millis().map_or(equal, u32::from);
                return equal.saturating_mul(other);
            }
        }
    }

    let mut enabled = [0u32; 3];
    let mut count = 0;
    for delay in delays.iter().filter_map(|d| d.millis()) {
        enabled[count] = delay as u32;
        count += 1;
    }
    let enabled = &enabled[..count];

    let Some(&largest) = enabled.iter().max() else {
        return stand_in;
    };
    for factor in 1..=config.search_factors as u32 {
        let candidate = largest.saturating_mul(factor);
        if enabled.iter().all(|&d| candidate % d == 0) {
            return candidate;
        }
    }

    enabled
        .iter()
        .fold(1u32, |product, &d| product.saturating_mul(d))
}

/// Outcome of one synchronisation cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleReport {
    /// Cycle length (ms)
    pub length_ms: u32,
    /// Pulses emitted per channel
    pub pulses: [u32; 3],
}

/// Step scheduler for three channels
#[derive(Debug, Clone, Default)]
pub struct SyncScheduler {
    channels: [StepperChannel; 3],
    config: SchedulerConfig,
}

impl SyncScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            channels: [StepperChannel::default(); 3],
            config,
        }
    }

    /// Timing state of `channel`
    pub fn channel(&self, channel: MotorChannel) -> &StepperChannel {
        &self.channels[channel.index()]
    }

    /// Current delays in channel order
    pub fn delays(&self) -> [StepDelay; 3] {
        self.channels.map(|c| c.delay)
    }

    /// Set the rate of `channel` and apply its direction immediately
    pub fn set_rate<S: StepperOutputs>(&mut self, channel: MotorChannel, rps: f32, outputs: &mut S) {
        let state = &mut self.channels[channel.index()];
        state.set_rate(rps, &self.config);
        outputs.set_direction(channel, state.direction);
        debug!(
            "motor {}: {} rps, delay {} ms",
            channel.number(),
            rps,
            state.delay.as_millis()
        );
    }

    /// Stop every channel
    pub fn stop_all<S: StepperOutputs>(&mut self, outputs: &mut S) {
        for channel in MotorChannel::ALL {
            self.set_rate(channel, 0.0, outputs);
        }
    }

    /// Direction of `channel`
    pub fn direction(&self, channel: MotorChannel) -> Direction {
        self.channels[channel.index()].direction
    }

    /// Run one synchronisation cycle
    ///
    /// Blocks for `length_ms` milliseconds. Every enabled channel pulses at
    /// least once, on the first tick: elapsed counters start one full delay
    /// in the past.
    pub fn run_cycle<S, D>(&mut self, outputs: &mut S, delay: &mut D) -> CycleReport
    where
        S: StepperOutputs,
        D: Delay,
    {
        let delays = self.delays();
        let length_ms = cycle_length(&delays, &self.config);
        let mut last = delays.map(|d| -(d.as_millis() as i64));
        let mut report = CycleReport {
            length_ms,
            pulses: [0; 3],
        };

        for tick in 0..length_ms as i64 {
            delay.delay_ms(1);
            for channel in MotorChannel::ALL {
                let i = channel.index();
                let Some(period) = delays[i].millis() else {
                    continue;
                };
                if tick - last[i] == period as i64 {
                    outputs.step(channel);
                    last[i] = tick;
                    report.pulses[i] += 1;
                }
            }
        }

        trace!(
            "sync cycle {} ms, pulses {} {} {}",
            length_ms,
            report.pulses[0],
            report.pulses[1],
            report.pulses[2]
        );
        report
    }
}
