//! Motion role (node 2)
//!
//! Drives the three stepper motors. Rate directives from the coordinator
//! take effect immediately; `update` runs one synchronisation cycle.

use crane_hal::{I2cBus, Timer};
use crane_protocol::{Command, NodeAddress};

use super::role::{Context, RoleBehavior, VerifyPoll};
use crate::config::{MotionConfig, SchedulerConfig};
use crate::motion::{CycleReport, SyncScheduler, SELF_TEST_RUNS};
use crate::traits::StepperOutputs;

/// Sleep between polls while settling (ms)
const SETTLE_POLL_MS: u32 = 10;

/// Verification sequence position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionPhase {
    Idle,
    /// Running self-test leg `run`
    SelfTest { run: usize },
    /// Rates reset; waiting before acknowledging
    Settling { until_ms: u64 },
    Done,
}

pub struct MotionRole<S> {
    outputs: S,
    scheduler: SyncScheduler,
    config: MotionConfig,
    phase: MotionPhase,
    last_cycle: CycleReport,
}

impl<S: StepperOutputs> MotionRole<S> {
    pub fn new(outputs: S, scheduler: SchedulerConfig, config: MotionConfig) -> Self {
        Self {
            outputs,
            scheduler: SyncScheduler::new(scheduler),
            config,
            phase: MotionPhase::Idle,
            last_cycle: CycleReport::default(),
        }
    }

    pub fn outputs(&self) -> &S {
        &self.outputs
    }

    pub fn scheduler(&self) -> &SyncScheduler {
        &self.scheduler
    }

    pub fn phase(&self) -> MotionPhase {
        self.phase
    }

    /// Result of the most recent synchronisation cycle
    pub fn last_cycle(&self) -> CycleReport {
        self.last_cycle
    }

    fn reset_rates<T: Timer>(&mut self, timer: &T) {
        self.scheduler.stop_all(&mut self.outputs);
        self.phase = MotionPhase::Settling {
            until_ms: timer.now_ms() + self.config.settle_ms as u64,
        };
    }
}

impl<S: StepperOutputs> RoleBehavior for MotionRole<S> {
    const ADDRESS: NodeAddress = NodeAddress::MOTION;

    fn init<B: I2cBus, T: Timer, const N: usize>(&mut self, _ctx: &mut Context<B, T, N>) {
        self.outputs.enable_all(true);
        info!("motion: drivers enabled");
    }

    fn begin_verify<B: I2cBus, T: Timer, const N: usize>(&mut self, ctx: &mut Context<B, T, N>) {
        if self.config.self_test {
            self.phase = MotionPhase::SelfTest { run: 0 };
        } else {
            self.reset_rates(&ctx.timer);
        }
    }

    fn poll_verify<B: I2cBus, T: Timer, const N: usize>(
        &mut self,
        ctx: &mut Context<B, T, N>,
    ) -> VerifyPoll {
        match self.phase {
            MotionPhase::Idle => VerifyPoll::Done(false),
            MotionPhase::SelfTest { run } => {
                match SELF_TEST_RUNS.get(run) {
                    Some(leg) => {
                        if run > 0 {
                            ctx.timer.delay_ms(self.config.pause_ms);
                        }
                        leg.execute(&mut self.outputs, &mut ctx.timer, self.config.run_ms);
                        self.phase = MotionPhase::SelfTest { run: run + 1 };
                    }
                    None => self.reset_rates(&ctx.timer),
                }
                VerifyPoll::Pending
            }
            MotionPhase::Settling { until_ms } => {
                if ctx.now_ms() < until_ms {
                    ctx.timer.delay_ms(SETTLE_POLL_MS);
                    return VerifyPoll::Pending;
                }
                // Answer the coordinator's ping
                ctx.transport
                    .push_subscribed(&mut ctx.mailbox, NodeAddress::COORDINATOR);
                self.phase = MotionPhase::Done;
                VerifyPoll::Pending
            }
            MotionPhase::Done => VerifyPoll::Done(ctx.status.verified()),
        }
    }

    fn update<B: I2cBus, T: Timer, const N: usize>(&mut self, ctx: &mut Context<B, T, N>) {
        self.last_cycle = self.scheduler.run_cycle(&mut self.outputs, &mut ctx.timer);
    }

    fn on_command<B: I2cBus, T: Timer, const N: usize>(
        &mut self,
        _ctx: &mut Context<B, T, N>,
        command: &Command,
    ) {
        if let Command::StepRate { channel, rps } = *command {
            self.scheduler.set_rate(channel, rps, &mut self.outputs);
        }
    }
}
