//! Display role (node 3)
//!
//! Presents the verification outcome and, afterwards, the status snapshot
//! on the character display and the tri-colour status LED.

use core::fmt::Write;

use crane_hal::{I2cBus, Timer};
use crane_protocol::NodeAddress;
use heapless::String;

use super::role::{Context, RoleBehavior, VerifyPoll};
use crate::config::DisplayConfig;
use crate::state::{indicator_colour, CONNECT_FRAMES};
use crate::traits::{Colour, StatusDisplay, StatusIndicator};

/// Sleep between polls while waiting (ms)
const WAIT_POLL_MS: u32 = 10;

/// Colours shown by the LED test, in order
const LED_TEST: [Colour; 3] = [Colour::RED, Colour::BLUE, Colour::GREEN];

/// Verification sequence position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayPhase {
    Idle,
    /// "Starting..." with every LED lit
    Starting { until_ms: u64 },
    /// Drawing progress tick `tick` when `at_ms` is reached
    Progress { tick: u8, at_ms: u64 },
    /// Waiting for the coordinator's verdict
    Settling { until_ms: u64 },
    /// Verdict on screen
    Verdict { until_ms: u64 },
    /// Showing LED test colour `step` until `until_ms`
    LedTest { step: usize, until_ms: u64 },
    Done,
}

pub struct DisplayRole<D, I> {
    display: D,
    indicator: I,
    config: DisplayConfig,
    phase: DisplayPhase,
    frame: u8,
    ack_pushed: bool,
}

impl<D: StatusDisplay, I: StatusIndicator> DisplayRole<D, I> {
    pub fn new(display: D, indicator: I, config: DisplayConfig) -> Self {
        Self {
            display,
            indicator,
            config,
            phase: DisplayPhase::Idle,
            frame: 0,
            ack_pushed: false,
        }
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn indicator(&self) -> &I {
        &self.indicator
    }

    pub fn phase(&self) -> DisplayPhase {
        self.phase
    }

    /// Current connection animation frame
    pub fn frame(&self) -> u8 {
        self.frame
    }

    fn show(&mut self, top: &str, bottom: &str) {
        if let Err(e) = self.display.show_message(top, bottom) {
            warn!("display: write failed: {}", e);
        }
    }

    fn show_verdict<B: I2cBus, T: Timer, const N: usize>(&mut self, ctx: &mut Context<B, T, N>) {
        let verified = ctx.status.verified();
        if !verified {
            ctx.status.set_text("I2C Fail");
        }
        let top = if verified { "I2C: PASS" } else { "I2C: FAIL" };
        let mut bottom: String<16> = String::new();
        let _ = write!(bottom, "HC-06: {}", ctx.status.snapshot().link_status.label());
        self.show(top, &bottom);
        info!("display: verification {}", if verified { "passed" } else { "failed" });
    }
}

impl<D: StatusDisplay, I: StatusIndicator> RoleBehavior for DisplayRole<D, I> {
    const ADDRESS: NodeAddress = NodeAddress::DISPLAY;

    fn init<B: I2cBus, T: Timer, const N: usize>(&mut self, _ctx: &mut Context<B, T, N>) {
        self.indicator.set_colour(Colour::OFF);
        self.show("", "");
    }

    fn begin_verify<B: I2cBus, T: Timer, const N: usize>(&mut self, ctx: &mut Context<B, T, N>) {
        self.show("Starting...", "");
        self.indicator.set_colour(Colour::WHITE);
        self.ack_pushed = false;
        self.phase = DisplayPhase::Starting {
            until_ms: ctx.now_ms() + self.config.starting_ms as u64,
        };
    }

    fn poll_verify<B: I2cBus, T: Timer, const N: usize>(
        &mut self,
        ctx: &mut Context<B, T, N>,
    ) -> VerifyPoll {
        let now = ctx.now_ms();
        let due = match self.phase {
            DisplayPhase::Idle => return VerifyPoll::Done(false),
            DisplayPhase::Done => return VerifyPoll::Done(ctx.status.verified()),
            DisplayPhase::Starting { until_ms }
            | DisplayPhase::Settling { until_ms }
            | DisplayPhase::Verdict { until_ms }
            | DisplayPhase::LedTest { until_ms, .. } => until_ms,
            DisplayPhase::Progress { at_ms, .. } => at_ms,
        };
        if now < due {
            ctx.timer.delay_ms(WAIT_POLL_MS);
            return VerifyPoll::Pending;
        }

        self.phase = match self.phase {
            DisplayPhase::Starting { .. } => {
                self.indicator.set_colour(Colour::OFF);
                DisplayPhase::Progress { tick: 0, at_ms: now }
            }
            DisplayPhase::Progress { tick, .. } => {
                // Ack tick has been on screen for a full period
                let ack_at = self
                    .config
                    .ack_tick
                    .saturating_add(1)
                    .min(self.config.progress_ticks);
                if tick == ack_at && !self.ack_pushed {
                    ctx.transport
                        .push_subscribed(&mut ctx.mailbox, NodeAddress::COORDINATOR);
                    self.ack_pushed = true;
                    // Tick `ack_at` is drawn by the next poll
                    return VerifyPoll::Pending;
                }
                if tick >= self.config.progress_ticks {
                    DisplayPhase::Settling {
                        until_ms: now + self.config.settle_ms as u64,
                    }
                } else {
                    if let Err(e) = self.display.show_progress(tick) {
                        warn!("display: progress failed: {}", e);
                    }
                    DisplayPhase::Progress {
                        tick: tick + 1,
                        at_ms: now + self.config.tick_ms as u64,
                    }
                }
            }
            DisplayPhase::Settling { .. } => {
                self.show_verdict(ctx);
                DisplayPhase::Verdict {
                    until_ms: now + self.config.verdict_hold_ms as u64,
                }
            }
            DisplayPhase::Verdict { .. } => {
                self.indicator.set_colour(LED_TEST[0]);
                DisplayPhase::LedTest {
                    step: 0,
                    until_ms: now + self.config.led_step_ms as u64,
                }
            }
            DisplayPhase::LedTest { step, .. } => match LED_TEST.get(step + 1) {
                Some(&colour) => {
                    self.indicator.set_colour(colour);
                    DisplayPhase::LedTest {
                        step: step + 1,
                        until_ms: now + self.config.led_step_ms as u64,
                    }
                }
                None => {
                    self.indicator.set_colour(Colour::OFF);
                    DisplayPhase::Done
                }
            },
            phase @ (DisplayPhase::Idle | DisplayPhase::Done) => phase,
        };
        VerifyPoll::Pending
    }

    fn update<B: I2cBus, T: Timer, const N: usize>(&mut self, ctx: &mut Context<B, T, N>) {
        let snapshot = ctx.status.snapshot();
        if !snapshot.link_connected {
            self.frame = (self.frame + 1) % CONNECT_FRAMES;
        }
        if let Err(e) = self.display.render(snapshot, self.frame) {
            warn!("display: render failed: {}", e);
        }
        self.indicator
            .set_colour(indicator_colour(snapshot, self.frame, self.config.low_voltage));
    }
}
