//! Mock hardware for host tests

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::string::{String, ToString};
use std::vec::Vec;

use crane_hal::{Clock, Delay, I2cBus, OutputPin};
use crane_protocol::{MotorChannel, NodeAddress};

use crate::state::StatusSnapshot;
use crate::traits::{
    Colour, Direction, DisplayError, GripperActuator, LinkError, SerialLink, StatusDisplay,
    StatusIndicator, StepperOutputs,
};
use crate::transport::{Inbox, RawMessage};

/// Bus that records every write
#[derive(Debug, Default)]
pub struct MockBus {
    pub writes: Vec<(u8, Vec<u8>)>,
    pub fail_writes: bool,
}

impl I2cBus for MockBus {
    type Error = ();

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), ()> {
        if self.fail_writes {
            return Err(());
        }
        self.writes.push((address, data.to_vec()));
        Ok(())
    }
}

impl MockBus {
    /// Writes as (address, text)
    pub fn sent(&self) -> Vec<(u8, &str)> {
        self.writes
            .iter()
            .map(|(address, data)| (*address, std::str::from_utf8(data).unwrap()))
            .collect()
    }

    /// Texts written to `address`
    pub fn sent_to(&self, address: NodeAddress) -> Vec<&str> {
        self.sent()
            .into_iter()
            .filter(|(a, _)| *a == address.get())
            .map(|(_, text)| text)
            .collect()
    }
}

/// Clock whose delays advance time instantly
#[derive(Debug, Clone, Default)]
pub struct MockTimer {
    now_us: Rc<Cell<u64>>,
}

impl MockTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A second handle on the same clock
    pub fn share(&self) -> Self {
        self.clone()
    }

    pub fn advance_ms(&self, ms: u64) {
        self.now_us.set(self.now_us.get() + ms * 1000);
    }
}

impl Clock for MockTimer {
    fn now_ms(&self) -> u64 {
        self.now_us.get() / 1000
    }
}

impl Delay for MockTimer {
    fn delay_ms(&mut self, ms: u32) {
        self.advance_ms(ms as u64);
    }

    fn delay_us(&mut self, us: u32) {
        self.now_us.set(self.now_us.get() + us as u64);
    }
}

/// Inbox delivering scripted messages once the clock reaches their time
#[derive(Debug)]
pub struct MockInbox {
    clock: MockTimer,
    scheduled: VecDeque<(u64, RawMessage)>,
}

impl MockInbox {
    pub fn new(clock: &MockTimer) -> Self {
        Self {
            clock: clock.share(),
            scheduled: VecDeque::new(),
        }
    }

    /// Deliver `text` at `at_ms` (messages must be scheduled in time order)
    pub fn schedule(&mut self, at_ms: u64, text: &str) {
        let message = RawMessage::from_slice(text.as_bytes()).unwrap();
        self.scheduled.push_back((at_ms, message));
    }

    pub fn pending(&self) -> usize {
        self.scheduled.len()
    }
}

impl Inbox for MockInbox {
    fn poll_message(&mut self) -> Option<RawMessage> {
        match self.scheduled.front() {
            Some((at_ms, _)) if *at_ms <= self.clock.now_ms() => {
                self.scheduled.pop_front().map(|(_, message)| message)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepperEvent {
    Direction(MotorChannel, Direction),
    Step(MotorChannel),
    Enable(MotorChannel, bool),
}

/// Stepper outputs that record every pin operation
#[derive(Debug, Default)]
pub struct MockStepper {
    pub events: Vec<StepperEvent>,
}

impl MockStepper {
    pub fn steps(&self, channel: MotorChannel) -> usize {
        self.events
            .iter()
            .filter(|e| **e == StepperEvent::Step(channel))
            .count()
    }
}

impl StepperOutputs for MockStepper {
    fn set_direction(&mut self, channel: MotorChannel, dir: Direction) {
        self.events.push(StepperEvent::Direction(channel, dir));
    }

    fn step(&mut self, channel: MotorChannel) {
        self.events.push(StepperEvent::Step(channel));
    }

    fn enable(&mut self, channel: MotorChannel, enabled: bool) {
        self.events.push(StepperEvent::Enable(channel, enabled));
    }
}

/// Output pin that records its level history
#[derive(Debug, Default)]
pub struct MockPin {
    pub high: bool,
    pub history: Vec<bool>,
}

impl OutputPin for MockPin {
    fn set_high(&mut self) {
        self.high = true;
        self.history.push(true);
    }

    fn set_low(&mut self) {
        self.high = false;
        self.history.push(false);
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// Serial link replaying scripted reply chunks, one per receive call
#[derive(Debug, Default)]
pub struct MockLink {
    pub sent: Vec<Vec<u8>>,
    pub incoming: VecDeque<Vec<u8>>,
}

impl MockLink {
    pub fn replying(chunks: &[&str]) -> Self {
        Self {
            sent: Vec::new(),
            incoming: chunks.iter().map(|c| c.as_bytes().to_vec()).collect(),
        }
    }
}

impl SerialLink for MockLink {
    fn send(&mut self, data: &[u8]) -> Result<(), LinkError> {
        self.sent.push(data.to_vec());
        Ok(())
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, LinkError> {
        let Some(chunk) = self.incoming.pop_front() else {
            return Ok(0);
        };
        let len = chunk.len().min(buf.len());
        buf[..len].copy_from_slice(&chunk[..len]);
        Ok(len)
    }
}

#[derive(Debug, Default)]
pub struct MockIndicator {
    pub colours: Vec<Colour>,
}

impl MockIndicator {
    pub fn current(&self) -> Colour {
        self.colours.last().copied().unwrap_or_default()
    }
}

impl StatusIndicator for MockIndicator {
    fn set_colour(&mut self, colour: Colour) {
        self.colours.push(colour);
    }
}

#[derive(Debug, Default)]
pub struct MockGripper {
    pub angles: Vec<u8>,
}

impl GripperActuator for MockGripper {
    fn set_angle(&mut self, degrees: u8) {
        self.angles.push(degrees);
    }
}

/// Display that records what it was asked to show
#[derive(Debug, Default)]
pub struct MockDisplay {
    pub messages: Vec<(String, String)>,
    pub progress: Vec<u8>,
    /// (snapshot version, animation frame) per render
    pub renders: Vec<(u32, u8)>,
}

impl StatusDisplay for MockDisplay {
    fn show_message(&mut self, top: &str, bottom: &str) -> Result<(), DisplayError> {
        self.messages.push((top.to_string(), bottom.to_string()));
        Ok(())
    }

    fn show_progress(&mut self, tick: u8) -> Result<(), DisplayError> {
        self.progress.push(tick);
        Ok(())
    }

    fn render(&mut self, snapshot: &StatusSnapshot, frame: u8) -> Result<(), DisplayError> {
        self.renders.push((snapshot.version, frame));
        Ok(())
    }
}
