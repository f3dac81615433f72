//! Role behaviour trait and the state it operates on

use crane_hal::{I2cBus, Timer};
use crane_protocol::{Command, NodeAddress};

use crate::mailbox::Mailbox;
use crate::state::Status;
use crate::transport::BusTransport;

/// Progress of a role's verification sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VerifyPoll {
    /// Still running; poll again
    Pending,
    /// Finished; true if the board was verified
    Done(bool),
}

/// Everything a role shares with the rest of the node
pub struct Context<B, T, const N: usize> {
    pub transport: BusTransport<B>,
    pub mailbox: Mailbox<N>,
    pub status: Status,
    pub timer: T,
}

impl<B: I2cBus, T: Timer, const N: usize> Context<B, T, N> {
    pub fn new(bus: B, address: NodeAddress, timer: T) -> Self {
        Self {
            transport: BusTransport::new(bus, address),
            mailbox: Mailbox::new(),
            status: Status::new(),
            timer,
        }
    }

    /// Current time (ms)
    pub fn now_ms(&self) -> u64 {
        self.timer.now_ms()
    }

    /// Send a command to `to`
    pub fn send(&mut self, to: NodeAddress, command: &Command) {
        self.transport.send(to, command);
    }
}

/// Behaviour of one node role
///
/// Exactly one role runs per node. The verification sequence is a state
/// machine: [`RoleBehavior::begin_verify`] once, then
/// [`RoleBehavior::poll_verify`] until it returns [`VerifyPoll::Done`].
/// Bus messages are serviced between polls, so a poll may sleep a little
/// but never for the whole sequence.
pub trait RoleBehavior {
    /// Bus address of this role
    const ADDRESS: NodeAddress;

    /// One-time hardware setup
    fn init<B: I2cBus, T: Timer, const N: usize>(&mut self, ctx: &mut Context<B, T, N>);

    /// Enter the verification sequence
    fn begin_verify<B: I2cBus, T: Timer, const N: usize>(&mut self, ctx: &mut Context<B, T, N>);

    /// Advance the verification sequence
    fn poll_verify<B: I2cBus, T: Timer, const N: usize>(
        &mut self,
        ctx: &mut Context<B, T, N>,
    ) -> VerifyPoll;

    /// One iteration of normal operation
    fn update<B: I2cBus, T: Timer, const N: usize>(&mut self, ctx: &mut Context<B, T, N>);

    /// Handle a received command not consumed by the shared receive path
    fn on_command<B: I2cBus, T: Timer, const N: usize>(
        &mut self,
        ctx: &mut Context<B, T, N>,
        command: &Command,
    ) {
        let _ = ctx;
        trace!("ignoring command for another role: {}", command);
    }
}
