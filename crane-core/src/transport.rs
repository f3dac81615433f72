//! Bus transport
//!
//! Sending is fire-and-forget: bus errors are counted and logged but never
//! surfaced to the caller. Receiving turns the raw bytes of one bus write
//! into a [`Command`].

use heapless::Vec;

use crane_hal::I2cBus;
use crane_protocol::{Command, NodeAddress, MAX_COMMAND_LEN};

use crate::mailbox::Mailbox;

/// Raw bytes of one inbound bus write
pub type RawMessage = Vec<u8, MAX_COMMAND_LEN>;

/// Source of inbound bus messages
///
/// Implemented by whatever the bus receive interrupt or task feeds, such
/// as a channel filled by an I2C target task.
pub trait Inbox {
    /// Next queued message, without waiting
    fn poll_message(&mut self) -> Option<RawMessage>;
}

/// Command transport over the shared bus
#[derive(Debug)]
pub struct BusTransport<B> {
    bus: B,
    address: NodeAddress,
    failed_sends: u32,
}

impl<B: I2cBus> BusTransport<B> {
    /// Create a transport for the node at `address`
    pub fn new(bus: B, address: NodeAddress) -> Self {
        Self {
            bus,
            address,
            failed_sends: 0,
        }
    }

    /// This node's own address
    pub fn address(&self) -> NodeAddress {
        self.address
    }

    /// Number of sends the bus or the encoder rejected
    pub fn failed_sends(&self) -> u32 {
        self.failed_sends
    }

    /// Underlying bus
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Underlying bus, mutably
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// Send one command to `to`
    pub fn send(&mut self, to: NodeAddress, command: &Command) {
        match command.encode() {
            Ok(text) => self.send_bytes(to, text.as_bytes()),
            Err(e) => {
                self.failed_sends = self.failed_sends.wrapping_add(1);
                warn!("transport: cannot encode command for {}: {}", to.get(), e);
            }
        }
    }

    /// Send raw bytes to `to` as a single bus write
    pub fn send_bytes(&mut self, to: NodeAddress, bytes: &[u8]) {
        debug!("transport: {} bytes to node {}", bytes.len(), to.get());
        if self.bus.write(to.get(), bytes).is_err() {
            self.failed_sends = self.failed_sends.wrapping_add(1);
            warn!("transport: write to node {} failed", to.get());
        }
    }

    /// Decode one inbound bus write
    ///
    /// Returns `None` for bytes that are not a command (invalid UTF-8 or
    /// oversized); those are dropped.
    pub fn receive(&self, bytes: &[u8]) -> Option<Command> {
        match Command::decode(bytes) {
            Ok(command) => {
                trace!("transport: received {} bytes", bytes.len());
                Some(command)
            }
            Err(e) => {
                debug!("transport: dropped {} bytes: {}", bytes.len(), e);
                None
            }
        }
    }

    /// Send every subscribed mailbox entry to `to`
    ///
    /// Returns the number of commands sent.
    pub fn push_subscribed<const N: usize>(
        &mut self,
        mailbox: &mut Mailbox<N>,
        to: NodeAddress,
    ) -> usize {
        let sent = mailbox.drain_subscribed(|command| self.send(to, command));
        if sent > 0 {
            info!("transport: pushed {} subscribed to node {}", sent, to.get());
        }
        sent
    }

    /// Send up to `n` unsubscribed head entries to `to`
    pub fn push_pending<const N: usize>(
        &mut self,
        mailbox: &mut Mailbox<N>,
        to: NodeAddress,
        n: usize,
    ) -> usize {
        mailbox.drain_pending(n, |command| self.send(to, command))
    }
}
