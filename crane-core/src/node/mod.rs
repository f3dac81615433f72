//! Node runtime
//!
//! A [`Node`] couples one role behaviour with the state every role shares:
//! the bus transport, the mailbox, the status snapshot and the timer. The
//! host loop calls [`Node::init`] once, [`Node::verify`] once, then
//! [`Node::update`] forever.

mod coordinator;
mod display;
mod motion;
mod role;

pub use coordinator::{CoordinatorIo, CoordinatorPhase, CoordinatorRole};
pub use display::{DisplayPhase, DisplayRole};
pub use motion::{MotionPhase, MotionRole};
pub use role::{Context, RoleBehavior, VerifyPoll};

use crane_hal::{I2cBus, Timer};
use crane_protocol::{Command, NodeAddress};

use crate::state::Status;
use crate::transport::Inbox;

/// One controller node running a single role
pub struct Node<R, B, T, const N: usize> {
    role: R,
    ctx: Context<B, T, N>,
}

impl<R, B, T, const N: usize> Node<R, B, T, N>
where
    R: RoleBehavior,
    B: I2cBus,
    T: Timer,
{
    /// Create a node at the role's bus address
    pub fn new(role: R, bus: B, timer: T) -> Self {
        Self {
            role,
            ctx: Context::new(bus, R::ADDRESS, timer),
        }
    }

    pub fn address(&self) -> NodeAddress {
        R::ADDRESS
    }

    pub fn role(&self) -> &R {
        &self.role
    }

    pub fn role_mut(&mut self) -> &mut R {
        &mut self.role
    }

    pub fn status(&self) -> &Status {
        &self.ctx.status
    }

    /// Status setters for the application-owned fields
    pub fn status_mut(&mut self) -> &mut Status {
        &mut self.ctx.status
    }

    pub fn context(&self) -> &Context<B, T, N> {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut Context<B, T, N> {
        &mut self.ctx
    }

    /// Role and context together, for role methods that need both
    pub fn parts_mut(&mut self) -> (&mut R, &mut Context<B, T, N>) {
        (&mut self.role, &mut self.ctx)
    }

    pub fn init(&mut self) {
        info!("node {}: init", R::ADDRESS.get());
        self.role.init(&mut self.ctx);
    }

    /// Run the verification sequence to completion
    ///
    /// Bus messages are serviced between polls. Returns true if the board
    /// was verified.
    pub fn verify<I: Inbox>(&mut self, inbox: &mut I) -> bool {
        self.begin_verify();
        loop {
            self.service_bus(inbox);
            if let VerifyPoll::Done(verified) = self.poll_verify() {
                info!("node {}: verification done, verified={}", R::ADDRESS.get(), verified);
                return verified;
            }
        }
    }

    /// Enter the verification sequence without blocking
    pub fn begin_verify(&mut self) {
        self.role.begin_verify(&mut self.ctx);
    }

    /// Advance the verification sequence by one step
    pub fn poll_verify(&mut self) -> VerifyPoll {
        self.role.poll_verify(&mut self.ctx)
    }

    /// Service the bus, then run one role iteration
    pub fn update<I: Inbox>(&mut self, inbox: &mut I) {
        self.service_bus(inbox);
        self.role.update(&mut self.ctx);
    }

    /// Handle every queued inbound message
    ///
    /// Returns the number of messages handled.
    pub fn service_bus<I: Inbox>(&mut self, inbox: &mut I) -> usize {
        let mut handled = 0;
        while let Some(message) = inbox.poll_message() {
            self.on_receive(&message);
            handled += 1;
        }
        handled
    }

    /// First consumer of one inbound bus write
    ///
    /// Applies the effects every role shares, then hands anything else to
    /// the role. Returns the decoded command, or `None` if the bytes were
    /// dropped.
    pub fn on_receive(&mut self, bytes: &[u8]) -> Option<Command> {
        let command = self.ctx.transport.receive(bytes)?;
        debug!("node {}: received {}", R::ADDRESS.get(), command);

        match &command {
            Command::Ping => {
                if R::ADDRESS != NodeAddress::COORDINATOR {
                    // Delivered by the role's next subscribed push
                    let ack = Command::ack_from(R::ADDRESS);
                    if let Err(e) = self.ctx.mailbox.push_subscribed(ack) {
                        warn!("node {}: cannot queue ack: {}", R::ADDRESS.get(), e);
                    }
                }
            }
            Command::VerifyOk => self.ctx.status.set_verified(true),
            Command::Connected => self.ctx.status.set_link_connected(true),
            Command::LinkReport(status) => {
                if !self.ctx.status.latch_link_status(*status) {
                    debug!("node {}: link status already latched", R::ADDRESS.get());
                }
            }
            _ => self.role.on_command(&mut self.ctx, &command),
        }
        Some(command)
    }

    /// Queue a command for the role's next push
    pub fn enqueue(&mut self, command: Command) -> Result<usize, crate::mailbox::MailboxError> {
        self.ctx.mailbox.push(command)
    }
}
