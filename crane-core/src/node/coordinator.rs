//! Coordinator role (node 1)
//!
//! Owns the bluetooth module, the gripper, the stepper power relay and two
//! verdict LEDs. Runs the verification handshake and forwards motor rate
//! directives to the motion node.

use crane_hal::{I2cBus, OutputPin, Timer};
use crane_protocol::{Command, LinkStatus, MotorChannel, NodeAddress, MAX_COMMAND_LEN};

use super::role::{Context, RoleBehavior, VerifyPoll};
use crate::config::{GripperConfig, HandshakeConfig, LinkConfig};
use crate::traits::{GripperActuator, SerialLink};
use crate::verify::{Handshake, HandshakeAction, LinkProbe};

/// Verification sequence position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CoordinatorPhase {
    Idle,
    Handshake,
    /// Moving the gripper through the check sweep
    GripperCheck { step: usize, next_ms: u64 },
    Done { success: bool },
}

/// Hardware owned by the coordinator
pub struct CoordinatorIo<P, L, G> {
    /// Stepper driver power relay
    pub relay: P,
    pub green_led: P,
    pub red_led: P,
    pub link: L,
    pub gripper: G,
}

pub struct CoordinatorRole<P, L, G> {
    io: CoordinatorIo<P, L, G>,
    handshake: Handshake,
    probe: LinkProbe,
    phase: CoordinatorPhase,
    link_config: LinkConfig,
    gripper_config: GripperConfig,
    poll_interval_ms: u32,
}

impl<P, L, G> CoordinatorRole<P, L, G>
where
    P: OutputPin,
    L: SerialLink,
    G: GripperActuator,
{
    pub fn new(
        io: CoordinatorIo<P, L, G>,
        handshake: HandshakeConfig,
        link: LinkConfig,
        gripper: GripperConfig,
    ) -> Self {
        Self {
            io,
            poll_interval_ms: handshake.poll_interval_ms,
            handshake: Handshake::new(handshake),
            probe: LinkProbe::new(),
            phase: CoordinatorPhase::Idle,
            link_config: link,
            gripper_config: gripper,
        }
    }

    /// Hardware, for inspection
    pub fn io(&self) -> &CoordinatorIo<P, L, G> {
        &self.io
    }

    pub fn phase(&self) -> CoordinatorPhase {
        self.phase
    }

    pub fn handshake(&self) -> &Handshake {
        &self.handshake
    }

    /// Queue a rate directive for the motion node
    ///
    /// Directives are forwarded in order by the next [`RoleBehavior::update`].
    pub fn command_rate<B: I2cBus, T: Timer, const N: usize>(
        &mut self,
        ctx: &mut Context<B, T, N>,
        channel: MotorChannel,
        rps: f32,
    ) -> Result<(), crate::mailbox::MailboxError> {
        ctx.mailbox.push(Command::StepRate { channel, rps }).map(|_| ())
    }

    fn read_link(&mut self, buf: &mut [u8; MAX_COMMAND_LEN]) -> usize {
        match self.io.link.receive(buf) {
            Ok(len) => len,
            Err(e) => {
                warn!("coordinator: serial link error: {}", e);
                0
            }
        }
    }

    /// Feed the identification probe and report a new classification
    fn poll_probe<B: I2cBus, T: Timer, const N: usize>(&mut self, ctx: &mut Context<B, T, N>) {
        if self.probe.status().is_known() {
            return;
        }
        let mut buf = [0u8; MAX_COMMAND_LEN];
        let len = self.read_link(&mut buf);
        let now = ctx.now_ms();
        if let Some(status) = self.probe.feed(&buf[..len], now, &self.link_config.signature) {
            self.report_link(ctx, status);
        }
    }

    fn report_link<B: I2cBus, T: Timer, const N: usize>(
        &mut self,
        ctx: &mut Context<B, T, N>,
        status: LinkStatus,
    ) {
        ctx.status.latch_link_status(status);
        ctx.send(NodeAddress::DISPLAY, &Command::LinkReport(status));
    }

    fn set_verdict_leds(&mut self, success: Option<bool>) {
        self.io.green_led.set_low();
        self.io.red_led.set_low();
        match success {
            Some(true) => self.io.green_led.set_high(),
            Some(false) => self.io.red_led.set_high(),
            None => {}
        }
    }

    fn poll_handshake<B: I2cBus, T: Timer, const N: usize>(&mut self, ctx: &mut Context<B, T, N>) {
        let now = ctx.now_ms();
        match self.handshake.poll(now) {
            HandshakeAction::Wait => ctx.timer.delay_ms(self.poll_interval_ms),
            HandshakeAction::SendPings => {
                ctx.send(NodeAddress::DISPLAY, &Command::Ping);
                ctx.send(NodeAddress::MOTION, &Command::Ping);
            }
            HandshakeAction::BroadcastVerified => {
                ctx.send(NodeAddress::MOTION, &Command::VerifyOk);
                ctx.send(NodeAddress::DISPLAY, &Command::VerifyOk);
                ctx.status.set_verified(true);
            }
            HandshakeAction::ReportFailure => self.set_verdict_leds(None),
            HandshakeAction::ShowOutcome { success } => self.set_verdict_leds(Some(success)),
            HandshakeAction::Finished { success } => {
                self.set_verdict_leds(None);
                if !self.probe.status().is_known() {
                    let status = self.probe.finish(&self.link_config.signature);
                    self.report_link(ctx, status);
                }
                self.phase = if success {
                    CoordinatorPhase::GripperCheck {
                        step: 0,
                        next_ms: now,
                    }
                } else {
                    CoordinatorPhase::Done { success }
                };
            }
        }
    }
}

impl<P, L, G> RoleBehavior for CoordinatorRole<P, L, G>
where
    P: OutputPin,
    L: SerialLink,
    G: GripperActuator,
{
    const ADDRESS: NodeAddress = NodeAddress::COORDINATOR;

    fn init<B: I2cBus, T: Timer, const N: usize>(&mut self, ctx: &mut Context<B, T, N>) {
        self.io.relay.set_high();
        self.io.green_led.set_high();
        self.io.red_led.set_high();

        if let Err(e) = self.io.link.send(self.link_config.request.as_bytes()) {
            warn!("coordinator: identification request failed: {}", e);
        }

        for channel in MotorChannel::ALL {
            ctx.send(NodeAddress::MOTION, &Command::StepRate { channel, rps: 0.0 });
        }
        info!("coordinator: initialised");
    }

    fn begin_verify<B: I2cBus, T: Timer, const N: usize>(&mut self, ctx: &mut Context<B, T, N>) {
        self.set_verdict_leds(None);
        if self.handshake.start() {
            self.probe
                .start(ctx.now_ms(), self.link_config.response_timeout_ms);
            self.phase = CoordinatorPhase::Handshake;
        }
    }

    fn poll_verify<B: I2cBus, T: Timer, const N: usize>(
        &mut self,
        ctx: &mut Context<B, T, N>,
    ) -> VerifyPoll {
        match self.phase {
            CoordinatorPhase::Idle => VerifyPoll::Done(false),
            CoordinatorPhase::Handshake => {
                self.poll_probe(ctx);
                self.poll_handshake(ctx);
                VerifyPoll::Pending
            }
            CoordinatorPhase::GripperCheck { step, next_ms } => {
                let now = ctx.now_ms();
                if now < next_ms {
                    ctx.timer.delay_ms(self.poll_interval_ms);
                    return VerifyPoll::Pending;
                }
                match self.gripper_config.sweep.get(step) {
                    Some(&angle) => {
                        self.io.gripper.set_angle(angle);
                        self.phase = CoordinatorPhase::GripperCheck {
                            step: step + 1,
                            next_ms: now + self.gripper_config.step_ms as u64,
                        };
                    }
                    None => {
                        self.io.green_led.set_high();
                        self.phase = CoordinatorPhase::Done { success: true };
                    }
                }
                VerifyPoll::Pending
            }
            CoordinatorPhase::Done { success } => VerifyPoll::Done(success),
        }
    }

    fn update<B: I2cBus, T: Timer, const N: usize>(&mut self, ctx: &mut Context<B, T, N>) {
        let pending = ctx.mailbox.available();
        if pending > 0 {
            ctx.transport
                .push_pending(&mut ctx.mailbox, NodeAddress::MOTION, pending);
        }

        let mut buf = [0u8; MAX_COMMAND_LEN];
        let len = self.read_link(&mut buf);
        if len == 0 {
            return;
        }
        let Ok(message) = core::str::from_utf8(&buf[..len]) else {
            warn!("coordinator: dropped {} non-text bytes from bluetooth", len);
            return;
        };
        ctx.status.set_link_message(message);
        if !ctx.status.snapshot().link_connected {
            info!("coordinator: bluetooth connected");
            ctx.status.set_link_connected(true);
            ctx.send(NodeAddress::DISPLAY, &Command::Connected);
        }
    }

    fn on_command<B: I2cBus, T: Timer, const N: usize>(
        &mut self,
        _ctx: &mut Context<B, T, N>,
        command: &Command,
    ) {
        if let Command::Ack(from) = command {
            self.handshake.record_ack(*from);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockBus, MockGripper, MockLink, MockPin, MockTimer};

    type Role = CoordinatorRole<MockPin, MockLink, MockGripper>;
    type Ctx = Context<MockBus, MockTimer, 16>;

    fn setup(replies: &[&str]) -> (Role, Ctx) {
        let io = CoordinatorIo {
            relay: MockPin::default(),
            green_led: MockPin::default(),
            red_led: MockPin::default(),
            link: MockLink::replying(replies),
            gripper: MockGripper::default(),
        };
        let role = CoordinatorRole::new(
            io,
            HandshakeConfig::default(),
            LinkConfig::default(),
            GripperConfig::default(),
        );
        let ctx = Context::new(MockBus::default(), NodeAddress::COORDINATOR, MockTimer::new());
        (role, ctx)
    }

    fn run_verify(role: &mut Role, ctx: &mut Ctx) -> bool {
        role.begin_verify(ctx);
        loop {
            if let VerifyPoll::Done(ok) = role.poll_verify(ctx) {
                return ok;
            }
        }
    }

    #[test]
    fn test_init_powers_up_and_resets_motion() {
        let (mut role, mut ctx) = setup(&[]);
        role.init(&mut ctx);

        assert!(role.io().relay.high);
        assert!(role.io().green_led.high && role.io().red_led.high);
        assert_eq!(role.io().link.sent, [b"AT+VERSION".to_vec()]);
        assert_eq!(
            ctx.transport.bus().sent_to(NodeAddress::MOTION),
            ["STEP1:0.00", "STEP2:0.00", "STEP3:0.00"]
        );
    }

    #[test]
    fn test_verify_without_acks_fails_and_skips_gripper() {
        let (mut role, mut ctx) = setup(&["OKlinvorV1.8"]);
        assert!(!run_verify(&mut role, &mut ctx));

        let bus = ctx.transport.bus();
        assert_eq!(bus.sent_to(NodeAddress::DISPLAY), ["Ping", "blueOK"]);
        assert_eq!(bus.sent_to(NodeAddress::MOTION), ["Ping"]);
        assert!(!ctx.status.verified());
        assert!(role.io().red_led.history.contains(&true));
        assert!(!role.io().green_led.high);
        assert!(role.io().gripper.angles.is_empty());
    }

    #[test]
    fn test_verify_with_both_acks_sweeps_gripper() {
        let (mut role, mut ctx) = setup(&[]);
        role.begin_verify(&mut ctx);
        role.on_command(&mut ctx, &Command::Ack(NodeAddress::MOTION));
        role.on_command(&mut ctx, &Command::Ack(NodeAddress::DISPLAY));
        let ok = loop {
            if let VerifyPoll::Done(ok) = role.poll_verify(&mut ctx) {
                break ok;
            }
        };

        assert!(ok);
        assert!(ctx.status.verified());
        assert_eq!(
            ctx.transport.bus().sent_to(NodeAddress::DISPLAY),
            ["Ping", "blueINOP", "VerifyOK"]
        );
        assert_eq!(role.io().gripper.angles, [10, 160, 0]);
        assert!(role.io().green_led.high);
        // ack window + verdict hold + two gripper steps
        assert!(ctx.now_ms() >= 7750 + 5000 + 2000);
    }

    #[test]
    fn test_update_forwards_rates_and_detects_connection() {
        let (mut role, mut ctx) = setup(&["hello"]);
        role.command_rate(&mut ctx, MotorChannel::Two, -1.5).unwrap();

        role.update(&mut ctx);

        let bus = ctx.transport.bus();
        assert_eq!(bus.sent_to(NodeAddress::MOTION), ["STEP2:-1.50"]);
        assert_eq!(bus.sent_to(NodeAddress::DISPLAY), ["CONNECTED"]);
        assert!(ctx.status.snapshot().link_connected);
        assert_eq!(ctx.status.snapshot().link_message.as_str(), "hello");

        role.update(&mut ctx);
        assert_eq!(ctx.transport.bus().sent_to(NodeAddress::DISPLAY), ["CONNECTED"]);
    }

    #[test]
    fn test_update_drops_non_text_link_traffic() {
        let (mut role, mut ctx) = setup(&[]);
        role.io.link.incoming.push_back(std::vec![0xFF, 0xFE, 0x80]);

        role.update(&mut ctx);

        assert!(!ctx.status.snapshot().link_connected);
        assert_eq!(ctx.status.snapshot().link_message.as_str(), "");
        assert!(ctx.transport.bus().sent_to(NodeAddress::DISPLAY).is_empty());

        role.io.link.incoming.push_back(b"hi".to_vec());
        role.update(&mut ctx);
        assert!(ctx.status.snapshot().link_connected);
        assert_eq!(ctx.transport.bus().sent_to(NodeAddress::DISPLAY), ["CONNECTED"]);
    }
}
