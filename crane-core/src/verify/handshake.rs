//! Coordinator handshake
//!
//! A single verification round run by the coordinator:
//!
//! ```text
//! Idle ──start──► Pinging ──► AwaitingAcks ──┬─ both acked ─► AllAcked ─┐
//!                                            └─ deadline ───► Timeout ──┤
//!                                                                       ▼
//!                                              Done ◄── hold ── Reporting
//! ```
//!
//! The machine never sleeps. [`Handshake::poll`] compares deadlines with
//! the caller's clock and returns the next [`HandshakeAction`] for the
//! caller to carry out. A round is single-shot: once it has started it
//! cannot be restarted without [`Handshake::reset`], and a timed-out round
//! stays failed.

use crane_protocol::NodeAddress;

use crate::config::HandshakeConfig;

/// Handshake phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HandshakePhase {
    /// Not started
    #[default]
    Idle,
    /// Pings are due
    Pinging,
    /// Collecting acknowledgements until the deadline
    AwaitingAcks { deadline_ms: u64 },
    /// Both responders acknowledged
    AllAcked,
    /// Ack window closed with a responder missing
    Timeout,
    /// Showing the outcome until the hold expires
    Reporting { until_ms: u64, success: bool },
    /// Round finished
    Done { success: bool },
}

/// What the caller must do after a poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HandshakeAction {
    /// Nothing to do yet
    Wait,
    /// Send `Ping` to both responders
    SendPings,
    /// Send `VerifyOK` to both responders
    BroadcastVerified,
    /// Round failed; clear success indications
    ReportFailure,
    /// Show the verdict
    ShowOutcome { success: bool },
    /// Round is over
    Finished { success: bool },
}

/// Acknowledgement flags, one per responder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AckFlags {
    pub motion: bool,
    pub display: bool,
}

impl AckFlags {
    pub fn all(self) -> bool {
        self.motion && self.display
    }
}

/// Coordinator verification round
#[derive(Debug, Clone)]
pub struct Handshake {
    config: HandshakeConfig,
    phase: HandshakePhase,
    acks: AckFlags,
    verified: bool,
}

impl Handshake {
    pub fn new(config: HandshakeConfig) -> Self {
        Self {
            config,
            phase: HandshakePhase::Idle,
            acks: AckFlags::default(),
            verified: false,
        }
    }

    /// Current phase
    pub fn phase(&self) -> HandshakePhase {
        self.phase
    }

    /// Acknowledgements received so far
    pub fn acks(&self) -> AckFlags {
        self.acks
    }

    /// True once both responders acknowledged in time
    pub fn is_verified(&self) -> bool {
        self.verified
    }

    /// Begin the round
    ///
    /// Returns false if a round was already started.
    pub fn start(&mut self) -> bool {
        if self.phase != HandshakePhase::Idle {
            warn!("handshake: already started");
            return false;
        }
        self.phase = HandshakePhase::Pinging;
        true
    }

    /// Record an acknowledgement from `from`
    ///
    /// Flags only ever go from false to true. Acks from other addresses are
    /// ignored.
    pub fn record_ack(&mut self, from: NodeAddress) {
        match from {
            NodeAddress::MOTION => self.acks.motion = true,
            NodeAddress::DISPLAY => self.acks.display = true,
            _ => {
                debug!("handshake: ack from unexpected node {}", from.get());
                return;
            }
        }
        debug!("handshake: ack from node {}", from.get());
    }

    /// Advance the round at time `now_ms`
    pub fn poll(&mut self, now_ms: u64) -> HandshakeAction {
        match self.phase {
            HandshakePhase::Idle => HandshakeAction::Wait,
            HandshakePhase::Pinging => {
                let deadline_ms = now_ms + self.config.ack_window_ms as u64;
                self.phase = HandshakePhase::AwaitingAcks { deadline_ms };
                HandshakeAction::SendPings
            }
            HandshakePhase::AwaitingAcks { deadline_ms } => {
                let expired = now_ms >= deadline_ms;
                let early = self.config.complete_early && self.acks.all();
                if !expired && !early {
                    HandshakeAction::Wait
                } else if self.acks.all() {
                    self.verified = true;
                    self.phase = HandshakePhase::AllAcked;
                    info!("handshake: all nodes acknowledged");
                    HandshakeAction::BroadcastVerified
                } else {
                    self.phase = HandshakePhase::Timeout;
                    warn!(
                        "handshake: timed out (motion {}, display {})",
                        self.acks.motion,
                        self.acks.display
                    );
                    HandshakeAction::ReportFailure
                }
            }
            HandshakePhase::AllAcked | HandshakePhase::Timeout => {
                let success = self.phase == HandshakePhase::AllAcked;
                self.phase = HandshakePhase::Reporting {
                    until_ms: now_ms + self.config.report_hold_ms as u64,
                    success,
                };
                HandshakeAction::ShowOutcome { success }
            }
            HandshakePhase::Reporting { until_ms, success } => {
                if now_ms < until_ms {
                    return HandshakeAction::Wait;
                }
                self.phase = HandshakePhase::Done { success };
                HandshakeAction::Finished { success }
            }
            HandshakePhase::Done { success } => HandshakeAction::Finished { success },
        }
    }

    /// Clear the round entirely (full reinitialisation)
    pub fn reset(&mut self) {
        self.phase = HandshakePhase::Idle;
        self.acks = AckFlags::default();
        self.verified = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(config: HandshakeConfig) -> Handshake {
        let mut handshake = Handshake::new(config);
        assert!(handshake.start());
        assert_eq!(handshake.poll(0), HandshakeAction::SendPings);
        handshake
    }

    #[test]
    fn test_idle_waits() {
        let mut handshake = Handshake::new(HandshakeConfig::default());
        assert_eq!(handshake.poll(100_000), HandshakeAction::Wait);
        assert_eq!(handshake.phase(), HandshakePhase::Idle);
    }

    #[test]
    fn test_success_waits_out_window() {
        let mut handshake = started(HandshakeConfig::default());
        handshake.record_ack(NodeAddress::MOTION);
        handshake.record_ack(NodeAddress::DISPLAY);

        assert_eq!(handshake.poll(7749), HandshakeAction::Wait);
        assert_eq!(handshake.poll(7750), HandshakeAction::BroadcastVerified);
        assert!(handshake.is_verified());
        assert_eq!(
            handshake.poll(7750),
            HandshakeAction::ShowOutcome { success: true }
        );
        assert_eq!(handshake.poll(12_749), HandshakeAction::Wait);
        assert_eq!(
            handshake.poll(12_750),
            HandshakeAction::Finished { success: true }
        );
        assert_eq!(handshake.phase(), HandshakePhase::Done { success: true });
    }

    #[test]
    fn test_complete_early() {
        let config = HandshakeConfig {
            complete_early: true,
            ..Default::default()
        };
        let mut handshake = started(config);
        handshake.record_ack(NodeAddress::DISPLAY);
        assert_eq!(handshake.poll(100), HandshakeAction::Wait);
        handshake.record_ack(NodeAddress::MOTION);
        assert_eq!(handshake.poll(200), HandshakeAction::BroadcastVerified);
    }

    #[test]
    fn test_missing_display_ack_fails() {
        let mut handshake = started(HandshakeConfig::default());
        handshake.record_ack(NodeAddress::MOTION);

        assert_eq!(handshake.poll(7750), HandshakeAction::ReportFailure);
        assert_eq!(
            handshake.poll(7751),
            HandshakeAction::ShowOutcome { success: false }
        );
        assert!(!handshake.is_verified());
        assert!(handshake.acks().motion);
        assert!(!handshake.acks().display);
    }

    #[test]
    fn test_late_ack_does_not_rescue_round() {
        let mut handshake = started(HandshakeConfig::default());
        handshake.record_ack(NodeAddress::MOTION);
        assert_eq!(handshake.poll(8000), HandshakeAction::ReportFailure);

        handshake.record_ack(NodeAddress::DISPLAY);
        assert_eq!(
            handshake.poll(8000),
            HandshakeAction::ShowOutcome { success: false }
        );
        assert_eq!(
            handshake.poll(20_000),
            HandshakeAction::Finished { success: false }
        );
        assert!(!handshake.is_verified());
    }

    #[test]
    fn test_single_shot() {
        let mut handshake = started(HandshakeConfig::default());
        assert!(!handshake.start());

        handshake.reset();
        assert_eq!(handshake.phase(), HandshakePhase::Idle);
        assert_eq!(handshake.acks(), AckFlags::default());
        assert!(handshake.start());
    }

    #[test]
    fn test_acks_from_other_nodes_ignored() {
        let mut handshake = started(HandshakeConfig::default());
        handshake.record_ack(NodeAddress::COORDINATOR);
        assert_eq!(handshake.acks(), AckFlags::default());
    }
}
