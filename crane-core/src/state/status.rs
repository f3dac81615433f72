//! Shared status snapshot
//!
//! One struct holds every field the display node presents. Each field has
//! a single writer:
//!
//! | Field                                  | Written by                          |
//! |----------------------------------------|-------------------------------------|
//! | `verified`                             | bus receive / coordinator handshake |
//! | `link_connected`, `link_status`        | bus receive / coordinator link code |
//! | `link_message`                         | coordinator link code               |
//! | `horizontal`, `vertical`, `text`       | application                         |
//! | `voltage`, `law`                       | application                         |
//!
//! Every write bumps `version` so a renderer can skip unchanged frames.

use heapless::String;

use crane_protocol::{truncated, LinkStatus, MAX_COMMAND_LEN};

/// Maximum status text length (one display row)
pub const MAX_STATUS_TEXT_LEN: usize = 16;

/// Five-way motion indicator for one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionIndicator {
    FarNegative,
    Negative,
    #[default]
    Neutral,
    Positive,
    FarPositive,
}

impl MotionIndicator {
    /// Classify a signed motion level
    pub fn from_level(level: i32) -> Self {
        match level {
            i32::MIN..=-2 => MotionIndicator::FarNegative,
            -1 => MotionIndicator::Negative,
            0 => MotionIndicator::Neutral,
            1 => MotionIndicator::Positive,
            _ => MotionIndicator::FarPositive,
        }
    }
}

/// Law of operation selected by the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlLaw {
    Direct = 0,
    #[default]
    Normal = 1,
    Precision = 2,
}

impl ControlLaw {
    /// Law from its numeric code
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(ControlLaw::Direct),
            1 => Some(ControlLaw::Normal),
            2 => Some(ControlLaw::Precision),
            _ => None,
        }
    }

    /// Numeric code
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Everything the display collaborator reads
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusSnapshot {
    /// Incremented on every write
    pub version: u32,
    /// All nodes answered the verification round
    pub verified: bool,
    /// Bluetooth link has carried traffic
    pub link_connected: bool,
    /// Bluetooth module classification, latched once known
    pub link_status: LinkStatus,
    /// Last raw message received over bluetooth
    pub link_message: String<MAX_COMMAND_LEN>,
    pub horizontal: MotionIndicator,
    pub vertical: MotionIndicator,
    /// Free-text status line ("Standby", "I2C Fail", ...)
    pub text: String<MAX_STATUS_TEXT_LEN>,
    /// Supply voltage (V)
    pub voltage: f32,
    pub law: ControlLaw,
}

impl Default for StatusSnapshot {
    fn default() -> Self {
        Self {
            version: 0,
            verified: false,
            link_connected: false,
            link_status: LinkStatus::Unknown,
            link_message: String::new(),
            horizontal: MotionIndicator::Neutral,
            vertical: MotionIndicator::Neutral,
            text: String::new(),
            voltage: 11.0,
            law: ControlLaw::Normal,
        }
    }
}

/// Owner of the snapshot; all writes go through here
#[derive(Debug, Clone, Default)]
pub struct Status {
    snapshot: StatusSnapshot,
}

impl Status {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot
    pub fn snapshot(&self) -> &StatusSnapshot {
        &self.snapshot
    }

    /// Shorthand for `snapshot().verified`
    pub fn verified(&self) -> bool {
        self.snapshot.verified
    }

    fn touch(&mut self) {
        self.snapshot.version = self.snapshot.version.wrapping_add(1);
    }

    pub fn set_verified(&mut self, verified: bool) {
        self.snapshot.verified = verified;
        self.touch();
    }

    pub fn set_link_connected(&mut self, connected: bool) {
        self.snapshot.link_connected = connected;
        self.touch();
    }

    /// Record the link classification unless one is already latched
    ///
    /// Returns true if `status` was stored.
    pub fn latch_link_status(&mut self, status: LinkStatus) -> bool {
        if self.snapshot.link_status.is_known() || !status.is_known() {
            return false;
        }
        self.snapshot.link_status = status;
        self.touch();
        true
    }

    /// Keep the last raw bluetooth message, truncated to fit
    pub fn set_link_message(&mut self, message: &str) {
        self.snapshot.link_message = truncated(message);
        self.touch();
    }

    /// Set both motion indicators from signed levels
    pub fn set_motion(&mut self, horizontal: i32, vertical: i32) {
        self.snapshot.horizontal = MotionIndicator::from_level(horizontal);
        self.snapshot.vertical = MotionIndicator::from_level(vertical);
        self.touch();
    }

    /// Set the status line, truncated to one display row
    pub fn set_text(&mut self, text: &str) {
        self.snapshot.text = truncated(text);
        self.touch();
    }

    pub fn set_voltage(&mut self, volts: f32) {
        self.snapshot.voltage = volts;
        self.touch();
    }

    pub fn set_law(&mut self, law: ControlLaw) {
        self.snapshot.law = law;
        self.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motion_indicator_levels() {
        assert_eq!(MotionIndicator::from_level(-7), MotionIndicator::FarNegative);
        assert_eq!(MotionIndicator::from_level(-2), MotionIndicator::FarNegative);
        assert_eq!(MotionIndicator::from_level(-1), MotionIndicator::Negative);
        assert_eq!(MotionIndicator::from_level(0), MotionIndicator::Neutral);
        assert_eq!(MotionIndicator::from_level(1), MotionIndicator::Positive);
        assert_eq!(MotionIndicator::from_level(2), MotionIndicator::FarPositive);
    }

    #[test]
    fn test_law_codes() {
        assert_eq!(ControlLaw::Direct.code(), 0);
        assert_eq!(ControlLaw::Precision.code(), 2);
        assert_eq!(ControlLaw::from_code(1), Some(ControlLaw::Normal));
        assert_eq!(ControlLaw::from_code(3), None);
    }

    #[test]
    fn test_every_write_bumps_version() {
        let mut status = Status::new();
        status.set_verified(true);
        status.set_motion(-3, 1);
        status.set_text("Standby");
        assert_eq!(status.snapshot().version, 3);
        assert_eq!(status.snapshot().horizontal, MotionIndicator::FarNegative);
        assert_eq!(status.snapshot().vertical, MotionIndicator::Positive);
    }

    #[test]
    fn test_link_status_latches_first_value() {
        let mut status = Status::new();
        assert!(!status.latch_link_status(LinkStatus::Unknown));
        assert!(status.latch_link_status(LinkStatus::Error));
        assert!(!status.latch_link_status(LinkStatus::Ok));
        assert_eq!(status.snapshot().link_status, LinkStatus::Error);
    }

    #[test]
    fn test_status_text_truncated_to_row() {
        let mut status = Status::new();
        status.set_text("Lifting the heavy container");
        assert_eq!(status.snapshot().text.as_str(), "Lifting the heav");
    }
}
