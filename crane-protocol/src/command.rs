//! Command encoding and decoding
//!
//! A command is one bus write interpreted as text. Known tokens map to
//! dedicated variants; everything else is kept verbatim as
//! [`Command::Other`] so the application can interpret it.

use core::fmt::Write;

use heapless::String;

use crate::address::NodeAddress;

/// Largest command that fits in a single bus transaction
///
/// Matches the 32-byte transmit buffer of the I2C peripheral driver.
pub const MAX_COMMAND_LEN: usize = 32;

/// Owned command text
pub type CommandText = String<MAX_COMMAND_LEN>;

// Vocabulary tokens
pub const PING: &str = "Ping";
pub const ACK_PREFIX: &str = "OK";
pub const VERIFY_OK: &str = "VerifyOK";
pub const CONNECTED: &str = "CONNECTED";
pub const BLUE_OK: &str = "blueOK";
pub const BLUE_ERR: &str = "blueERR";
pub const BLUE_INOP: &str = "blueINOP";
pub const STEP_PREFIX: &str = "STEP";

/// Errors from the command codec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Text does not fit in [`MAX_COMMAND_LEN`] bytes
    TooLong,
    /// Received bytes are not valid UTF-8
    InvalidUtf8,
}

/// One of the three stepper channels on the motion node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorChannel {
    One,
    Two,
    Three,
}

impl MotorChannel {
    /// All channels in wire order
    pub const ALL: [MotorChannel; 3] = [MotorChannel::One, MotorChannel::Two, MotorChannel::Three];

    /// Zero-based array index
    pub const fn index(self) -> usize {
        match self {
            MotorChannel::One => 0,
            MotorChannel::Two => 1,
            MotorChannel::Three => 2,
        }
    }

    /// One-based number used on the wire (`STEP1` .. `STEP3`)
    pub const fn number(self) -> u8 {
        self.index() as u8 + 1
    }

    /// Channel from its one-based wire number
    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(MotorChannel::One),
            2 => Some(MotorChannel::Two),
            3 => Some(MotorChannel::Three),
            _ => None,
        }
    }
}

/// Health of the bluetooth serial module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkStatus {
    /// Not classified yet
    #[default]
    Unknown,
    /// Module answered with the expected identification
    Ok,
    /// Module answered, but not with the expected identification
    Error,
    /// Module did not answer at all
    Inoperative,
}

impl LinkStatus {
    /// True once the status has been classified
    pub fn is_known(self) -> bool {
        self != LinkStatus::Unknown
    }

    /// Short label for the status screen
    pub fn label(self) -> &'static str {
        match self {
            LinkStatus::Unknown => "--",
            LinkStatus::Ok => "OK",
            LinkStatus::Error => "ERR",
            LinkStatus::Inoperative => "INOP",
        }
    }
}

/// A bus command
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Liveness request
    Ping,
    /// Liveness acknowledgement sent by the node at the given address
    Ack(NodeAddress),
    /// Coordinator finished verification successfully
    VerifyOk,
    /// Bluetooth link established
    Connected,
    /// Bluetooth module classification
    ///
    /// Only `Ok`, `Error` and `Inoperative` have a wire form.
    LinkReport(LinkStatus),
    /// Set the rate of one motor, in rotations per second (sign = direction)
    StepRate { channel: MotorChannel, rps: f32 },
    /// Free-form payload outside the fixed vocabulary
    Other(CommandText),
}

impl Command {
    /// Parse command text
    ///
    /// Never fails: text outside the vocabulary becomes [`Command::Other`],
    /// truncated to [`MAX_COMMAND_LEN`] bytes if needed.
    pub fn parse(text: &str) -> Self {
        match text {
            PING => Command::Ping,
            VERIFY_OK => Command::VerifyOk,
            CONNECTED => Command::Connected,
            BLUE_OK => Command::LinkReport(LinkStatus::Ok),
            BLUE_ERR => Command::LinkReport(LinkStatus::Error),
            BLUE_INOP => Command::LinkReport(LinkStatus::Inoperative),
            "OK2" => Command::Ack(NodeAddress::MOTION),
            "OK3" => Command::Ack(NodeAddress::DISPLAY),
            _ => Self::parse_step(text).unwrap_or_else(|| Command::Other(truncated(text))),
        }
    }

    /// Parse a `STEPn:<rps>` directive
    fn parse_step(text: &str) -> Option<Self> {
        let rest = text.strip_prefix(STEP_PREFIX)?;
        let (number, value) = rest.split_once(':')?;
        let channel = match number {
            "1" => MotorChannel::One,
            "2" => MotorChannel::Two,
            "3" => MotorChannel::Three,
            _ => return None,
        };
        let rps: f32 = value.trim().parse().ok()?;
        if !rps.is_finite() {
            return None;
        }
        Some(Command::StepRate { channel, rps })
    }

    /// Decode the raw bytes of one bus write
    pub fn decode(bytes: &[u8]) -> Result<Self, CommandError> {
        if bytes.len() > MAX_COMMAND_LEN {
            return Err(CommandError::TooLong);
        }
        let text = core::str::from_utf8(bytes).map_err(|_| CommandError::InvalidUtf8)?;
        Ok(Self::parse(text))
    }

    /// Encode to wire text
    pub fn encode(&self) -> Result<CommandText, CommandError> {
        let mut out = CommandText::new();
        let written = match self {
            Command::Ping => out.push_str(PING).is_ok(),
            Command::Ack(from) => write!(out, "{}{}", ACK_PREFIX, from.get()).is_ok(),
            Command::VerifyOk => out.push_str(VERIFY_OK).is_ok(),
            Command::Connected => out.push_str(CONNECTED).is_ok(),
            Command::LinkReport(status) => match status {
                LinkStatus::Ok => out.push_str(BLUE_OK).is_ok(),
                LinkStatus::Error => out.push_str(BLUE_ERR).is_ok(),
                // An unknown status is never reported; send the pessimistic one
                LinkStatus::Inoperative | LinkStatus::Unknown => out.push_str(BLUE_INOP).is_ok(),
            },
            Command::StepRate { channel, rps } => {
                write!(out, "{}{}:{:.2}", STEP_PREFIX, channel.number(), rps).is_ok()
            }
            Command::Other(text) => out.push_str(text).is_ok(),
        };

        if written {
            Ok(out)
        } else {
            Err(CommandError::TooLong)
        }
    }

    /// Shorthand for a free-form payload
    pub fn other(text: &str) -> Self {
        Command::Other(truncated(text))
    }

    /// The acknowledgement a responder sends back to the coordinator
    pub fn ack_from(address: NodeAddress) -> Self {
        Command::Ack(address)
    }
}

/// Copy as much of `text` as fits, cutting on a character boundary
pub fn truncated<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
