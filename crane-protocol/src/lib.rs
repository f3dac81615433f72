//! Inter-node bus protocol
//!
//! This crate defines the short text commands the three crane nodes exchange
//! over their shared I2C bus. The protocol is deliberately tiny: every bus
//! write carries exactly one command as ASCII text, matched case-sensitively.
//!
//! # Vocabulary
//!
//! ```text
//! ┌──────────────┬────────────────────┬───────────────────────────────┐
//! │ TEXT         │ DIRECTION          │ MEANING                       │
//! ├──────────────┼────────────────────┼───────────────────────────────┤
//! │ Ping         │ coordinator → all  │ liveness request              │
//! │ OK2 / OK3    │ node → coordinator │ liveness ack from node 2 / 3  │
//! │ VerifyOK     │ coordinator → all  │ verification complete         │
//! │ CONNECTED    │ coordinator → 3    │ bluetooth link established    │
//! │ blueOK       │ coordinator → 3    │ serial module identified      │
//! │ blueERR      │ coordinator → 3    │ serial module answered oddly  │
//! │ blueINOP     │ coordinator → 3    │ serial module silent          │
//! │ STEPn:<rps>  │ coordinator → 2    │ set motor n rate (signed)     │
//! └──────────────┴────────────────────┴───────────────────────────────┘
//! ```
//!
//! Anything else is carried as a free-form payload.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod address;
pub mod command;

pub use address::NodeAddress;
pub use command::{
    truncated, Command, CommandError, CommandText, LinkStatus, MotorChannel, MAX_COMMAND_LEN,
};
