//! Board-agnostic node logic for the crane controller
//!
//! This crate contains everything the three nodes do that does not depend
//! on a specific board:
//!
//! - Outbound mailbox with deferred (subscribed) delivery
//! - Bus transport over the shared I2C bus
//! - Verification handshake and serial link identification
//! - Synchronized stepper scheduler
//! - Status snapshot and status LED policy
//! - Role state machines and the node runtime
//! - Configuration types and the `crane.toml` parser

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod config;
pub mod mailbox;
pub mod motion;
pub mod node;
pub mod state;
pub mod traits;
pub mod transport;
pub mod verify;

#[cfg(test)]
mod mock;
