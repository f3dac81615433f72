//! Crane Hardware Abstraction Layer
//!
//! This crate defines hardware abstraction traits that chip-specific HALs
//! implement. The coordination logic in `crane-core` only ever talks to
//! these traits, so it runs unchanged on the target and in host tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (crane-firmware)           │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  crane-core / crane-drivers             │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  crane-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │  crane-hal-   │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Digital outputs
//! - [`i2c::I2cBus`] - Shared inter-node bus (master writes)
//! - [`uart::UartTx`], [`uart::UartRx`] - Serial peripheral link
//! - [`pwm::PwmPin`] - Pulse-width output for the gripper servo
//! - [`time::Clock`], [`time::Delay`] - Monotonic time and blocking waits

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod i2c;
pub mod pwm;
pub mod time;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use gpio::OutputPin;
pub use i2c::I2cBus;
pub use pwm::PwmPin;
pub use time::{Clock, Delay, Timer};
pub use uart::{UartRx, UartTx};
