//! RP2040-specific HAL for the crane controller firmware
//!
//! Implements the shared `crane-hal` traits on top of `embassy-rp` and
//! `embassy-time`:
//!
//! - GPIO outputs
//! - Blocking I2C controller writes
//! - Buffered UART for the bluetooth module
//! - 50 Hz servo PWM
//! - Monotonic clock and busy-wait delays

#![no_std]

pub mod gpio;
pub mod i2c;
pub mod pwm;
pub mod time;
pub mod uart;

pub use gpio::RpOutput;
pub use i2c::RpI2c;
pub use pwm::ServoPwm;
pub use time::EmbassyTimer;
pub use uart::RpUart;

// Re-export shared traits from crane-hal for convenience
pub use crane_hal::{Clock, Delay, I2cBus, OutputPin, PwmPin, UartRx, UartTx};
