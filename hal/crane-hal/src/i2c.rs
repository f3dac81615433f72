//! I2C bus abstractions
//!
//! The three crane nodes share one I2C bus. Each node is a target at its own
//! 7-bit address and becomes the controller only for the duration of a send.

/// I2C bus controller side
///
/// Only writes are needed: replies travel as separate writes in the
/// opposite direction rather than as read transactions.
pub trait I2cBus {
    /// Error type for I2C operations
    type Error;

    /// Write data to a device at the given address
    ///
    /// Opens a transaction, writes `data` byte by byte and closes it.
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `data` - Bytes to write
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;
}
