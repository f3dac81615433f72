//! Bluetooth serial link trait

/// Errors from the serial link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// UART reported a framing, parity or overrun error
    Uart,
    /// Transmit did not complete
    WriteFailed,
}

/// Serial connection to the bluetooth module
///
/// The module is a transparent passthrough once paired; before pairing it
/// answers AT commands.
pub trait SerialLink {
    /// Write raw bytes to the module
    fn send(&mut self, data: &[u8]) -> Result<(), LinkError>;

    /// Read whatever bytes have arrived, without waiting
    ///
    /// Returns the number of bytes written to `buf` (0 when idle).
    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, LinkError>;
}
