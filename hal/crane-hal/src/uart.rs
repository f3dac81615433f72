//! UART serial communication abstractions
//!
//! Used for the Bluetooth serial module attached to the coordinator.

/// UART transmitter
pub trait UartTx {
    /// Error type for transmit operations
    type Error;

    /// Write data to the UART
    ///
    /// Blocks until all data has been written or an error occurs.
    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// UART receiver
pub trait UartRx {
    /// Error type for receive operations
    type Error;

    /// Read whatever bytes are already buffered
    ///
    /// Never waits for more data. Returns the number of bytes copied into
    /// `buf`, which is 0 when nothing has arrived.
    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}
