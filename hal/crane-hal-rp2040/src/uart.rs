//! Buffered UART for the bluetooth module
//!
//! Receive is interrupt-fed into a ring buffer, so reading what has
//! arrived never blocks.

use embassy_rp::uart::{BufferedUart, Error};
use embedded_io::{Read, ReadReady, Write};

/// Buffered UART implementing [`crane_hal::UartTx`] and [`crane_hal::UartRx`]
pub struct RpUart {
    uart: BufferedUart,
}

impl RpUart {
    pub fn new(uart: BufferedUart) -> Self {
        Self { uart }
    }
}

impl crane_hal::UartTx for RpUart {
    type Error = Error;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Error> {
        self.uart.write_all(data)
    }

    fn flush(&mut self) -> Result<(), Error> {
        Write::flush(&mut self.uart)
    }
}

impl crane_hal::UartRx for RpUart {
    type Error = Error;

    fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        if buf.is_empty() || !self.uart.read_ready()? {
            return Ok(0);
        }
        self.uart.read(buf)
    }
}
