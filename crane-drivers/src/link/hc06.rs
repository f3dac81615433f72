//! HC-06 bluetooth serial module
//!
//! Before pairing the module answers AT commands (`AT+VERSION` returns its
//! firmware signature); once paired it is a transparent serial passthrough.

use crane_core::traits::{LinkError, SerialLink};
use crane_hal::{UartRx, UartTx};

/// HC-06 on a UART
pub struct Hc06<U> {
    uart: U,
}

impl<U: UartTx + UartRx> Hc06<U> {
    pub fn new(uart: U) -> Self {
        Self { uart }
    }

    pub fn uart(&self) -> &U {
        &self.uart
    }

    pub fn release(self) -> U {
        self.uart
    }
}

impl<U: UartTx + UartRx> SerialLink for Hc06<U> {
    fn send(&mut self, data: &[u8]) -> Result<(), LinkError> {
        self.uart
            .write_blocking(data)
            .map_err(|_| LinkError::WriteFailed)?;
        self.uart.flush().map_err(|_| LinkError::WriteFailed)
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<usize, LinkError> {
        self.uart.read_available(buf).map_err(|_| LinkError::Uart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::vec::Vec;

    #[derive(Default)]
    struct MockUart {
        written: Vec<u8>,
        rx: VecDeque<u8>,
        fail_rx: bool,
    }

    impl UartTx for MockUart {
        type Error = ();

        fn write_blocking(&mut self, data: &[u8]) -> Result<(), ()> {
            self.written.extend_from_slice(data);
            Ok(())
        }

        fn flush(&mut self) -> Result<(), ()> {
            Ok(())
        }
    }

    impl UartRx for MockUart {
        type Error = ();

        fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
            if self.fail_rx {
                return Err(());
            }
            let mut n = 0;
            while n < buf.len() {
                match self.rx.pop_front() {
                    Some(b) => {
                        buf[n] = b;
                        n += 1;
                    }
                    None => break,
                }
            }
            Ok(n)
        }
    }

    #[test]
    fn test_send_writes_request() {
        let mut link = Hc06::new(MockUart::default());
        link.send(b"AT+VERSION").unwrap();
        assert_eq!(link.uart().written, b"AT+VERSION");
    }

    #[test]
    fn test_receive_reads_available_bytes() {
        let mut uart = MockUart::default();
        uart.rx.extend(b"OKlinvorV1.8");
        let mut link = Hc06::new(uart);

        let mut buf = [0u8; 8];
        assert_eq!(link.receive(&mut buf), Ok(8));
        assert_eq!(&buf, b"OKlinvor");
        assert_eq!(link.receive(&mut buf), Ok(4));
        assert_eq!(link.receive(&mut buf), Ok(0));
    }

    #[test]
    fn test_uart_error_maps_to_link_error() {
        let uart = MockUart {
            fail_rx: true,
            ..Default::default()
        };
        let mut link = Hc06::new(uart);
        let mut buf = [0u8; 4];
        assert_eq!(link.receive(&mut buf), Err(LinkError::Uart));
    }
}
