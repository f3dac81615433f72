//! Bus receive task
//!
//! Listens on the I2C target block for writes addressed to this node and
//! queues each one, whole, for the node task.

use defmt::*;
use embassy_rp::i2c_slave::{Command, I2cSlave};
use embassy_rp::peripherals::I2C1;

use crane_core::transport::RawMessage;
use crane_protocol::MAX_COMMAND_LEN;

use crate::channels::BUS_RX;

/// I2C target receive task
#[embassy_executor::task]
pub async fn bus_rx_task(mut target: I2cSlave<'static, I2C1>) {
    info!("Bus RX task started");

    let mut buf = [0u8; MAX_COMMAND_LEN];

    loop {
        match target.listen(&mut buf).await {
            Ok(Command::Write(len)) | Ok(Command::GeneralCall(len)) => queue(&buf[..len]),
            Ok(Command::Read) | Ok(Command::WriteRead(_)) => {
                // Nodes never read from each other; answer empty
                if let Err(e) = target.respond_to_read(&[]).await {
                    warn!("Bus RX: read response failed: {:?}", e);
                }
            }
            Err(e) => {
                warn!("Bus RX error: {:?}", e);
            }
        }
    }
}

fn queue(bytes: &[u8]) {
    let Ok(message) = RawMessage::from_slice(bytes) else {
        warn!("Bus RX: {} byte message too long, dropped", bytes.len());
        return;
    };
    trace!("Bus RX: {} bytes", bytes.len());
    if BUS_RX.try_send(message).is_err() {
        warn!("Bus RX channel full, dropping message");
    }
}
