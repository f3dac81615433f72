//! I2C controller side of the shared node bus
//!
//! Each node also listens as a target on a second I2C block wired to the
//! same SDA/SCL lines; that side lives in the firmware's receive task.

use embassy_rp::i2c::{Blocking, Error, I2c, Instance};

/// Blocking I2C controller implementing [`crane_hal::I2cBus`]
pub struct RpI2c<T: Instance> {
    i2c: I2c<'static, T, Blocking>,
}

impl<T: Instance> RpI2c<T> {
    pub fn new(i2c: I2c<'static, T, Blocking>) -> Self {
        Self { i2c }
    }
}

impl<T: Instance> crane_hal::I2cBus for RpI2c<T> {
    type Error = Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Error> {
        self.i2c.blocking_write(address, data)
    }
}
