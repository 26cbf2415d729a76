// src/linux.rs
//
// Host transport over the Linux i2c-dev interface (requires 'linux' feature).

use crate::common::{
    address::Scd4xAddr,
    hal_traits::{Scd4xDelay, Scd4xI2c},
};
use i2cdev::core::I2CDevice;
use i2cdev::linux::{LinuxI2CDevice, LinuxI2CError};
use std::{path::Path, thread, time::Duration};

// errno values the i2c-dev adapters report for a missing acknowledge.
const ENXIO: i32 = 6;
const EREMOTEIO: i32 = 121;

/// An open `/dev/i2c-N` bus together with a sleeping delay.
///
/// The kernel device is bound to one slave address at a time; a transfer to
/// a different address rebinds it first.
pub struct LinuxI2c {
    device: LinuxI2CDevice,
    bound: u8,
}

impl LinuxI2c {
    /// Opens `port` bound to `address`.
    pub fn open<P: AsRef<Path>>(port: P, address: Scd4xAddr) -> Result<Self, LinuxI2CError> {
        let device = LinuxI2CDevice::new(port, u16::from(address.as_u8()))?;
        Ok(LinuxI2c { device, bound: address.as_u8() })
    }

    fn bind(&mut self, address: u8) -> Result<(), LinuxI2CError> {
        if address != self.bound {
            self.device.set_slave_address(u16::from(address))?;
            self.bound = address;
        }
        Ok(())
    }
}

impl core::fmt::Debug for LinuxI2c {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LinuxI2c").field("bound", &self.bound).finish_non_exhaustive()
    }
}

impl Scd4xI2c for LinuxI2c {
    type Error = LinuxI2CError;

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        self.bind(address)?;
        self.device.write(bytes)
    }

    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
        self.bind(address)?;
        self.device.read(buffer)
    }

    fn is_nack(error: &Self::Error) -> bool {
        let errno = match error {
            LinuxI2CError::Errno(errno) => Some(*errno),
            LinuxI2CError::Io(error) => error.raw_os_error(),
        };
        matches!(errno, Some(ENXIO | EREMOTEIO))
    }
}

impl Scd4xDelay for LinuxI2c {
    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}
