// src/device/sync_device/io_helpers.rs

use super::SyncScd4x; // Access SyncScd4x definition
use crate::common::{
    command::Command,
    error::Scd4xError,
    hal_traits::{Scd4xDelay, Scd4xI2c},
    timing,
};
use core::time::Duration;

// Implementation block for bus level helpers
impl<IF> SyncScd4x<IF>
where
    IF: Scd4xI2c + Scd4xDelay,
{
    /// Formats `command` and writes it to the bound address.
    pub(super) fn write_command(&mut self, command: &Command) -> Result<(), Scd4xError<IF::Error>> {
        let buffer = command.format_into();
        tracing::trace!(address = self.address.as_u8(), %command, "write");
        self.interface
            .write(self.address.as_u8(), buffer.as_bytes())
            .map_err(Scd4xError::Io)
    }

    /// Fills `buffer` with the sensor's answer to the previous command.
    pub(super) fn read_frame<'buf>(
        &mut self,
        buffer: &'buf mut [u8],
    ) -> Result<&'buf [u8], Scd4xError<IF::Error>> {
        self.interface
            .read(self.address.as_u8(), buffer)
            .map_err(Scd4xError::Io)?;
        Ok(buffer)
    }

    /// Blocks for `delay`, skipping the call entirely for zero delays.
    pub(super) fn wait(&mut self, delay: Duration) {
        let ms = timing::as_millis_u32(delay);
        if ms > 0 {
            self.interface.delay_ms(ms);
        }
    }
}
