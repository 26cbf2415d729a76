// src/device/sync_device/transaction.rs

use super::SyncScd4x;
use crate::common::{
    command::Command,
    crc::WORD_LEN,
    error::Scd4xError,
    hal_traits::{Scd4xDelay, Scd4xI2c},
    response::{self, MAX_RESPONSE_LEN},
};

impl<IF> SyncScd4x<IF>
where
    IF: Scd4xI2c + Scd4xDelay,
{
    /// Executes a command without a read phase: write, then wait the
    /// command's post-processing time.
    pub(super) fn send(&mut self, command: Command) -> Result<(), Scd4xError<IF::Error>> {
        debug_assert!(!command.requires_response(), "{} has a response", command.name());
        self.write_command(&command)?;
        self.wait(command.execution_time());
        Ok(())
    }

    /// Executes a command with a read phase and returns its `N` verified
    /// words. Transport errors and CRC failures are surfaced as-is, never
    /// retried.
    pub(super) fn fetch<const N: usize>(
        &mut self,
        command: Command,
    ) -> Result<[u16; N], Scd4xError<IF::Error>> {
        debug_assert_eq!(command.response_words(), N);
        self.write_command(&command)?;
        self.wait(command.execution_time());

        let mut read_buffer = [0u8; MAX_RESPONSE_LEN];
        let frame = self.read_frame(&mut read_buffer[..N * WORD_LEN])?;

        response::parse_words(frame).map_err(|e| {
            if e.is_data_integrity() {
                tracing::warn!(%command, error = ?e, "response failed CRC check");
            }
            e
        })
    }
}
