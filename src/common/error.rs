// src/common/error.rs

/// Errors raised by the SCD4x driver.
///
/// `E` is the error type of the underlying transport, so a bus failure keeps
/// its original detail while data errors stay transport independent.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Scd4xError<E = ()>
where
    E: core::fmt::Debug,
{
    /// Underlying I/O error from the transport (write/read failed or NACK).
    #[error("I/O error: {0:?}")]
    Io(E),

    /// A response word failed its CRC-8 check.
    #[error("CRC mismatch: expected {expected:#04x}, calculated {calculated:#04x}")]
    CrcMismatch { expected: u8, calculated: u8 },

    /// Response frame length does not match the number of expected words.
    #[error("Frame length mismatch: needed {needed} bytes, got {got}")]
    FrameLength { needed: usize, got: usize },

    /// Bus address is not a 7-bit address.
    #[error("Invalid I2C address: {0:#04x}")]
    InvalidAddress(u8),

    /// A configuration value cannot be represented as a sensor word.
    #[error("Argument out of range")]
    ArgumentOutOfRange,

    /// The sensor reported `0xFFFF` for a forced recalibration.
    #[error("Forced recalibration failed")]
    ForcedRecalibrationFailed,

    /// The self test returned a non-zero status word.
    #[error("Self test failed with status {status:#06x}")]
    SelfTestFailed { status: u16 },
}

impl<E: core::fmt::Debug> Scd4xError<E> {
    /// Whether the error came from the transport rather than the data.
    pub fn is_transport(&self) -> bool {
        matches!(self, Scd4xError::Io(_))
    }

    /// Whether the error is a data integrity failure the caller may retry.
    pub fn is_data_integrity(&self) -> bool {
        matches!(self, Scd4xError::CrcMismatch { .. })
    }
}
