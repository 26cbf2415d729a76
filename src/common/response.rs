// src/common/response.rs

use super::crc::{self, WORD_LEN};
use super::error::Scd4xError;

/// Longest frame the sensor ever answers with (three words).
pub const MAX_RESPONSE_LEN: usize = 3 * WORD_LEN;

/// Splits a response frame into its words, checking every CRC.
///
/// The frame must hold exactly `N` `[MSB, LSB, CRC]` triples. A single bad
/// CRC fails the whole frame; no partial result is returned.
pub fn parse_words<E, const N: usize>(frame: &[u8]) -> Result<[u16; N], Scd4xError<E>>
where
    E: core::fmt::Debug,
{
    let needed = N * WORD_LEN;
    if frame.len() != needed {
        return Err(Scd4xError::FrameLength { needed, got: frame.len() });
    }

    let mut words = [0u16; N];
    for (word, chunk) in words.iter_mut().zip(frame.chunks_exact(WORD_LEN)) {
        *word = crc::verify_word(chunk)?;
    }
    Ok(words)
}

/// Data ready when any of the eleven least significant bits is set.
#[inline]
pub const fn data_ready(word: u16) -> bool {
    word & 0x07FF != 0
}

/// Interprets the forced recalibration answer as a correction in ppm.
///
/// `0xFFFF` signals that the recalibration failed; any other value carries
/// the correction offset by `0x8000`.
pub fn forced_recalibration_correction<E>(word: u16) -> Result<i16, Scd4xError<E>>
where
    E: core::fmt::Debug,
{
    if word == 0xFFFF {
        return Err(Scd4xError::ForcedRecalibrationFailed);
    }
    Ok((i32::from(word) - 0x8000) as i16)
}

/// Self test status word, zero means no malfunction detected.
pub fn self_test_status<E>(word: u16) -> Result<(), Scd4xError<E>>
where
    E: core::fmt::Debug,
{
    match word {
        0 => Ok(()),
        status => Err(Scd4xError::SelfTestFailed { status }),
    }
}
