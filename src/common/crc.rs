// src/common/crc.rs

use super::error::Scd4xError;
use crc::{Algorithm, Crc};

/// Sensirion CRC-8 as used by every SCD4x data word.
/// Polynomial: 0x31 (x^8 + x^5 + x^4 + 1)
/// Initial Value: 0xFF
/// Input Reflected: false
/// Output Reflected: false
/// Final XOR: 0x00
/// Check Value: 0xF7 (for "123456789"), same parameters as CRC-8/NRSC-5
/// Residue: 0x00
pub const SENSIRION_CRC: Algorithm<u8> = Algorithm {
    width: 8,
    poly: 0x31,
    init: 0xFF,
    refin: false,
    refout: false,
    xorout: 0x00,
    check: 0xF7,
    residue: 0x00,
};

const CRC_COMPUTER: Crc<u8> = Crc::<u8>::new(&SENSIRION_CRC);

/// Number of bytes one data word occupies on the wire (MSB, LSB, CRC).
pub const WORD_LEN: usize = 3;

/// Calculates the Sensirion CRC-8 for the given bytes.
#[inline]
pub fn calculate_crc8(data: &[u8]) -> u8 {
    CRC_COMPUTER.checksum(data)
}

/// Encodes a word as it travels on the bus: big-endian bytes followed by
/// their CRC.
pub fn encode_word(word: u16) -> [u8; WORD_LEN] {
    let [msb, lsb] = word.to_be_bytes();
    [msb, lsb, calculate_crc8(&[msb, lsb])]
}

/// Verifies a single `[MSB, LSB, CRC]` triple and returns the word.
///
/// # Returns
///
/// * `Ok(word)` if the CRC is valid.
/// * `Err(Scd4xError::FrameLength)` if `chunk` is not exactly three bytes.
/// * `Err(Scd4xError::CrcMismatch)` if the CRCs don't match.
pub fn verify_word<E>(chunk: &[u8]) -> Result<u16, Scd4xError<E>>
where
    E: core::fmt::Debug,
{
    if chunk.len() != WORD_LEN {
        return Err(Scd4xError::FrameLength { needed: WORD_LEN, got: chunk.len() });
    }
    let calculated = calculate_crc8(&chunk[..2]);
    let expected = chunk[2];

    if calculated == expected {
        Ok(u16::from_be_bytes([chunk[0], chunk[1]]))
    } else {
        Err(Scd4xError::CrcMismatch { expected, calculated })
    }
}
