// src/device/mock.rs
//
// In-memory bus shared by the device session tests.

use crate::common::{
    command::MAX_COMMAND_LEN,
    crc::encode_word,
    hal_traits::{Scd4xDelay, Scd4xI2c},
    response::MAX_RESPONSE_LEN,
};
use heapless::Vec as HeaplessVec;

// --- Mock Comm Error ---
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MockCommError {
    /// The target did not acknowledge.
    Nack,
    /// Any other bus failure.
    Bus,
}

// --- Mock Interface ---
#[derive(Debug, Default)]
pub struct MockInterface {
    pub writes: HeaplessVec<(u8, HeaplessVec<u8, MAX_COMMAND_LEN>), 32>,
    pub read_lengths: HeaplessVec<usize, 32>,
    reads: HeaplessVec<HeaplessVec<u8, MAX_RESPONSE_LEN>, 32>,
    read_pos: usize,
    pub elapsed_ms: u64,
    pub delay_calls: u32,
    /// Writes are not acknowledged.
    pub fail_writes: bool,
    /// Every transfer fails with a bus fault.
    pub bus_fault: bool,
}

impl MockInterface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues one response frame made of CRC-protected words.
    pub fn stage_words(&mut self, words: &[u16]) {
        let mut frame = HeaplessVec::new();
        for word in words {
            frame.extend_from_slice(&encode_word(*word)).unwrap();
        }
        self.reads.push(frame).unwrap();
    }

    /// Queues one response frame verbatim.
    pub fn stage_raw(&mut self, raw: &[u8]) {
        self.reads.push(HeaplessVec::from_slice(raw).unwrap()).unwrap();
    }

    pub fn written(&self, index: usize) -> (u8, &[u8]) {
        let (address, bytes) = &self.writes[index];
        (*address, bytes.as_slice())
    }

    /// Command words written so far, argument bytes stripped.
    pub fn written_codes(&self) -> HeaplessVec<u16, 32> {
        self.writes
            .iter()
            .map(|(_, bytes)| u16::from_be_bytes([bytes[0], bytes[1]]))
            .collect()
    }
}

impl Scd4xI2c for MockInterface {
    type Error = MockCommError;

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        if self.bus_fault {
            return Err(MockCommError::Bus);
        }
        if self.fail_writes {
            return Err(MockCommError::Nack);
        }
        let bytes = HeaplessVec::from_slice(bytes).map_err(|_| MockCommError::Bus)?;
        self.writes.push((address, bytes)).map_err(|_| MockCommError::Bus)
    }

    fn read(&mut self, _address: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
        if self.bus_fault {
            return Err(MockCommError::Bus);
        }
        // An empty output buffer on the sensor answers with NACK.
        let frame = self.reads.get(self.read_pos).ok_or(MockCommError::Nack)?;
        if frame.len() != buffer.len() {
            return Err(MockCommError::Nack);
        }
        buffer.copy_from_slice(frame);
        self.read_pos += 1;
        self.read_lengths.push(buffer.len()).map_err(|_| MockCommError::Bus)
    }

    fn is_nack(error: &Self::Error) -> bool {
        *error == MockCommError::Nack
    }
}

impl Scd4xDelay for MockInterface {
    fn delay_ms(&mut self, ms: u32) {
        self.elapsed_ms += u64::from(ms);
        self.delay_calls += 1;
    }
}

#[cfg(feature = "async")]
mod async_impls {
    use super::*;
    use crate::common::hal_traits::{Scd4xDelayAsync, Scd4xI2cAsync};

    impl Scd4xI2cAsync for MockInterface {
        type Error = MockCommError;

        async fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
            Scd4xI2c::write(self, address, bytes)
        }

        async fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
            Scd4xI2c::read(self, address, buffer)
        }

        fn is_nack(error: &Self::Error) -> bool {
            <MockInterface as Scd4xI2c>::is_nack(error)
        }
    }

    impl Scd4xDelayAsync for MockInterface {
        async fn delay_ms(&mut self, ms: u32) {
            Scd4xDelay::delay_ms(self, ms);
        }
    }
}
