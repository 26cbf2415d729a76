// src/common/hal_traits.rs

use core::fmt::Debug;

/// Abstraction for the blocking delays the SCD4x needs between a command and
/// its response, and after state-changing commands.
///
/// Note: This is the subset of `embedded_hal::delay::DelayNs` the driver
/// uses; the `impl-native` adapter maps one onto the other.
pub trait Scd4xDelay {
    /// Delay for at least the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

/// Abstraction for a blocking I2C bus controller.
pub trait Scd4xI2c {
    /// Associated error type for bus errors (including NACKs).
    type Error: Debug;

    /// Writes `bytes` to the 7-bit `address` in a single transaction.
    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Fills `buffer` from the 7-bit `address` in a single transaction.
    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), Self::Error>;

    /// Whether `error` is a missing acknowledge from the target, as opposed
    /// to a fault of the bus or the controller.
    fn is_nack(error: &Self::Error) -> bool;
}

/// Async twin of [`Scd4xDelay`] (requires 'async' feature).
#[cfg(feature = "async")]
#[allow(async_fn_in_trait)]
pub trait Scd4xDelayAsync {
    async fn delay_ms(&mut self, ms: u32);
}

/// Async twin of [`Scd4xI2c`] (requires 'async' feature).
#[cfg(feature = "async")]
#[allow(async_fn_in_trait)]
pub trait Scd4xI2cAsync {
    type Error: Debug;

    async fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error>;

    async fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), Self::Error>;

    fn is_nack(error: &Self::Error) -> bool;
}

/// Bundles an `embedded-hal` 1.0 I2C bus and delay into something the
/// device sessions accept.
///
/// With the 'async' feature the same adapter also wraps the
/// `embedded-hal-async` traits.
#[cfg(feature = "impl-native")]
#[derive(Debug)]
pub struct NativeAdapter<I2C, D> {
    pub i2c: I2C,
    pub delay: D,
}

#[cfg(feature = "impl-native")]
impl<I2C, D> NativeAdapter<I2C, D> {
    pub fn new(i2c: I2C, delay: D) -> Self {
        NativeAdapter { i2c, delay }
    }

    /// Gives the bus and delay back.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }
}

#[cfg(feature = "impl-native")]
impl<I2C, D> Scd4xI2c for NativeAdapter<I2C, D>
where
    I2C: embedded_hal::i2c::I2c,
{
    type Error = I2C::Error;

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        embedded_hal::i2c::I2c::write(&mut self.i2c, address, bytes)
    }

    fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
        embedded_hal::i2c::I2c::read(&mut self.i2c, address, buffer)
    }

    fn is_nack(error: &Self::Error) -> bool {
        use embedded_hal::i2c::{Error as _, ErrorKind};
        matches!(error.kind(), ErrorKind::NoAcknowledge(_))
    }
}

#[cfg(feature = "impl-native")]
impl<I2C, D> Scd4xDelay for NativeAdapter<I2C, D>
where
    D: embedded_hal::delay::DelayNs,
{
    fn delay_ms(&mut self, ms: u32) {
        embedded_hal::delay::DelayNs::delay_ms(&mut self.delay, ms);
    }
}

#[cfg(all(feature = "async", feature = "impl-native"))]
impl<I2C, D> Scd4xI2cAsync for NativeAdapter<I2C, D>
where
    I2C: embedded_hal_async::i2c::I2c,
{
    type Error = I2C::Error;

    async fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        embedded_hal_async::i2c::I2c::write(&mut self.i2c, address, bytes).await
    }

    async fn read(&mut self, address: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
        embedded_hal_async::i2c::I2c::read(&mut self.i2c, address, buffer).await
    }

    fn is_nack(error: &Self::Error) -> bool {
        use embedded_hal_async::i2c::{Error as _, ErrorKind};
        matches!(error.kind(), ErrorKind::NoAcknowledge(_))
    }
}

#[cfg(all(feature = "async", feature = "impl-native"))]
impl<I2C, D> Scd4xDelayAsync for NativeAdapter<I2C, D>
where
    D: embedded_hal_async::delay::DelayNs,
{
    async fn delay_ms(&mut self, ms: u32) {
        embedded_hal_async::delay::DelayNs::delay_ms(&mut self.delay, ms).await;
    }
}

// --- Unit Tests ---
#[cfg(all(test, feature = "impl-native"))]
mod tests {
    use super::*;
    use crate::common::{crc::encode_word, error::Scd4xError};
    use crate::device::SyncScd4x;
    use embedded_hal::i2c::{ErrorKind, ErrorType, NoAcknowledgeSource, Operation};
    use heapless::Vec as HeaplessVec;

    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    struct BusError(ErrorKind);

    impl embedded_hal::i2c::Error for BusError {
        fn kind(&self) -> ErrorKind {
            self.0
        }
    }

    // Answers every read with `response` and fails every transaction with
    // `fault` when set.
    #[derive(Debug, Default)]
    struct FakeBus {
        writes: HeaplessVec<(u8, HeaplessVec<u8, 5>), 8>,
        response: HeaplessVec<u8, 9>,
        fault: Option<ErrorKind>,
    }

    impl FakeBus {
        fn run(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), BusError> {
            if let Some(kind) = self.fault {
                return Err(BusError(kind));
            }
            for operation in operations {
                match operation {
                    Operation::Write(bytes) => {
                        let bytes = HeaplessVec::from_slice(bytes).map_err(|_| BusError(ErrorKind::Overrun))?;
                        self.writes.push((address, bytes)).map_err(|_| BusError(ErrorKind::Overrun))?;
                    }
                    Operation::Read(buffer) => buffer.copy_from_slice(&self.response[..buffer.len()]),
                }
            }
            Ok(())
        }
    }

    impl ErrorType for FakeBus {
        type Error = BusError;
    }

    impl embedded_hal::i2c::I2c for FakeBus {
        fn transaction(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
            self.run(address, operations)
        }
    }

    #[derive(Debug, Default)]
    struct FakeDelay {
        elapsed_ns: u64,
    }

    impl embedded_hal::delay::DelayNs for FakeDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.elapsed_ns += u64::from(ns);
        }
    }

    fn bus_answering(word: u16) -> FakeBus {
        let mut bus = FakeBus::default();
        bus.response.extend_from_slice(&encode_word(word)).unwrap();
        bus
    }

    #[test]
    fn test_native_adapter_forwards_transfers() {
        let adapter = NativeAdapter::new(bus_answering(1950), FakeDelay::default());
        let mut sensor = SyncScd4x::new(adapter);

        assert_eq!(sensor.get_sensor_altitude(), Ok(1950));

        let (bus, delay) = sensor.release().release();
        assert_eq!(bus.writes.len(), 1);
        assert_eq!(bus.writes[0].0, 0x62);
        assert_eq!(bus.writes[0].1.as_slice(), &[0x23, 0x22]);
        assert_eq!(delay.elapsed_ns, 1_000_000);
    }

    #[test]
    fn test_native_adapter_classifies_nack() {
        let nack = BusError(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        let arbitration = BusError(ErrorKind::ArbitrationLoss);
        assert!(<NativeAdapter<FakeBus, FakeDelay> as Scd4xI2c>::is_nack(&nack));
        assert!(!<NativeAdapter<FakeBus, FakeDelay> as Scd4xI2c>::is_nack(&arbitration));
    }

    #[test]
    fn test_native_adapter_wake_up() {
        let mut bus = FakeBus::default();
        bus.fault = Some(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data));
        let mut sensor = SyncScd4x::new(NativeAdapter::new(bus, FakeDelay::default()));
        assert_eq!(sensor.wake_up(), Ok(()));

        let mut bus = FakeBus::default();
        bus.fault = Some(ErrorKind::Bus);
        let mut sensor = SyncScd4x::new(NativeAdapter::new(bus, FakeDelay::default()));
        assert_eq!(sensor.wake_up(), Err(Scd4xError::Io(BusError(ErrorKind::Bus))));
    }

    #[cfg(feature = "async")]
    mod async_adapter {
        use super::*;
        use crate::device::AsyncScd4x;
        use futures::executor::block_on;

        impl embedded_hal_async::i2c::I2c for FakeBus {
            async fn transaction(
                &mut self,
                address: u8,
                operations: &mut [Operation<'_>],
            ) -> Result<(), Self::Error> {
                self.run(address, operations)
            }
        }

        impl embedded_hal_async::delay::DelayNs for FakeDelay {
            async fn delay_ns(&mut self, ns: u32) {
                self.elapsed_ns += u64::from(ns);
            }
        }

        #[test]
        fn test_native_adapter_async_forwards_transfers() {
            let adapter = NativeAdapter::new(bus_answering(1), FakeDelay::default());
            let mut sensor = AsyncScd4x::new(adapter);

            assert_eq!(block_on(sensor.get_automatic_self_calibration()), Ok(true));
            assert_eq!(block_on(sensor.stop_periodic_measurement()), Ok(()));

            let (bus, delay) = sensor.release().release();
            assert_eq!(bus.writes[0].1.as_slice(), &[0x23, 0x13]);
            assert_eq!(bus.writes[1].1.as_slice(), &[0x3F, 0x86]);
            assert_eq!(delay.elapsed_ns, 501_000_000);
        }
    }
}
