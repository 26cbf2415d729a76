// src/device/async_device.rs

use crate::common::{
    address::Scd4xAddr,
    command::Command,
    crc::WORD_LEN,
    error::Scd4xError,
    hal_traits::{Scd4xDelayAsync, Scd4xI2cAsync},
    response::{self, MAX_RESPONSE_LEN},
    settings::SensorSettings,
    timing,
    types::{Measurement, PowerMode, SerialNumber, TemperatureOffset},
};
use core::time::Duration;

/// Async session with one SCD4x on the bus (requires 'async' feature).
///
/// Mirrors [`crate::device::SyncScd4x`] operation for operation; the waits
/// between command and response are awaited instead of blocking.
#[derive(Debug)]
pub struct AsyncScd4x<IF>
where
    IF: Scd4xI2cAsync + Scd4xDelayAsync,
{
    interface: IF,
    address: Scd4xAddr,
}

impl<IF> AsyncScd4x<IF>
where
    IF: Scd4xI2cAsync + Scd4xDelayAsync,
{
    pub fn new(interface: IF) -> Self {
        Self::with_address(interface, Scd4xAddr::DEFAULT_ADDRESS)
    }

    pub fn with_address(interface: IF, address: Scd4xAddr) -> Self {
        AsyncScd4x { interface, address }
    }

    pub fn address(&self) -> Scd4xAddr {
        self.address
    }

    pub fn release(self) -> IF {
        self.interface
    }

    // --- Transaction helpers ---

    async fn write_command(&mut self, command: &Command) -> Result<(), Scd4xError<IF::Error>> {
        let buffer = command.format_into();
        tracing::trace!(address = self.address.as_u8(), %command, "write");
        self.interface
            .write(self.address.as_u8(), buffer.as_bytes())
            .await
            .map_err(Scd4xError::Io)
    }

    async fn wait(&mut self, delay: Duration) {
        let ms = timing::as_millis_u32(delay);
        if ms > 0 {
            self.interface.delay_ms(ms).await;
        }
    }

    async fn send(&mut self, command: Command) -> Result<(), Scd4xError<IF::Error>> {
        debug_assert!(!command.requires_response(), "{} has a response", command.name());
        self.write_command(&command).await?;
        self.wait(command.execution_time()).await;
        Ok(())
    }

    async fn fetch<const N: usize>(&mut self, command: Command) -> Result<[u16; N], Scd4xError<IF::Error>> {
        debug_assert_eq!(command.response_words(), N);
        self.write_command(&command).await?;
        self.wait(command.execution_time()).await;

        let mut read_buffer = [0u8; MAX_RESPONSE_LEN];
        let frame = &mut read_buffer[..N * WORD_LEN];
        self.interface
            .read(self.address.as_u8(), frame)
            .await
            .map_err(Scd4xError::Io)?;

        response::parse_words(frame).map_err(|e| {
            if e.is_data_integrity() {
                tracing::warn!(%command, error = ?e, "response failed CRC check");
            }
            e
        })
    }

    // --- Basic commands ---

    pub async fn start_periodic_measurement(&mut self) -> Result<(), Scd4xError<IF::Error>> {
        self.send(Command::StartPeriodicMeasurement).await
    }

    pub async fn start_low_power_periodic_measurement(&mut self) -> Result<(), Scd4xError<IF::Error>> {
        self.send(Command::StartLowPowerPeriodicMeasurement).await
    }

    pub async fn start_periodic_measurement_in(&mut self, mode: PowerMode) -> Result<(), Scd4xError<IF::Error>> {
        self.send(mode.start_command()).await
    }

    pub async fn stop_periodic_measurement(&mut self) -> Result<(), Scd4xError<IF::Error>> {
        self.send(Command::StopPeriodicMeasurement).await
    }

    pub async fn read_measurement(&mut self) -> Result<Measurement, Scd4xError<IF::Error>> {
        let words = self.fetch::<3>(Command::ReadMeasurement).await?;
        let measurement = Measurement::from_words(words);
        tracing::debug!(
            co2 = measurement.co2.ppm(),
            temperature = measurement.temperature.ticks(),
            humidity = measurement.humidity.ticks(),
            "measurement"
        );
        Ok(measurement)
    }

    pub async fn get_data_ready_status(&mut self) -> Result<bool, Scd4xError<IF::Error>> {
        let [status] = self.fetch::<1>(Command::GetDataReadyStatus).await?;
        Ok(response::data_ready(status))
    }

    pub async fn read_serial_number(&mut self) -> Result<SerialNumber, Scd4xError<IF::Error>> {
        self.fetch::<3>(Command::GetSerialNumber).await.map(SerialNumber::from_words)
    }

    // --- On-chip output signal compensation ---

    pub async fn get_temperature_offset(&mut self) -> Result<TemperatureOffset, Scd4xError<IF::Error>> {
        let [ticks] = self.fetch::<1>(Command::GetTemperatureOffset).await?;
        Ok(TemperatureOffset::from_ticks(ticks))
    }

    pub async fn set_temperature_offset(&mut self, offset_celsius: f32) -> Result<(), Scd4xError<IF::Error>> {
        let offset = TemperatureOffset::from_degrees_celsius(offset_celsius)
            .ok_or(Scd4xError::ArgumentOutOfRange)?;
        self.send(Command::SetTemperatureOffset { ticks: offset.ticks() }).await
    }

    pub async fn get_sensor_altitude(&mut self) -> Result<u16, Scd4xError<IF::Error>> {
        let [meters] = self.fetch::<1>(Command::GetSensorAltitude).await?;
        Ok(meters)
    }

    pub async fn set_sensor_altitude(&mut self, meters: u16) -> Result<(), Scd4xError<IF::Error>> {
        self.send(Command::SetSensorAltitude { meters }).await
    }

    pub async fn set_ambient_pressure(&mut self, hpa: u16) -> Result<(), Scd4xError<IF::Error>> {
        self.send(Command::SetAmbientPressure { hpa }).await
    }

    // --- Field calibration ---

    pub async fn perform_forced_recalibration(&mut self, target_ppm: u16) -> Result<i16, Scd4xError<IF::Error>> {
        let [correction] = self
            .fetch::<1>(Command::PerformForcedRecalibration { target_ppm })
            .await?;
        response::forced_recalibration_correction(correction)
    }

    pub async fn get_automatic_self_calibration(&mut self) -> Result<bool, Scd4xError<IF::Error>> {
        let [enabled] = self.fetch::<1>(Command::GetAutomaticSelfCalibration).await?;
        Ok(enabled == 1)
    }

    pub async fn set_automatic_self_calibration(&mut self, enabled: bool) -> Result<(), Scd4xError<IF::Error>> {
        self.send(Command::SetAutomaticSelfCalibration { enabled }).await
    }

    // --- Advanced features ---

    pub async fn persist_settings(&mut self) -> Result<(), Scd4xError<IF::Error>> {
        self.send(Command::PersistSettings).await
    }

    pub async fn perform_self_test(&mut self) -> Result<(), Scd4xError<IF::Error>> {
        let [status] = self.fetch::<1>(Command::PerformSelfTest).await?;
        response::self_test_status(status)
    }

    pub async fn perform_factory_reset(&mut self) -> Result<(), Scd4xError<IF::Error>> {
        self.send(Command::PerformFactoryReset).await
    }

    pub async fn reinit(&mut self) -> Result<(), Scd4xError<IF::Error>> {
        self.send(Command::Reinit).await
    }

    // --- Single shot and power (SCD41 only) ---

    pub async fn measure_single_shot(&mut self) -> Result<(), Scd4xError<IF::Error>> {
        self.send(Command::MeasureSingleShot).await
    }

    pub async fn measure_single_shot_rht_only(&mut self) -> Result<(), Scd4xError<IF::Error>> {
        self.send(Command::MeasureSingleShotRhtOnly).await
    }

    pub async fn power_down(&mut self) -> Result<(), Scd4xError<IF::Error>> {
        self.send(Command::PowerDown).await
    }

    /// Wakes the sensor; a missing acknowledge is expected and ignored, any
    /// other bus error is returned.
    pub async fn wake_up(&mut self) -> Result<(), Scd4xError<IF::Error>> {
        let command = Command::WakeUp;
        match self.write_command(&command).await {
            Err(Scd4xError::Io(error)) if IF::is_nack(&error) => {
                tracing::warn!(?error, "wake_up not acknowledged");
            }
            result => result?,
        }
        self.wait(command.execution_time()).await;
        Ok(())
    }

    pub async fn apply_settings(&mut self, settings: &SensorSettings) -> Result<(), Scd4xError<IF::Error>> {
        for command in settings.commands::<IF::Error>()? {
            self.send(command).await?;
        }
        Ok(())
    }
}
