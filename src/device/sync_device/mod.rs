// src/device/sync_device/mod.rs

mod io_helpers;
mod transaction;

use crate::common::{
    address::Scd4xAddr,
    command::Command,
    error::Scd4xError,
    hal_traits::{Scd4xDelay, Scd4xI2c},
    response,
    settings::SensorSettings,
    types::{Measurement, PowerMode, SerialNumber, TemperatureOffset},
};

/// Blocking session with one SCD4x on the bus.
///
/// Each operation writes a command, waits the sensor's fixed processing time
/// and, where the command has one, reads and verifies the response before
/// returning. Only one transaction is ever in flight; exclusive access
/// follows from every method taking `&mut self`.
///
/// The session does not track the sensor's mode. Issuing idle-only commands
/// during periodic measurement, or reading before the signal update interval
/// has elapsed, is left to the caller.
#[derive(Debug)]
pub struct SyncScd4x<IF>
where
    IF: Scd4xI2c + Scd4xDelay,
{
    interface: IF,
    address: Scd4xAddr,
}

impl<IF> SyncScd4x<IF>
where
    IF: Scd4xI2c + Scd4xDelay,
{
    /// Binds a session to the default address `0x62`.
    pub fn new(interface: IF) -> Self {
        Self::with_address(interface, Scd4xAddr::DEFAULT_ADDRESS)
    }

    pub fn with_address(interface: IF, address: Scd4xAddr) -> Self {
        SyncScd4x { interface, address }
    }

    pub fn address(&self) -> Scd4xAddr {
        self.address
    }

    /// Ends the session and hands the transport back.
    pub fn release(self) -> IF {
        self.interface
    }

    // --- Basic commands ---

    /// Starts periodic measurement in high power mode (5 s interval).
    ///
    /// Only available in idle mode.
    pub fn start_periodic_measurement(&mut self) -> Result<(), Scd4xError<IF::Error>> {
        self.send(Command::StartPeriodicMeasurement)
    }

    /// Starts periodic measurement in low power mode (30 s interval).
    pub fn start_low_power_periodic_measurement(&mut self) -> Result<(), Scd4xError<IF::Error>> {
        self.send(Command::StartLowPowerPeriodicMeasurement)
    }

    pub fn start_periodic_measurement_in(&mut self, mode: PowerMode) -> Result<(), Scd4xError<IF::Error>> {
        self.send(mode.start_command())
    }

    /// Stops periodic measurement. Returns after the 500 ms the sensor needs
    /// before it accepts further commands.
    pub fn stop_periodic_measurement(&mut self) -> Result<(), Scd4xError<IF::Error>> {
        self.send(Command::StopPeriodicMeasurement)
    }

    /// Reads CO2, temperature and humidity.
    ///
    /// The output buffer is emptied on read-out, and the sensor answers with
    /// a NACK (surfaced as `Io`) while it holds no new sample. A corrupted
    /// word fails the whole read with `CrcMismatch`.
    pub fn read_measurement(&mut self) -> Result<Measurement, Scd4xError<IF::Error>> {
        let words = self.fetch::<3>(Command::ReadMeasurement)?;
        let measurement = Measurement::from_words(words);
        tracing::debug!(
            co2 = measurement.co2.ppm(),
            temperature = measurement.temperature.ticks(),
            humidity = measurement.humidity.ticks(),
            "measurement"
        );
        Ok(measurement)
    }

    /// Non-blocking variant of [`SyncScd4x::read_measurement`]: yields
    /// `WouldBlock` until the data ready status reports a new sample.
    pub fn read_measurement_nb(&mut self) -> nb::Result<Measurement, Scd4xError<IF::Error>> {
        if !self.get_data_ready_status()? {
            return Err(nb::Error::WouldBlock);
        }
        Ok(self.read_measurement()?)
    }

    /// Whether a new measurement is available for read-out.
    pub fn get_data_ready_status(&mut self) -> Result<bool, Scd4xError<IF::Error>> {
        let [status] = self.fetch::<1>(Command::GetDataReadyStatus)?;
        Ok(response::data_ready(status))
    }

    /// Reads the 48-bit serial number. Only available in idle mode.
    pub fn read_serial_number(&mut self) -> Result<SerialNumber, Scd4xError<IF::Error>> {
        self.fetch::<3>(Command::GetSerialNumber).map(SerialNumber::from_words)
    }

    // --- On-chip output signal compensation ---

    pub fn get_temperature_offset(&mut self) -> Result<TemperatureOffset, Scd4xError<IF::Error>> {
        let [ticks] = self.fetch::<1>(Command::GetTemperatureOffset)?;
        Ok(TemperatureOffset::from_ticks(ticks))
    }

    /// Sets the temperature offset in °C. Only available in idle mode.
    pub fn set_temperature_offset(&mut self, offset_celsius: f32) -> Result<(), Scd4xError<IF::Error>> {
        let offset = TemperatureOffset::from_degrees_celsius(offset_celsius)
            .ok_or(Scd4xError::ArgumentOutOfRange)?;
        self.send(Command::SetTemperatureOffset { ticks: offset.ticks() })
    }

    /// Sensor altitude in meters above sea level.
    pub fn get_sensor_altitude(&mut self) -> Result<u16, Scd4xError<IF::Error>> {
        let [meters] = self.fetch::<1>(Command::GetSensorAltitude)?;
        Ok(meters)
    }

    /// Overrides any compensation from a previously set ambient pressure.
    pub fn set_sensor_altitude(&mut self, meters: u16) -> Result<(), Scd4xError<IF::Error>> {
        self.send(Command::SetSensorAltitude { meters })
    }

    /// Sets the ambient pressure in hPa. Can be sent during periodic
    /// measurement for continuous pressure compensation.
    pub fn set_ambient_pressure(&mut self, hpa: u16) -> Result<(), Scd4xError<IF::Error>> {
        self.send(Command::SetAmbientPressure { hpa })
    }

    // --- Field calibration ---

    /// Forced recalibration against a reference concentration in ppm.
    ///
    /// Operate the sensor in periodic mode for more than three minutes in a
    /// constant environment, stop periodic measurement, then call this.
    /// Returns the applied correction in ppm.
    pub fn perform_forced_recalibration(&mut self, target_ppm: u16) -> Result<i16, Scd4xError<IF::Error>> {
        let [correction] = self.fetch::<1>(Command::PerformForcedRecalibration { target_ppm })?;
        response::forced_recalibration_correction(correction)
    }

    pub fn get_automatic_self_calibration(&mut self) -> Result<bool, Scd4xError<IF::Error>> {
        let [enabled] = self.fetch::<1>(Command::GetAutomaticSelfCalibration)?;
        Ok(enabled == 1)
    }

    pub fn set_automatic_self_calibration(&mut self, enabled: bool) -> Result<(), Scd4xError<IF::Error>> {
        self.send(Command::SetAutomaticSelfCalibration { enabled })
    }

    // --- Advanced features ---

    /// Stores the current configuration in EEPROM. The EEPROM endures about
    /// 2000 write cycles; only persist actual changes.
    pub fn persist_settings(&mut self) -> Result<(), Scd4xError<IF::Error>> {
        self.send(Command::PersistSettings)
    }

    /// End-of-line self test; takes about 10 s on the sensor side.
    pub fn perform_self_test(&mut self) -> Result<(), Scd4xError<IF::Error>> {
        let [status] = self.fetch::<1>(Command::PerformSelfTest)?;
        response::self_test_status(status)
    }

    /// Resets all EEPROM configuration and erases the FRC and ASC history.
    pub fn perform_factory_reset(&mut self) -> Result<(), Scd4xError<IF::Error>> {
        self.send(Command::PerformFactoryReset)
    }

    /// Reloads user settings from EEPROM. Stop periodic measurement first.
    pub fn reinit(&mut self) -> Result<(), Scd4xError<IF::Error>> {
        self.send(Command::Reinit)
    }

    // --- Single shot and power (SCD41 only) ---

    /// On-demand measurement; read the result with `read_measurement`.
    pub fn measure_single_shot(&mut self) -> Result<(), Scd4xError<IF::Error>> {
        self.send(Command::MeasureSingleShot)
    }

    /// On-demand temperature and humidity only measurement. CO2 reads 0.
    pub fn measure_single_shot_rht_only(&mut self) -> Result<(), Scd4xError<IF::Error>> {
        self.send(Command::MeasureSingleShotRhtOnly)
    }

    pub fn power_down(&mut self) -> Result<(), Scd4xError<IF::Error>> {
        self.send(Command::PowerDown)
    }

    /// Wakes the sensor from sleep mode.
    ///
    /// The sensor does not acknowledge this command when it cannot wake up
    /// fast enough, so a NACK is logged and ignored. Any other bus error is
    /// returned.
    pub fn wake_up(&mut self) -> Result<(), Scd4xError<IF::Error>> {
        let command = Command::WakeUp;
        match self.write_command(&command) {
            Err(Scd4xError::Io(error)) if IF::is_nack(&error) => {
                tracing::warn!(?error, "wake_up not acknowledged");
            }
            result => result?,
        }
        self.wait(command.execution_time());
        Ok(())
    }

    /// Writes every configured value in `settings`. Idle mode only, except
    /// for the ambient pressure.
    pub fn apply_settings(&mut self, settings: &SensorSettings) -> Result<(), Scd4xError<IF::Error>> {
        for command in settings.commands::<IF::Error>()? {
            self.send(command)?;
        }
        Ok(())
    }
}
