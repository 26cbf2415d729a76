//! SCD4x I2C command definitions.
//!
//! Every command starts with a 16-bit big-endian command word sent without
//! CRC. Commands carrying an argument append one data word followed by its
//! CRC-8. See the SCD4x datasheet, section 3.5 "Command overview".

use arrayvec::ArrayVec;
use core::fmt;
use core::time::Duration;

use super::{crc, timing};

/// Longest frame the host ever writes: command word + argument word + CRC.
pub const MAX_COMMAND_LEN: usize = 2 + crc::WORD_LEN;

/// Represents an SCD4x command together with its argument, if any.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start periodic measurement, signal update interval 5 s.
    StartPeriodicMeasurement,
    /// Start low power periodic measurement, signal update interval 30 s.
    StartLowPowerPeriodicMeasurement,
    /// Read CO2, temperature and humidity from the output buffer.
    ReadMeasurement,
    /// Stop periodic measurement and return to idle mode.
    StopPeriodicMeasurement,
    GetTemperatureOffset,
    /// Argument is the offset in ticks (`175 * ticks / 2^16` °C).
    SetTemperatureOffset { ticks: u16 },
    GetSensorAltitude,
    /// Argument is the altitude in meters above sea level.
    SetSensorAltitude { meters: u16 },
    /// Argument is the ambient pressure in hPa.
    SetAmbientPressure { hpa: u16 },
    /// Argument is the reference CO2 concentration in ppm.
    PerformForcedRecalibration { target_ppm: u16 },
    GetAutomaticSelfCalibration,
    SetAutomaticSelfCalibration { enabled: bool },
    GetDataReadyStatus,
    /// Store the current configuration in EEPROM.
    PersistSettings,
    GetSerialNumber,
    PerformSelfTest,
    PerformFactoryReset,
    /// Reload user settings from EEPROM.
    Reinit,
    MeasureSingleShot,
    MeasureSingleShotRhtOnly,
    PowerDown,
    WakeUp,
}

/// A formatted command frame ready to be written to the bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBuffer(ArrayVec<u8, MAX_COMMAND_LEN>);

impl CommandBuffer {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Command {
    /// The 16-bit command word.
    pub const fn code(&self) -> u16 {
        match self {
            Command::StartPeriodicMeasurement => 0x21B1,
            Command::StartLowPowerPeriodicMeasurement => 0x21AC,
            Command::ReadMeasurement => 0xEC05,
            Command::StopPeriodicMeasurement => 0x3F86,
            Command::GetTemperatureOffset => 0x2318,
            Command::SetTemperatureOffset { .. } => 0x241D,
            Command::GetSensorAltitude => 0x2322,
            Command::SetSensorAltitude { .. } => 0x2427,
            Command::SetAmbientPressure { .. } => 0xE000,
            Command::PerformForcedRecalibration { .. } => 0x362F,
            Command::GetAutomaticSelfCalibration => 0x2313,
            Command::SetAutomaticSelfCalibration { .. } => 0x2416,
            Command::GetDataReadyStatus => 0xE4B8,
            Command::PersistSettings => 0x3615,
            Command::GetSerialNumber => 0x3682,
            Command::PerformSelfTest => 0x3639,
            Command::PerformFactoryReset => 0x3632,
            Command::Reinit => 0x3646,
            Command::MeasureSingleShot => 0x219D,
            Command::MeasureSingleShotRhtOnly => 0x2196,
            Command::PowerDown => 0x36E0,
            Command::WakeUp => 0x36F6,
        }
    }

    /// The argument word written after the command word, if any.
    pub const fn argument(&self) -> Option<u16> {
        match *self {
            Command::SetTemperatureOffset { ticks } => Some(ticks),
            Command::SetSensorAltitude { meters } => Some(meters),
            Command::SetAmbientPressure { hpa } => Some(hpa),
            Command::PerformForcedRecalibration { target_ppm } => Some(target_ppm),
            Command::SetAutomaticSelfCalibration { enabled } => Some(enabled as u16),
            _ => None,
        }
    }

    /// Number of CRC-protected words the sensor answers with.
    pub const fn response_words(&self) -> usize {
        match self {
            Command::ReadMeasurement | Command::GetSerialNumber => 3,
            Command::GetTemperatureOffset
            | Command::GetSensorAltitude
            | Command::PerformForcedRecalibration { .. }
            | Command::GetAutomaticSelfCalibration
            | Command::GetDataReadyStatus
            | Command::PerformSelfTest => 1,
            _ => 0,
        }
    }

    /// Whether a read phase follows the write.
    pub const fn requires_response(&self) -> bool {
        self.response_words() > 0
    }

    /// Time to wait after writing the command: the read delay for commands
    /// with a response, the post-processing time otherwise.
    pub const fn execution_time(&self) -> Duration {
        match self {
            Command::StartLowPowerPeriodicMeasurement => Duration::ZERO,
            Command::StopPeriodicMeasurement => timing::STOP_PERIODIC_MEASUREMENT_DELAY,
            Command::PerformForcedRecalibration { .. } => timing::FORCED_RECALIBRATION_DELAY,
            Command::PersistSettings | Command::PerformFactoryReset => timing::EEPROM_WRITE_DELAY,
            Command::PerformSelfTest => timing::SELF_TEST_DELAY,
            Command::Reinit => timing::REINIT_DELAY,
            Command::MeasureSingleShot => timing::SINGLE_SHOT_DELAY,
            Command::MeasureSingleShotRhtOnly => timing::SINGLE_SHOT_RHT_ONLY_DELAY,
            Command::WakeUp => timing::WAKE_UP_DELAY,
            Command::ReadMeasurement
            | Command::GetTemperatureOffset
            | Command::GetSensorAltitude
            | Command::GetAutomaticSelfCalibration
            | Command::GetDataReadyStatus
            | Command::GetSerialNumber => timing::READ_DELAY,
            _ => timing::COMMAND_DELAY,
        }
    }

    /// Short snake_case name, used in log output.
    pub const fn name(&self) -> &'static str {
        match self {
            Command::StartPeriodicMeasurement => "start_periodic_measurement",
            Command::StartLowPowerPeriodicMeasurement => "start_low_power_periodic_measurement",
            Command::ReadMeasurement => "read_measurement",
            Command::StopPeriodicMeasurement => "stop_periodic_measurement",
            Command::GetTemperatureOffset => "get_temperature_offset",
            Command::SetTemperatureOffset { .. } => "set_temperature_offset",
            Command::GetSensorAltitude => "get_sensor_altitude",
            Command::SetSensorAltitude { .. } => "set_sensor_altitude",
            Command::SetAmbientPressure { .. } => "set_ambient_pressure",
            Command::PerformForcedRecalibration { .. } => "perform_forced_recalibration",
            Command::GetAutomaticSelfCalibration => "get_automatic_self_calibration",
            Command::SetAutomaticSelfCalibration { .. } => "set_automatic_self_calibration",
            Command::GetDataReadyStatus => "get_data_ready_status",
            Command::PersistSettings => "persist_settings",
            Command::GetSerialNumber => "get_serial_number",
            Command::PerformSelfTest => "perform_self_test",
            Command::PerformFactoryReset => "perform_factory_reset",
            Command::Reinit => "reinit",
            Command::MeasureSingleShot => "measure_single_shot",
            Command::MeasureSingleShotRhtOnly => "measure_single_shot_rht_only",
            Command::PowerDown => "power_down",
            Command::WakeUp => "wake_up",
        }
    }

    /// Formats the command into the bytes written on the bus.
    pub fn format_into(&self) -> CommandBuffer {
        let mut buffer = ArrayVec::new();
        buffer.extend(self.code().to_be_bytes());
        if let Some(argument) = self.argument() {
            buffer.extend(crc::encode_word(argument));
        }
        CommandBuffer(buffer)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:#06x})", self.name(), self.code())?;
        if let Some(argument) = self.argument() {
            write!(f, " arg={}", argument)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;
    use heapless::String as HeaplessString;

    #[test]
    fn test_plain_command_formatting() {
        assert_eq!(Command::StartPeriodicMeasurement.format_into().as_bytes(), &[0x21, 0xB1]);
        assert_eq!(Command::ReadMeasurement.format_into().as_bytes(), &[0xEC, 0x05]);
        assert_eq!(Command::StopPeriodicMeasurement.format_into().as_bytes(), &[0x3F, 0x86]);
        assert_eq!(Command::GetSerialNumber.format_into().as_bytes(), &[0x36, 0x82]);
        assert_eq!(Command::WakeUp.format_into().as_bytes(), &[0x36, 0xF6]);
    }

    #[test]
    fn test_argument_command_formatting() {
        // Datasheet example: set_sensor_altitude(1950 m) -> 0x2427 0x079E 0x09
        assert_eq!(
            Command::SetSensorAltitude { meters: 1950 }.format_into().as_bytes(),
            &[0x24, 0x27, 0x07, 0x9E, 0x09]
        );
        // Datasheet example: set_temperature_offset(5.4 °C) -> 0x241D 0x07E6 0x48
        assert_eq!(
            Command::SetTemperatureOffset { ticks: 0x07E6 }.format_into().as_bytes(),
            &[0x24, 0x1D, 0x07, 0xE6, 0x48]
        );
        let asc = Command::SetAutomaticSelfCalibration { enabled: true }.format_into();
        assert_eq!(asc.len(), MAX_COMMAND_LEN);
        assert_eq!(&asc.as_bytes()[..4], &[0x24, 0x16, 0x00, 0x01]);
        assert_eq!(asc.as_bytes()[4], crc::calculate_crc8(&[0x00, 0x01]));
    }

    #[test]
    fn test_response_words() {
        assert_eq!(Command::ReadMeasurement.response_words(), 3);
        assert_eq!(Command::GetSerialNumber.response_words(), 3);
        assert_eq!(Command::GetDataReadyStatus.response_words(), 1);
        assert_eq!(Command::PerformForcedRecalibration { target_ppm: 400 }.response_words(), 1);
        assert!(!Command::StartPeriodicMeasurement.requires_response());
        assert!(!Command::SetSensorAltitude { meters: 0 }.requires_response());
    }

    #[test]
    fn test_execution_times() {
        assert_eq!(Command::StopPeriodicMeasurement.execution_time(), Duration::from_millis(500));
        assert_eq!(Command::ReadMeasurement.execution_time(), Duration::from_millis(1));
        assert_eq!(Command::PerformSelfTest.execution_time(), Duration::from_millis(5500));
        assert_eq!(Command::PersistSettings.execution_time(), Duration::from_millis(800));
        assert_eq!(Command::StartLowPowerPeriodicMeasurement.execution_time(), Duration::ZERO);
    }

    #[test]
    fn test_display() {
        let mut output = HeaplessString::<64>::new();
        write!(output, "{}", Command::ReadMeasurement).unwrap();
        assert_eq!(output.as_str(), "read_measurement (0xec05)");

        output.clear();
        write!(output, "{}", Command::SetAmbientPressure { hpa: 987 }).unwrap();
        assert_eq!(output.as_str(), "set_ambient_pressure (0xe000) arg=987");
    }
}
