// src/common/settings.rs

use super::command::Command;
use super::error::Scd4xError;
use super::types::TemperatureOffset;
use arrayvec::ArrayVec;

/// Sensor configuration applied in idle mode before measuring.
///
/// Fields left as `None` keep whatever the sensor currently holds. Values
/// live in RAM on the sensor until `persist_settings` is issued.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct SensorSettings {
    /// Temperature offset in °C (default on the sensor: 4 °C).
    pub temperature_offset: Option<f32>,
    /// Sensor altitude in meters above sea level.
    pub altitude: Option<u16>,
    /// Ambient pressure in hPa; overrides altitude compensation.
    pub ambient_pressure: Option<u16>,
    pub automatic_self_calibration: Option<bool>,
}

impl SensorSettings {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// The write commands needed to apply these settings, in the order they
    /// are sent.
    pub fn commands<E>(&self) -> Result<ArrayVec<Command, 4>, Scd4xError<E>>
    where
        E: core::fmt::Debug,
    {
        let mut commands = ArrayVec::new();
        if let Some(celsius) = self.temperature_offset {
            let offset = TemperatureOffset::from_degrees_celsius(celsius)
                .ok_or(Scd4xError::ArgumentOutOfRange)?;
            commands.push(Command::SetTemperatureOffset { ticks: offset.ticks() });
        }
        if let Some(meters) = self.altitude {
            commands.push(Command::SetSensorAltitude { meters });
        }
        if let Some(hpa) = self.ambient_pressure {
            commands.push(Command::SetAmbientPressure { hpa });
        }
        if let Some(enabled) = self.automatic_self_calibration {
            commands.push(Command::SetAutomaticSelfCalibration { enabled });
        }
        Ok(commands)
    }
}
