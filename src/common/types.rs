// src/common/types.rs

use core::fmt;
use core::time::Duration;

use super::{command::Command, timing};

// All conversions follow the datasheet's linear formulas with a 2^16 divisor.
const TICK_SCALE: f32 = 65536.0;

/// Rounds a non-negative value to the nearest tick, `None` if it does not fit
/// in a word (or is NaN).
fn round_to_ticks(value: f32) -> Option<u16> {
    if value >= -0.5 && value < 65535.5 {
        Some((value + 0.5) as u16)
    } else {
        None
    }
}

/// CO2 concentration. The raw word already is the value in ppm.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Co2 {
    ticks: u16,
}

impl Co2 {
    pub const fn from_ticks(ticks: u16) -> Self {
        Self { ticks }
    }

    pub const fn ticks(&self) -> u16 {
        self.ticks
    }

    pub const fn ppm(&self) -> u16 {
        self.ticks
    }
}

impl fmt::Display for Co2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ppm", self.ppm())
    }
}

/// Ambient temperature: `-45 + 175 * ticks / 2^16` °C.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Temperature {
    ticks: u16,
}

impl Temperature {
    pub const fn from_ticks(ticks: u16) -> Self {
        Self { ticks }
    }

    /// Inverse of [`Temperature::degrees_celsius`]. `None` outside the
    /// representable range of -45 °C to 130 °C.
    pub fn from_degrees_celsius(celsius: f32) -> Option<Self> {
        round_to_ticks((celsius + 45.0) * TICK_SCALE / 175.0).map(Self::from_ticks)
    }

    pub const fn ticks(&self) -> u16 {
        self.ticks
    }

    pub fn degrees_celsius(&self) -> f32 {
        -45.0 + 175.0 * f32::from(self.ticks) / TICK_SCALE
    }

    pub fn degrees_fahrenheit(&self) -> f32 {
        32.0 + self.degrees_celsius() * 9.0 / 5.0
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} °C", self.degrees_celsius())
    }
}

/// Relative humidity: `100 * ticks / 2^16` %RH.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Humidity {
    ticks: u16,
}

impl Humidity {
    pub const fn from_ticks(ticks: u16) -> Self {
        Self { ticks }
    }

    /// Inverse of [`Humidity::percent_rh`]. `None` outside 0 to 100 %RH.
    pub fn from_percent_rh(percent: f32) -> Option<Self> {
        round_to_ticks(percent * TICK_SCALE / 100.0).map(Self::from_ticks)
    }

    pub const fn ticks(&self) -> u16 {
        self.ticks
    }

    pub fn percent_rh(&self) -> f32 {
        100.0 * f32::from(self.ticks) / TICK_SCALE
    }
}

impl fmt::Display for Humidity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} %RH", self.percent_rh())
    }
}

/// Temperature offset applied by the sensor: `175 * ticks / 2^16` °C.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TemperatureOffset {
    ticks: u16,
}

impl TemperatureOffset {
    pub const fn from_ticks(ticks: u16) -> Self {
        Self { ticks }
    }

    /// Builds the offset sent by `set_temperature_offset`. Negative offsets
    /// cannot be represented.
    pub fn from_degrees_celsius(celsius: f32) -> Option<Self> {
        round_to_ticks(celsius * TICK_SCALE / 175.0).map(Self::from_ticks)
    }

    pub const fn ticks(&self) -> u16 {
        self.ticks
    }

    pub fn degrees_celsius(&self) -> f32 {
        175.0 * f32::from(self.ticks) / TICK_SCALE
    }

    pub fn degrees_fahrenheit(&self) -> f32 {
        32.0 + self.degrees_celsius() * 9.0 / 5.0
    }
}

impl fmt::Display for TemperatureOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} °C", self.degrees_celsius())
    }
}

/// One sample produced by `read_measurement`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Measurement {
    pub co2: Co2,
    pub temperature: Temperature,
    pub humidity: Humidity,
}

impl Measurement {
    /// Builds a measurement from the three raw words in bus order.
    pub const fn from_words(words: [u16; 3]) -> Self {
        Measurement {
            co2: Co2::from_ticks(words[0]),
            temperature: Temperature::from_ticks(words[1]),
            humidity: Humidity::from_ticks(words[2]),
        }
    }

    /// The raw words in bus order.
    pub const fn to_words(&self) -> [u16; 3] {
        [self.co2.ticks(), self.temperature.ticks(), self.humidity.ticks()]
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} CO2, {}, {}", self.co2, self.temperature, self.humidity)
    }
}

/// Periodic measurement power mode. Affects the signal update interval and
/// the energy consumption.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PowerMode {
    /// Measures every 5 seconds.
    #[default]
    High,
    /// Measures every 30 seconds.
    Low,
}

impl PowerMode {
    pub const fn measurement_interval(&self) -> Duration {
        match self {
            PowerMode::High => timing::HIGH_POWER_INTERVAL,
            PowerMode::Low => timing::LOW_POWER_INTERVAL,
        }
    }

    pub const fn start_command(&self) -> Command {
        match self {
            PowerMode::High => Command::StartPeriodicMeasurement,
            PowerMode::Low => Command::StartLowPowerPeriodicMeasurement,
        }
    }
}

/// 48-bit unique serial number of the sensor.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SerialNumber(u64);

impl SerialNumber {
    pub const fn from_words(words: [u16; 3]) -> Self {
        SerialNumber((words[0] as u64) << 32 | (words[1] as u64) << 16 | words[2] as u64)
    }

    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
