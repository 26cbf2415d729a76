// src/bin/scd4x_poll.rs

use clap::Parser;
use miette::{Context, IntoDiagnostic};
use scd4x::{common::SensorSettings, linux::LinuxI2c, PowerMode, Scd4xAddr, SyncScd4x};
use std::{path::PathBuf, thread};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{filter::Targets, prelude::*};

/// Periodically reads CO2, temperature and humidity from an SCD4x sensor.
#[derive(Parser)]
#[command(
    author,
    version,
    about,
    long_about = None,
    after_help = "Only sensors on a Linux I2C bus are supported; the SensorBridge USB transport (--serial-port) is not."
)]
struct Args {
    /// path to the i2c-dev bus the sensor is attached to.
    #[arg(short = 'p', long, env = "SCD4X_I2C_PORT", default_value = "/dev/i2c-1")]
    i2c_port: PathBuf,

    /// 7-bit bus address of the sensor, decimal or `0x`-prefixed hex.
    #[arg(long, default_value = "0x62", value_parser = parse_address)]
    address: Scd4xAddr,

    /// number of measurements to read before stopping.
    #[arg(short, long, default_value_t = 60)]
    count: u32,

    /// measure in low power mode (30 s interval instead of 5 s).
    #[arg(long)]
    low_power: bool,

    /// temperature offset in °C to configure before measuring.
    #[arg(long)]
    temperature_offset: Option<f32>,

    /// sensor altitude in meters above sea level.
    #[arg(long)]
    altitude: Option<u16>,

    /// enable or disable automatic self calibration.
    #[arg(long)]
    asc: Option<bool>,

    /// store the configuration in the sensor's EEPROM.
    #[arg(long)]
    persist: bool,

    /// a comma-separated list of `tracing` targets and levels to enable.
    ///
    /// for example, `info,scd4x=trace` logs every bus transaction.
    #[arg(
        long = "trace",
        env = "SCD4X_TRACE",
        default_value_t = Targets::new().with_default(LevelFilter::INFO),
    )]
    trace_filter: Targets,
}

fn parse_address(s: &str) -> Result<Scd4xAddr, String> {
    let raw = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse(),
    }
    .map_err(|e| e.to_string())?;
    Scd4xAddr::new(raw).map_err(|e| e.to_string())
}

fn main() -> miette::Result<()> {
    let Args {
        i2c_port,
        address,
        count,
        low_power,
        temperature_offset,
        altitude,
        asc,
        persist,
        trace_filter,
    } = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_filter(trace_filter))
        .init();

    let bus = LinuxI2c::open(&i2c_port, address)
        .into_diagnostic()
        .with_context(|| format!("failed to open {} at {address}", i2c_port.display()))?;
    let mut sensor = SyncScd4x::with_address(bus, address);

    // A previous run may have left the sensor measuring.
    sensor
        .stop_periodic_measurement()
        .into_diagnostic()
        .context("failed to stop periodic measurement")?;

    let serial = sensor
        .read_serial_number()
        .into_diagnostic()
        .context("failed to read serial number")?;
    println!("serial number: {serial}");

    let settings = SensorSettings {
        temperature_offset,
        altitude,
        ambient_pressure: None,
        automatic_self_calibration: asc,
    };
    if !settings.is_empty() {
        sensor
            .apply_settings(&settings)
            .into_diagnostic()
            .context("failed to configure sensor")?;
        tracing::info!(?settings, "configured");
    }
    if persist {
        sensor
            .persist_settings()
            .into_diagnostic()
            .context("failed to persist settings")?;
    }

    let mode = if low_power { PowerMode::Low } else { PowerMode::High };
    sensor
        .start_periodic_measurement_in(mode)
        .into_diagnostic()
        .context("failed to start periodic measurement")?;
    tracing::info!(?mode, count, "measuring");

    for i in 0..count {
        thread::sleep(mode.measurement_interval());
        match sensor.read_measurement() {
            Ok(m) => println!("{:>4}: {m}", i + 1),
            Err(error) => tracing::warn!(%error, "read failed"),
        }
    }

    sensor
        .stop_periodic_measurement()
        .into_diagnostic()
        .context("failed to stop periodic measurement")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
        let help = Args::command().render_help().to_string();
        assert!(help.contains("--serial-port) is not"));
    }

    #[test]
    fn test_parse_address() {
        assert_eq!(parse_address("0x62"), Ok(Scd4xAddr::DEFAULT_ADDRESS));
        assert_eq!(parse_address("98").map(|a| a.as_u8()), Ok(0x62));
        assert!(parse_address("0x80").is_err());
        assert!(parse_address("sixty").is_err());
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["scd4x-poll"]).unwrap();
        assert_eq!(args.address, Scd4xAddr::DEFAULT_ADDRESS);
        assert_eq!(args.count, 60);
        assert!(!args.low_power);
        assert_eq!(args.asc, None);
    }
}
