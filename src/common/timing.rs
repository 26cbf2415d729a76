// src/common/timing.rs

use core::time::Duration;

// Execution times are the maximum values from the SCD4x datasheet (Table 9).
// The driver waits these after writing a command: before the read phase for
// commands with a response, otherwise before returning to the caller.

// === Read delays ===

/// Delay between the command write and the response read for plain getters.
pub const READ_DELAY: Duration = Duration::from_millis(1);
/// Forced recalibration computes its correction before answering.
pub const FORCED_RECALIBRATION_DELAY: Duration = Duration::from_millis(400);
/// The self test runs a full measurement internally.
pub const SELF_TEST_DELAY: Duration = Duration::from_millis(5500);

// === Post-processing times ===

/// Default post-processing time for configuration writes and start commands.
pub const COMMAND_DELAY: Duration = Duration::from_millis(1);
/// Sensor needs this long after `stop_periodic_measurement` before it
/// accepts any other command.
pub const STOP_PERIODIC_MEASUREMENT_DELAY: Duration = Duration::from_millis(500);
/// EEPROM write time for `persist_settings` and `perform_factory_reset`.
pub const EEPROM_WRITE_DELAY: Duration = Duration::from_millis(800);
/// Reloading user settings from EEPROM.
pub const REINIT_DELAY: Duration = Duration::from_millis(20);
/// On-demand CO2, temperature and humidity measurement.
pub const SINGLE_SHOT_DELAY: Duration = Duration::from_millis(1350);
/// On-demand temperature and humidity only measurement.
pub const SINGLE_SHOT_RHT_ONLY_DELAY: Duration = Duration::from_millis(50);
/// Sleep to idle transition.
pub const WAKE_UP_DELAY: Duration = Duration::from_millis(20);

// === Measurement cadence ===

/// Signal update interval in high power periodic mode.
pub const HIGH_POWER_INTERVAL: Duration = Duration::from_secs(5);
/// Signal update interval in low power periodic mode.
pub const LOW_POWER_INTERVAL: Duration = Duration::from_secs(30);

/// Converts a delay constant into the millisecond count handed to the
/// delay provider.
#[inline]
pub const fn as_millis_u32(delay: Duration) -> u32 {
    delay.as_millis() as u32
}
