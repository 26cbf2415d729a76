// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod address;
pub mod command;
pub mod crc;
pub mod error;
pub mod hal_traits;
pub mod response;
pub mod settings;
pub mod timing;
pub mod types;

// --- Re-export key types/traits/functions for easier access ---

// From address.rs
pub use address::Scd4xAddr;

// From command.rs
pub use command::{Command, CommandBuffer};

// From crc.rs
pub use crc::{calculate_crc8, encode_word, verify_word};

// From error.rs
pub use error::Scd4xError;

// From hal_traits.rs
pub use hal_traits::{Scd4xDelay, Scd4xI2c}; // Core sync traits

// From response.rs
pub use response::parse_words;

// From settings.rs
pub use settings::SensorSettings;

// From types.rs
pub use types::{Co2, Humidity, Measurement, PowerMode, SerialNumber, Temperature, TemperatureOffset};

// timing constants stay behind common::timing::*

// --- Feature-gated re-exports ---

// Async traits (from hal_traits.rs)
#[cfg(feature = "async")]
pub use hal_traits::{Scd4xDelayAsync, Scd4xI2cAsync};

// embedded-hal adapter (from hal_traits.rs)
#[cfg(feature = "impl-native")]
pub use hal_traits::NativeAdapter;
