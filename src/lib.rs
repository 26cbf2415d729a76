// src/lib.rs

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod common;
pub mod device;

#[cfg(feature = "linux")]
pub mod linux;

// Re-export key types for convenience
pub use common::{Measurement, PowerMode, Scd4xAddr, Scd4xError, SerialNumber};
pub use device::SyncScd4x;

#[cfg(feature = "async")]
pub use device::AsyncScd4x;
