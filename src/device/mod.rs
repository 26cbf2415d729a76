// src/device/mod.rs

// Blocking session
pub mod sync_device;
pub use sync_device::SyncScd4x;

// Async session
#[cfg(feature = "async")]
pub mod async_device;
#[cfg(feature = "async")]
pub use async_device::AsyncScd4x;

#[cfg(test)]
pub(crate) mod mock;
