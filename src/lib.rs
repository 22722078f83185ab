//! Typed control layer for LAN-connected Airton air conditioners
//!
//! This crate sits between an encrypted LAN protocol client and a plugin
//! host, turning the firmware's untyped data-point map into a typed state
//! and keeping host widgets in sync with the physical unit.
//!
//! # Features
//!
//! - Bidirectional codec between raw data points and [`AcState`]
//! - Constraint engine that drops commands the firmware would silently
//!   ignore in the current operating mode
//! - Minimal-diff update orchestration with read-back confirmation
//! - Widget synchronization for switches, selectors, set points and sensors
//! - Moving-average and debounce preprocessing for noisy readings
//! - Heartbeat coalescing and optional command batching
//!
//! The LAN transport itself is out of scope: implement [`TuyaClient`] with
//! your protocol crate of choice and hand it to
//! [`plugin::PluginSession::start`].

pub mod config;
pub mod constraints;
pub mod device;
pub mod error;
pub mod filters;
pub mod plugin;
pub mod protocol;
pub mod state;

// Test support - available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

// Re-export main types for convenience
pub use config::{DeviceConfig, PluginConfig};
pub use device::AcDevice;
pub use error::{AcError, Result};
pub use protocol::{DataPoint, RawState, RawValue, TuyaClient};
pub use state::{AcState, FanSpeed, Mode, Offsets};
