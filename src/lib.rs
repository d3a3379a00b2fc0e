//! pms-sens: Polling integration for the Plantower PMS5003 particulate sensor
//!
//! This library provides:
//! - A polling coordinator that owns the serial device and caches the latest reading
//! - Per-channel observers that project the cached reading for display
//! - Configuration storage and onboarding validation
//! - Bootstrap that wires the pieces together for a configured entry

pub mod config;
pub mod core;
pub mod sensors;
pub mod setup;

// Re-export commonly used types
pub use config::{AppConfig, ConfigEntry};
pub use crate::core::PollingCoordinator;
pub use sensors::ChannelSensor;
pub use setup::{setup_entry, SensorPlatform};
