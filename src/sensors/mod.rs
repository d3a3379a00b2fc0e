//! Per-channel observers
//!
//! Each observer projects one channel out of the coordinator's cached
//! reading. Observers never touch the device.

mod channel_sensor;

pub use channel_sensor::{build_sensors, ChannelSensor, SensorState};
