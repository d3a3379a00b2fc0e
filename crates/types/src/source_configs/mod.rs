//! Stored setup values for the supported sensors.

pub mod pms5003;

pub use pms5003::{
    SensorEntryConfig, DEFAULT_PIN_ENABLE, DEFAULT_PIN_RESET, DEFAULT_SERIAL_DEVICE,
};
