//! PMS5003 setup configuration types.

use serde::{Deserialize, Serialize};

pub const DEFAULT_SERIAL_DEVICE: &str = "/dev/ttyAMA0";
pub const DEFAULT_PIN_ENABLE: &str = "GPIO22";
pub const DEFAULT_PIN_RESET: &str = "GPIO27";

fn default_serial_device() -> String {
    DEFAULT_SERIAL_DEVICE.to_string()
}

fn default_pin_enable() -> String {
    DEFAULT_PIN_ENABLE.to_string()
}

fn default_pin_reset() -> String {
    DEFAULT_PIN_RESET.to_string()
}

/// The three values collected during onboarding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorEntryConfig {
    /// Serial device path; also the identity of the physical sensor
    #[serde(default = "default_serial_device")]
    pub serial_device: String,
    /// Control line that enables the sensor module
    #[serde(default = "default_pin_enable")]
    pub pin_enable: String,
    /// Control line that resets the sensor module
    #[serde(default = "default_pin_reset")]
    pub pin_reset: String,
}

impl SensorEntryConfig {
    /// Key used to reject a second setup of the same device
    pub fn unique_id(&self) -> &str {
        &self.serial_device
    }
}

impl Default for SensorEntryConfig {
    fn default() -> Self {
        Self {
            serial_device: default_serial_device(),
            pin_enable: default_pin_enable(),
            pin_reset: default_pin_reset(),
        }
    }
}
