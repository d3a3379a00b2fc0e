//! Device driver contract
//!
//! The UART framing and checksum handling of the sensor live in an external
//! driver. This module only describes what the coordinator needs from it.

use crate::constants::BAUD_RATE;
use crate::error::DeviceError;
use pms_sens_types::{SensorEntryConfig, SizeSelector};

/// Parameters used to open the serial connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceParams {
    /// Serial device path (e.g. `/dev/ttyAMA0`)
    pub serial_device: String,
    /// Enable control line identifier
    pub pin_enable: String,
    /// Reset control line identifier
    pub pin_reset: String,
    pub baud_rate: u32,
}

impl DeviceParams {
    /// Connection parameters for a stored entry, at the fixed baud rate
    pub fn from_entry(entry: &SensorEntryConfig) -> Self {
        Self {
            serial_device: entry.serial_device.clone(),
            pin_enable: entry.pin_enable.clone(),
            pin_reset: entry.pin_reset.clone(),
            baud_rate: BAUD_RATE,
        }
    }
}

/// One checksum-validated frame as decoded by the driver
pub trait DecodedFrame: Send {
    /// Mass concentration in µg/m³
    ///
    /// Returns `None` when the frame carries no value for the selector.
    fn pm_ug_per_m3(&self, size: SizeSelector, atmospheric: bool) -> Option<f64>;

    /// Particles at or above `size` micrometers per 0.1L of air
    fn pm_per_1l_air(&self, size: f64) -> Option<u64>;
}

/// An open sensor connection
///
/// `read` blocks until a complete frame arrives or the driver's own timeout
/// elapses, in which case it fails with [`DeviceError::ReadTimeout`] or
/// [`DeviceError::SerialTimeout`].
pub trait ParticulateDevice: Send {
    fn read(&mut self) -> Result<Box<dyn DecodedFrame>, DeviceError>;
}

/// Type-erased device handle
pub type BoxedDevice = Box<dyn ParticulateDevice>;

/// Opens device handles
///
/// Opening may block (it touches the serial port and control lines), so
/// callers run it off the async executor.
pub trait DeviceFactory: Send + Sync {
    /// Short backend name used in logs
    fn name(&self) -> &str;

    fn open(&self, params: &DeviceParams) -> Result<BoxedDevice, DeviceError>;
}
