//! pms-sens-core: Core traits, errors and constants for pms-sens.
//!
//! This crate contains the device driver contract, the Coordinator and
//! Observer capabilities, the error taxonomy, and shared constants.

pub mod constants;
mod coordinator;
mod device;
mod error;
mod observer;

pub use constants::{
    BAUD_RATE, DEFAULT_NAME, DEFAULT_SCAN_INTERVAL, DOMAIN, UPDATE_FAILED_MESSAGE,
};
pub use coordinator::{Coordinator, ScheduleHandle};
pub use device::{BoxedDevice, DecodedFrame, DeviceFactory, DeviceParams, ParticulateDevice};
pub use error::{DeviceError, RefreshError, SetupError};
pub use observer::{BoxedObserver, Observer};

// Re-export types used in trait signatures for convenience
pub use pms_sens_types::{ChannelDescriptor, ChannelValue, Reading, SensorEntryConfig, SizeSelector};
