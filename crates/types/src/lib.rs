//! pms-sens-types: Shared data types for the pms-sens integration.
//!
//! This crate contains pure data types (channel descriptors, readings,
//! stored setup values) that are shared across all pms-sens crates. These
//! types have no runtime or device dependencies, making them suitable as a
//! foundation layer.

pub mod channel;
pub mod reading;
pub mod source_configs;

// Re-export commonly used types at the crate root for convenience
pub use channel::{
    descriptor, ChannelDescriptor, DeviceClass, SizeSelector, StateClass, Unit, CHANNELS,
    CHANNEL_COUNT,
};
pub use reading::{ChannelValue, Reading};
pub use source_configs::SensorEntryConfig;
