//! Observer capability

use pms_sens_types::{ChannelDescriptor, ChannelValue, Reading};

/// Read-only view projecting one channel out of a reading
pub trait Observer: Send + Sync {
    /// Channel this observer shows
    fn descriptor(&self) -> &ChannelDescriptor;

    /// Value for `key` in `reading`
    ///
    /// A missing key is shown as unknown rather than treated as an error.
    fn render(&self, key: &str, reading: &Reading) -> Option<ChannelValue> {
        reading.get(key)
    }

    /// Current value of this observer's channel
    fn native_value(&self) -> Option<ChannelValue>;

    /// Whether the value is backed by a successful latest refresh
    fn available(&self) -> bool;
}

/// Type-erased observer for dynamic dispatch
pub type BoxedObserver = Box<dyn Observer>;
