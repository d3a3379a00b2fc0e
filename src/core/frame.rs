//! Translation of a decoded frame into a reading

use chrono::{DateTime, Utc};
use pms_sens_core::DecodedFrame;
use pms_sens_types::{ChannelDescriptor, ChannelValue, Reading, CHANNELS, CHANNEL_COUNT};
use std::collections::HashMap;

/// Derive one channel from a frame
fn channel_value(frame: &dyn DecodedFrame, channel: &ChannelDescriptor) -> Option<ChannelValue> {
    if channel.particle_count {
        let threshold = channel.size.microns()?;
        frame.pm_per_1l_air(threshold).map(ChannelValue::Count)
    } else {
        frame
            .pm_ug_per_m3(channel.size, channel.atmospheric)
            .map(ChannelValue::Concentration)
    }
}

/// Build a reading holding every channel key
///
/// Channels the frame does not report are stored as `None`.
pub fn reading_from_frame(frame: &dyn DecodedFrame, taken_at: DateTime<Utc>) -> Reading {
    let mut values = HashMap::with_capacity(CHANNEL_COUNT);
    for channel in CHANNELS.iter() {
        values.insert(channel.key.to_string(), channel_value(frame, channel));
    }
    Reading::new(values, taken_at)
}
