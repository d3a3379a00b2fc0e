//! Static channel metadata for the twelve PMS5003 measurement channels

use serde::Serialize;
use std::fmt;

/// Number of channels a complete reading carries
pub const CHANNEL_COUNT: usize = 12;

/// Particle diameter selector handed to the device driver
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeSelector {
    /// Particles up to (or, for counts, at or above) this diameter in micrometers
    Microns(f64),
    /// No upper bound. The driver reports atmospheric PM10 through this selector.
    Unbounded,
}

impl SizeSelector {
    /// Diameter in micrometers, if bounded
    pub fn microns(&self) -> Option<f64> {
        match self {
            SizeSelector::Microns(size) => Some(*size),
            SizeSelector::Unbounded => None,
        }
    }
}

impl fmt::Display for SizeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeSelector::Microns(size) => write!(f, "{}µm", size),
            SizeSelector::Unbounded => write!(f, "unbounded"),
        }
    }
}

/// Unit of measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Unit {
    #[serde(rename = "µg/m³")]
    MicrogramsPerCubicMeter,
    #[serde(rename = "particles/0.1L")]
    ParticlesPerDeciliter,
}

impl Unit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::MicrogramsPerCubicMeter => "µg/m³",
            Unit::ParticlesPerDeciliter => "particles/0.1L",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Standardized device classification understood by display layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Pm1,
    Pm25,
    Pm10,
}

/// How the host should treat successive values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateClass {
    Measurement,
}

/// Metadata describing a single measurement channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChannelDescriptor {
    /// Unique key of the channel inside a reading
    pub key: &'static str,
    /// Human-readable name
    pub name: &'static str,
    pub unit: Unit,
    pub device_class: Option<DeviceClass>,
    pub state_class: StateClass,
    pub icon: Option<&'static str>,
    /// Diameter selector passed to the driver when deriving this channel
    pub size: SizeSelector,
    /// Atmospheric (rather than standard) concentration weighting
    pub atmospheric: bool,
    /// Particle count per 0.1L instead of mass concentration
    pub particle_count: bool,
}

impl ChannelDescriptor {
    const fn concentration(
        key: &'static str,
        name: &'static str,
        device_class: DeviceClass,
        size: SizeSelector,
        atmospheric: bool,
    ) -> Self {
        Self {
            key,
            name,
            unit: Unit::MicrogramsPerCubicMeter,
            device_class: Some(device_class),
            state_class: StateClass::Measurement,
            icon: None,
            size,
            atmospheric,
            particle_count: false,
        }
    }

    const fn count(key: &'static str, name: &'static str, threshold: f64) -> Self {
        Self {
            key,
            name,
            unit: Unit::ParticlesPerDeciliter,
            device_class: None,
            state_class: StateClass::Measurement,
            icon: Some("mdi:blur"),
            size: SizeSelector::Microns(threshold),
            atmospheric: false,
            particle_count: true,
        }
    }
}

/// The fixed channel table, in display order
pub static CHANNELS: [ChannelDescriptor; CHANNEL_COUNT] = [
    // PM concentration (standard factory environment)
    ChannelDescriptor::concentration("pm1_0", "PM1.0", DeviceClass::Pm1, SizeSelector::Microns(1.0), false),
    ChannelDescriptor::concentration("pm2_5", "PM2.5", DeviceClass::Pm25, SizeSelector::Microns(2.5), false),
    ChannelDescriptor::concentration("pm10", "PM10", DeviceClass::Pm10, SizeSelector::Microns(10.0), false),
    // PM concentration (atmospheric environment)
    ChannelDescriptor::concentration("pm1_0_atm", "PM1.0 Atmospheric", DeviceClass::Pm1, SizeSelector::Microns(1.0), true),
    ChannelDescriptor::concentration("pm2_5_atm", "PM2.5 Atmospheric", DeviceClass::Pm25, SizeSelector::Microns(2.5), true),
    ChannelDescriptor::concentration("pm10_atm", "PM10 Atmospheric", DeviceClass::Pm10, SizeSelector::Unbounded, true),
    // Particle counts per 0.1L air
    ChannelDescriptor::count("particles_0_3", "Particles >0.3µm", 0.3),
    ChannelDescriptor::count("particles_0_5", "Particles >0.5µm", 0.5),
    ChannelDescriptor::count("particles_1_0", "Particles >1.0µm", 1.0),
    ChannelDescriptor::count("particles_2_5", "Particles >2.5µm", 2.5),
    ChannelDescriptor::count("particles_5_0", "Particles >5.0µm", 5.0),
    ChannelDescriptor::count("particles_10", "Particles >10µm", 10.0),
];

/// Look up a channel descriptor by key
pub fn descriptor(key: &str) -> Option<&'static ChannelDescriptor> {
    CHANNELS.iter().find(|d| d.key == key)
}
