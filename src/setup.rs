//! Bootstrap of a configured entry
//!
//! Builds the coordinator from the stored values, runs the first refresh,
//! hands the coordinator to one observer per channel and starts the
//! schedule. Nothing is registered globally; the caller owns the result.

use crate::config::ConfigEntry;
use crate::core::PollingCoordinator;
use crate::sensors::{build_sensors, ChannelSensor};
use log::info;
use pms_sens_core::{Coordinator, DeviceFactory, DeviceParams, ScheduleHandle, SetupError};
use std::sync::Arc;
use std::time::Duration;

/// Everything set up for one entry
pub struct SensorPlatform {
    pub coordinator: Arc<PollingCoordinator>,
    pub sensors: Vec<ChannelSensor>,
    schedule: ScheduleHandle,
}

impl SensorPlatform {
    /// Stop the refresh schedule
    pub fn unload(self) {
        self.schedule.stop();
        info!("Unloaded {}", self.coordinator.name());
    }
}

/// Set up `entry` with the scan interval fixed for the product
pub async fn setup_entry(
    entry: &ConfigEntry,
    factory: Arc<dyn DeviceFactory>,
) -> Result<SensorPlatform, SetupError> {
    let coordinator = PollingCoordinator::new(DeviceParams::from_entry(&entry.data), factory);
    finish_setup(entry, coordinator).await
}

/// Set up `entry` refreshing every `interval`
pub async fn setup_entry_with_interval(
    entry: &ConfigEntry,
    factory: Arc<dyn DeviceFactory>,
    interval: Duration,
) -> Result<SensorPlatform, SetupError> {
    let coordinator =
        PollingCoordinator::with_interval(DeviceParams::from_entry(&entry.data), factory, interval);
    finish_setup(entry, coordinator).await
}

async fn finish_setup(
    entry: &ConfigEntry,
    coordinator: PollingCoordinator,
) -> Result<SensorPlatform, SetupError> {
    let coordinator = Arc::new(coordinator);

    // Fail fast: a sensor that cannot be read now is not set up at all
    coordinator.first_refresh().await?;

    let shared: Arc<dyn Coordinator> = coordinator.clone();
    let sensors = build_sensors(&shared, &entry.entry_id);
    let schedule = Arc::clone(&coordinator).schedule();

    info!(
        "Set up {} ({} sensors, refresh every {:?})",
        entry.title,
        sensors.len(),
        coordinator.update_interval()
    );

    Ok(SensorPlatform {
        coordinator,
        sensors,
        schedule,
    })
}
