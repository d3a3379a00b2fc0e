//! Observer for a single measurement channel

use pms_sens_core::{ChannelDescriptor, ChannelValue, Coordinator, Observer};
use pms_sens_types::{DeviceClass, StateClass, CHANNELS};
use serde::Serialize;
use std::sync::Arc;

/// Read-only view of one channel
pub struct ChannelSensor {
    coordinator: Arc<dyn Coordinator>,
    descriptor: &'static ChannelDescriptor,
    unique_id: String,
}

/// Point-in-time view of a sensor, as handed to the display layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorState {
    pub unique_id: String,
    pub key: &'static str,
    pub name: &'static str,
    pub value: Option<ChannelValue>,
    pub unit: &'static str,
    pub device_class: Option<DeviceClass>,
    pub state_class: StateClass,
    pub icon: Option<&'static str>,
    pub available: bool,
}

impl ChannelSensor {
    pub fn new(
        coordinator: Arc<dyn Coordinator>,
        descriptor: &'static ChannelDescriptor,
        entry_id: &str,
    ) -> Self {
        Self {
            coordinator,
            descriptor,
            unique_id: format!("{}_{}", entry_id, descriptor.key),
        }
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn key(&self) -> &'static str {
        self.descriptor.key
    }

    pub fn name(&self) -> &'static str {
        self.descriptor.name
    }

    pub fn state(&self) -> SensorState {
        SensorState {
            unique_id: self.unique_id.clone(),
            key: self.descriptor.key,
            name: self.descriptor.name,
            value: self.native_value(),
            unit: self.descriptor.unit.symbol(),
            device_class: self.descriptor.device_class,
            state_class: self.descriptor.state_class,
            icon: self.descriptor.icon,
            available: self.available(),
        }
    }
}

impl Observer for ChannelSensor {
    fn descriptor(&self) -> &ChannelDescriptor {
        self.descriptor
    }

    fn native_value(&self) -> Option<ChannelValue> {
        let reading = self.coordinator.get_latest()?;
        self.render(self.descriptor.key, &reading)
    }

    fn available(&self) -> bool {
        self.coordinator.last_update_success()
    }
}

/// One observer per channel, all sharing `coordinator`
pub fn build_sensors(coordinator: &Arc<dyn Coordinator>, entry_id: &str) -> Vec<ChannelSensor> {
    CHANNELS
        .iter()
        .map(|descriptor| ChannelSensor::new(Arc::clone(coordinator), descriptor, entry_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use arc_swap::ArcSwapOption;
    use async_trait::async_trait;
    use chrono::Utc;
    use pms_sens_core::{RefreshError, ScheduleHandle, SetupError};
    use pms_sens_types::Reading;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    /// Coordinator serving whatever snapshot the test stores
    struct FixedCoordinator {
        latest: ArcSwapOption<Reading>,
        success: AtomicBool,
    }

    #[async_trait]
    impl Coordinator for FixedCoordinator {
        async fn refresh_once(&self) -> Result<Arc<Reading>, RefreshError> {
            unimplemented!("observers never refresh")
        }

        async fn first_refresh(&self) -> Result<(), SetupError> {
            Ok(())
        }

        fn get_latest(&self) -> Option<Arc<Reading>> {
            self.latest.load_full()
        }

        fn last_update_success(&self) -> bool {
            self.success.load(Ordering::Acquire)
        }

        fn update_interval(&self) -> Duration {
            Duration::from_secs(30)
        }

        fn schedule(self: Arc<Self>) -> ScheduleHandle {
            ScheduleHandle::new(tokio::spawn(async {}))
        }
    }

    fn fixed(values: &[(&str, Option<ChannelValue>)]) -> Arc<FixedCoordinator> {
        let values: HashMap<_, _> = values.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        Arc::new(FixedCoordinator {
            latest: ArcSwapOption::from_pointee(Reading::new(values, Utc::now())),
            success: AtomicBool::new(true),
        })
    }

    #[test]
    fn test_one_sensor_per_channel() {
        let coordinator: Arc<dyn Coordinator> = fixed(&[]);
        let sensors = build_sensors(&coordinator, "entry1");
        assert_eq!(sensors.len(), CHANNELS.len());
        assert_eq!(sensors[0].unique_id(), "entry1_pm1_0");
        assert_eq!(sensors[11].unique_id(), "entry1_particles_10");
    }

    #[test]
    fn test_sensors_read_shared_snapshot() {
        let coordinator = fixed(&[
            ("pm2_5", Some(ChannelValue::Concentration(10.0))),
            ("particles_0_5", Some(ChannelValue::Count(80))),
        ]);
        let shared: Arc<dyn Coordinator> = coordinator.clone();
        let sensors = build_sensors(&shared, "e");
        let by_key = |key: &str| sensors.iter().find(|s| s.key() == key).unwrap();

        assert_eq!(by_key("pm2_5").native_value(), Some(ChannelValue::Concentration(10.0)));
        assert_eq!(by_key("particles_0_5").native_value(), Some(ChannelValue::Count(80)));
        // Missing keys degrade to unknown
        assert_eq!(by_key("pm10").native_value(), None);

        coordinator.latest.store(None);
        assert_eq!(by_key("pm2_5").native_value(), None);
    }

    #[test]
    fn test_availability_follows_last_refresh() {
        let coordinator = fixed(&[("pm1_0", Some(ChannelValue::Concentration(1.0)))]);
        let shared: Arc<dyn Coordinator> = coordinator.clone();
        let sensor = ChannelSensor::new(shared, &CHANNELS[0], "e");
        assert!(sensor.state().available);

        coordinator.success.store(false, Ordering::Release);
        let state = sensor.state();
        assert!(!state.available);
        // The last good value is still shown
        assert_eq!(state.value, Some(ChannelValue::Concentration(1.0)));
    }

    #[test]
    fn test_state_json() {
        let coordinator: Arc<dyn Coordinator> =
            fixed(&[("particles_0_3", Some(ChannelValue::Count(100)))]);
        let sensor = ChannelSensor::new(coordinator, &CHANNELS[6], "e");
        let json = serde_json::to_value(sensor.state()).unwrap();
        assert_eq!(json["key"], "particles_0_3");
        assert_eq!(json["value"], 100);
        assert_eq!(json["unit"], "particles/0.1L");
        assert_eq!(json["icon"], "mdi:blur");
        assert!(json["device_class"].is_null());
    }
}
