//! pms-sens-sources: Device backends for pms-sens.
//!
//! The production UART driver is provided by an external crate that
//! implements [`pms_sens_core::DeviceFactory`]. This crate ships the
//! simulated backend used for demos and tests, and the backend lookup used
//! by the binary.

mod simulated;

pub use simulated::{
    SimulatedDevice, SimulatedFactory, SimulatedFrame, SimulationConfig, SimulationConfigError,
    SimulationMode,
};

use pms_sens_core::DeviceFactory;
use std::sync::Arc;

/// Names accepted by [`backend`]
pub const BACKENDS: &[&str] = &["simulated"];

/// Build the device factory registered under `name`
///
/// `simulation` drives the simulated backend and is ignored by the others.
pub fn backend(name: &str, simulation: &SimulationConfig) -> Option<Arc<dyn DeviceFactory>> {
    match name {
        "simulated" => Some(Arc::new(SimulatedFactory::new(simulation.clone()))),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_lookup() {
        let simulation = SimulationConfig::default();
        for name in BACKENDS {
            let factory = backend(name, &simulation).expect("listed backend exists");
            assert_eq!(factory.name(), *name);
        }
        assert!(backend("uart-over-carrier-pigeon", &simulation).is_none());
    }

    #[test]
    fn test_simulated_backend_uses_given_config() {
        use pms_sens_core::DeviceParams;
        use pms_sens_types::{SensorEntryConfig, SizeSelector};

        let simulation = SimulationConfig {
            manual_value: 33.0,
            frame_delay_ms: 0,
            ..SimulationConfig::default()
        };
        let factory = backend("simulated", &simulation).unwrap();
        let mut device = factory
            .open(&DeviceParams::from_entry(&SensorEntryConfig::default()))
            .unwrap();
        let frame = device.read().unwrap();
        assert_eq!(frame.pm_ug_per_m3(SizeSelector::Microns(2.5), false), Some(33.0));
    }
}
