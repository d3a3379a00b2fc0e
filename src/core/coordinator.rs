//! Polling coordinator - one device, one cached reading, many readers
//!
//! The coordinator owns the lazily opened device handle and the last good
//! reading. Refreshes are serialized by a single gate, so the serial link
//! never sees two transactions at once. The blocking device read runs on
//! tokio's blocking pool and the result is published with a single atomic
//! pointer swap, so readers never see a half-updated reading.

use super::frame::reading_from_frame;
use super::update_manager;
use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use chrono::Utc;
use log::{debug, error, info, warn};
use pms_sens_core::{
    BoxedDevice, Coordinator, DeviceError, DeviceFactory, DeviceParams, RefreshError,
    ScheduleHandle, SetupError, DEFAULT_SCAN_INTERVAL, DOMAIN, UPDATE_FAILED_MESSAGE,
};
use pms_sens_types::Reading;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Result of one scheduled tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Refreshed,
    Failed,
    /// Another refresh held the device; nothing was done
    Skipped,
}

/// Lazily opened device slot
///
/// Only touched from inside the refresh gate, on a blocking worker thread.
type DeviceSlot = Arc<Mutex<Option<BoxedDevice>>>;

pub struct PollingCoordinator {
    name: String,
    params: DeviceParams,
    factory: Arc<dyn DeviceFactory>,
    update_interval: Duration,
    device: DeviceSlot,
    /// Held for the whole of a refresh
    refresh_gate: tokio::sync::Mutex<()>,
    latest: ArcSwapOption<Reading>,
    last_update_success: AtomicBool,
}

impl PollingCoordinator {
    /// Coordinator refreshing at the fixed scan interval
    pub fn new(params: DeviceParams, factory: Arc<dyn DeviceFactory>) -> Self {
        Self::with_interval(params, factory, DEFAULT_SCAN_INTERVAL)
    }

    pub fn with_interval(
        params: DeviceParams,
        factory: Arc<dyn DeviceFactory>,
        update_interval: Duration,
    ) -> Self {
        Self {
            name: format!("{} {}", DOMAIN, params.serial_device),
            params,
            factory,
            update_interval,
            device: Arc::new(Mutex::new(None)),
            refresh_gate: tokio::sync::Mutex::new(()),
            latest: ArcSwapOption::const_empty(),
            last_update_success: AtomicBool::new(true),
        }
    }

    /// Name used in log messages
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &DeviceParams {
        &self.params
    }

    /// Whether the device handle has been opened
    pub fn device_open(&self) -> bool {
        self.device
            .lock()
            .map(|slot| slot.is_some())
            .unwrap_or(false)
    }

    /// Scheduled refresh: skip instead of waiting when a refresh is running
    pub async fn tick(&self) -> TickOutcome {
        let Ok(_gate) = self.refresh_gate.try_lock() else {
            return TickOutcome::Skipped;
        };
        match self.refresh_locked().await {
            Ok(_) => TickOutcome::Refreshed,
            Err(_) => TickOutcome::Failed,
        }
    }

    /// Refresh body; the caller holds the refresh gate
    async fn refresh_locked(&self) -> Result<Arc<Reading>, RefreshError> {
        let device = Arc::clone(&self.device);
        let factory = Arc::clone(&self.factory);
        let params = self.params.clone();

        let result = tokio::task::spawn_blocking(move || {
            read_sensor(&device, factory.as_ref(), &params)
        })
        .await
        .unwrap_or_else(|e| {
            Err(RefreshError::UpdateFailed {
                message: UPDATE_FAILED_MESSAGE.to_string(),
                source: DeviceError::Driver(format!("device worker failed: {}", e)),
            })
        });

        match result {
            Ok(reading) => {
                let reading = Arc::new(reading);
                self.latest.store(Some(Arc::clone(&reading)));
                if !self.last_update_success.swap(true, Ordering::AcqRel) {
                    info!("Fetching {} data recovered", self.name);
                }
                Ok(reading)
            }
            Err(err) => {
                // Previous reading stays cached; the next tick retries
                if self.last_update_success.swap(false, Ordering::AcqRel) {
                    if err.is_timeout() {
                        debug!("Fetching {} data timed out: {}", self.name, err);
                    } else {
                        error!("Error fetching {} data: {}", self.name, err);
                    }
                } else {
                    debug!("Fetching {} data still failing: {}", self.name, err);
                }
                Err(err)
            }
        }
    }
}

/// Open the device on first use, read one frame and translate it
///
/// Runs on a blocking worker thread.
fn read_sensor(
    slot: &Mutex<Option<BoxedDevice>>,
    factory: &dyn DeviceFactory,
    params: &DeviceParams,
) -> Result<Reading, RefreshError> {
    // Recover from a poisoned mutex; the handle itself is still usable
    let mut slot = slot.lock().unwrap_or_else(|poisoned| {
        warn!("Device slot mutex was poisoned, recovering");
        poisoned.into_inner()
    });

    let frame = match slot.as_mut() {
        Some(device) => device.read(),
        None => {
            info!(
                "Opening PMS5003 on {} at {} baud via {} backend",
                params.serial_device,
                params.baud_rate,
                factory.name()
            );
            // Construction failures are never reported as read timeouts
            let mut device = factory.open(params).map_err(|e| RefreshError::UpdateFailed {
                message: UPDATE_FAILED_MESSAGE.to_string(),
                source: e,
            })?;
            let frame = device.read();
            *slot = Some(device);
            frame
        }
    };

    match frame {
        Ok(frame) => Ok(reading_from_frame(frame.as_ref(), Utc::now())),
        Err(err) => {
            if err.is_timeout() {
                warn!("PMS5003 read timeout: {}", err);
            }
            Err(RefreshError::from_device(err, UPDATE_FAILED_MESSAGE))
        }
    }
}

#[async_trait]
impl Coordinator for PollingCoordinator {
    async fn refresh_once(&self) -> Result<Arc<Reading>, RefreshError> {
        let _gate = self.refresh_gate.lock().await;
        self.refresh_locked().await
    }

    async fn first_refresh(&self) -> Result<(), SetupError> {
        match self.refresh_once().await {
            Ok(_) => Ok(()),
            Err(err) => {
                error!("Initial refresh of {} failed: {}", self.name, err);
                Err(SetupError::NotReady(err))
            }
        }
    }

    fn get_latest(&self) -> Option<Arc<Reading>> {
        self.latest.load_full()
    }

    fn last_update_success(&self) -> bool {
        self.last_update_success.load(Ordering::Acquire)
    }

    fn update_interval(&self) -> Duration {
        self.update_interval
    }

    fn schedule(self: Arc<Self>) -> ScheduleHandle {
        let period = self.update_interval;
        ScheduleHandle::new(tokio::spawn(update_manager::run(self, period)))
    }
}
