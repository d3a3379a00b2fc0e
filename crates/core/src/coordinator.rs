//! Coordinator capability and the handle of its refresh schedule

use crate::error::{RefreshError, SetupError};
use async_trait::async_trait;
use pms_sens_types::Reading;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Owner of the refresh cadence and the latest good reading
///
/// Exactly one refresh touches the device at a time. Readers get the cached
/// snapshot through [`Coordinator::get_latest`] without waiting on the device.
#[async_trait]
pub trait Coordinator: Send + Sync {
    /// Run one read-and-decode cycle against the device
    async fn refresh_once(&self) -> Result<Arc<Reading>, RefreshError>;

    /// Initial refresh at startup; failure aborts setup
    async fn first_refresh(&self) -> Result<(), SetupError>;

    /// Latest successful reading, if any
    fn get_latest(&self) -> Option<Arc<Reading>>;

    /// Whether the most recent refresh succeeded
    fn last_update_success(&self) -> bool;

    fn update_interval(&self) -> Duration;

    /// Start refreshing on the coordinator's own timer
    fn schedule(self: Arc<Self>) -> ScheduleHandle;
}

/// Running refresh schedule
///
/// Dropping the handle leaves the schedule running; call [`ScheduleHandle::stop`]
/// to end it.
#[derive(Debug)]
pub struct ScheduleHandle {
    task: JoinHandle<()>,
}

impl ScheduleHandle {
    pub fn new(task: JoinHandle<()>) -> Self {
        Self { task }
    }

    pub fn stop(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
