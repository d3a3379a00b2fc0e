//! Polling coordinator and its refresh schedule

mod coordinator;
mod frame;
mod update_manager;

#[cfg(test)]
pub(crate) mod test_support;

pub use coordinator::{PollingCoordinator, TickOutcome};
pub use frame::reading_from_frame;
