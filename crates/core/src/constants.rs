//! Fixed values shared across the integration

use std::time::Duration;

/// Integration domain, used as a logging and identity prefix
pub const DOMAIN: &str = "pms5003";

/// Title given to new entries
pub const DEFAULT_NAME: &str = "PMS5003";

/// The sensor only speaks 9600 baud
pub const BAUD_RATE: u32 = 9600;

/// Refresh period of the polling coordinator (not user-configurable)
pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(30);

/// Message attached to every wrapped refresh failure
pub const UPDATE_FAILED_MESSAGE: &str = "Error reading PMS5003 sensor";
