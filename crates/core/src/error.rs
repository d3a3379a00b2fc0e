//! Error taxonomy for device access, refreshes and setup

use thiserror::Error;

/// Failure reported by a device driver
#[derive(Debug, Error)]
pub enum DeviceError {
    /// No complete frame arrived within the driver's read timeout
    #[error("Read timeout: {0}")]
    ReadTimeout(String),

    /// The serial transport timed out
    #[error("Serial timeout: {0}")]
    SerialTimeout(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other driver-specific failure
    #[error("{0}")]
    Driver(String),
}

impl DeviceError {
    /// Timeouts are transient and retried on the next tick
    pub fn is_timeout(&self) -> bool {
        matches!(self, DeviceError::ReadTimeout(_) | DeviceError::SerialTimeout(_))
    }
}

/// Failure of a single refresh cycle
#[derive(Debug, Error)]
pub enum RefreshError {
    /// Timeout from the device or transport, passed through unchanged
    #[error(transparent)]
    Timeout(DeviceError),

    /// Anything else that went wrong while opening or reading the device
    #[error("{message}: {source}")]
    UpdateFailed {
        message: String,
        #[source]
        source: DeviceError,
    },
}

impl RefreshError {
    /// Sort a device failure into the refresh taxonomy
    pub fn from_device(err: DeviceError, message: impl Into<String>) -> Self {
        if err.is_timeout() {
            RefreshError::Timeout(err)
        } else {
            RefreshError::UpdateFailed {
                message: message.into(),
                source: err,
            }
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, RefreshError::Timeout(_))
    }

    /// The underlying device failure
    pub fn device_error(&self) -> &DeviceError {
        match self {
            RefreshError::Timeout(err) => err,
            RefreshError::UpdateFailed { source, .. } => source,
        }
    }
}

/// Setup could not complete
#[derive(Debug, Error)]
pub enum SetupError {
    /// The first refresh failed; setup should be retried later
    #[error("Sensor not ready: {0}")]
    NotReady(#[source] RefreshError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_timeouts_keep_their_kind() {
        let err = RefreshError::from_device(DeviceError::ReadTimeout("no frame".into()), "ctx");
        assert!(err.is_timeout());
        assert!(matches!(err.device_error(), DeviceError::ReadTimeout(_)));
        assert_eq!(err.to_string(), "Read timeout: no frame");

        let err = RefreshError::from_device(DeviceError::SerialTimeout("tx".into()), "ctx");
        assert!(matches!(err, RefreshError::Timeout(DeviceError::SerialTimeout(_))));
    }

    #[test]
    fn test_other_failures_are_wrapped_with_cause() {
        let err = RefreshError::from_device(
            DeviceError::Driver("checksum mismatch".into()),
            "Error reading PMS5003 sensor",
        );
        assert!(!err.is_timeout());
        assert_eq!(err.to_string(), "Error reading PMS5003 sensor: checksum mismatch");
        let cause = err.source().expect("cause attached");
        assert_eq!(cause.to_string(), "checksum mismatch");
    }

    #[test]
    fn test_setup_error_chains_refresh_error() {
        let err = SetupError::NotReady(RefreshError::from_device(
            DeviceError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone")),
            "Error reading PMS5003 sensor",
        ));
        assert!(err.to_string().starts_with("Sensor not ready"));
        assert!(err.source().is_some());
    }
}
