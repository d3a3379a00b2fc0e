//! Onboarding flow for a new sensor entry
//!
//! Validation only checks that the serial device path exists. No device
//! object is opened here; the coordinator opens it on its first refresh.

use log::{debug, error};
use pms_sens_core::DEFAULT_NAME;
use pms_sens_types::SensorEntryConfig;
use serde::Serialize;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

use super::settings::AppConfig;

/// Why an onboarding attempt was refused
#[derive(Debug, Error)]
pub enum OnboardingError {
    /// The serial device path does not exist
    #[error("Serial device {0} does not exist")]
    CannotConnect(String),

    #[error("Device {0} is already configured")]
    AlreadyConfigured(String),

    #[error("Unexpected error: {0}")]
    Unknown(String),
}

impl OnboardingError {
    /// Error code shown on the form
    pub fn code(&self) -> &'static str {
        match self {
            OnboardingError::CannotConnect(_) => "cannot_connect",
            OnboardingError::AlreadyConfigured(_) => "already_configured",
            OnboardingError::Unknown(_) => "unknown",
        }
    }
}

/// Information about a validated entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    pub title: String,
}

/// Check that the submitted values can be used
pub async fn validate_input(data: &SensorEntryConfig) -> Result<EntryInfo, OnboardingError> {
    let serial_device = data.serial_device.clone();
    let path = PathBuf::from(&serial_device);

    // Filesystem access stays off the async executor
    let exists = tokio::task::spawn_blocking(move || path.try_exists())
        .await
        .map_err(|e| OnboardingError::Unknown(e.to_string()))?;

    match exists {
        Ok(true) => Ok(EntryInfo {
            title: DEFAULT_NAME.to_string(),
        }),
        Ok(false) => Err(OnboardingError::CannotConnect(serial_device)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(OnboardingError::CannotConnect(serial_device))
        }
        Err(e) => Err(OnboardingError::Unknown(e.to_string())),
    }
}

/// Outcome of a flow step
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FlowResult {
    /// Ask for input, pre-filled with `defaults`, showing `errors`
    ShowForm {
        step_id: &'static str,
        defaults: SensorEntryConfig,
        errors: HashMap<String, String>,
    },
    /// Input accepted; the caller stores the entry
    CreateEntry {
        title: String,
        data: SensorEntryConfig,
    },
    Abort { reason: &'static str },
}

/// Single-step user flow
pub struct ConfigFlow {
    configured: Vec<String>,
}

impl ConfigFlow {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            configured: config.entries.iter().map(|e| e.unique_id.clone()).collect(),
        }
    }

    fn form(defaults: SensorEntryConfig, errors: HashMap<String, String>) -> FlowResult {
        FlowResult::ShowForm {
            step_id: "user",
            defaults,
            errors,
        }
    }

    /// Handle the user step
    pub async fn step_user(&self, user_input: Option<SensorEntryConfig>) -> FlowResult {
        let Some(input) = user_input else {
            return Self::form(SensorEntryConfig::default(), HashMap::new());
        };

        let mut errors = HashMap::new();
        match validate_input(&input).await {
            Ok(info) => {
                if self.configured.iter().any(|id| id == input.unique_id()) {
                    debug!("{} is already configured", input.unique_id());
                    return FlowResult::Abort {
                        reason: "already_configured",
                    };
                }
                return FlowResult::CreateEntry {
                    title: info.title,
                    data: input,
                };
            }
            Err(err @ OnboardingError::CannotConnect(_)) => {
                debug!("Onboarding rejected: {}", err);
                errors.insert("base".to_string(), err.code().to_string());
            }
            Err(err) => {
                error!("Unexpected exception during onboarding: {}", err);
                errors.insert("base".to_string(), "unknown".to_string());
            }
        }

        Self::form(input, errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigEntry;

    fn input(path: &str) -> SensorEntryConfig {
        SensorEntryConfig {
            serial_device: path.to_string(),
            ..SensorEntryConfig::default()
        }
    }

    /// A path that exists on every test machine
    fn existing_path() -> String {
        std::env::temp_dir().to_string_lossy().into_owned()
    }

    #[tokio::test]
    async fn test_missing_device_cannot_connect() {
        let path = format!("/dev/pms-sens-missing-{}", uuid::Uuid::new_v4());
        let err = validate_input(&input(&path)).await.unwrap_err();
        assert!(matches!(err, OnboardingError::CannotConnect(ref p) if *p == path));
        assert_eq!(err.code(), "cannot_connect");
    }

    #[tokio::test]
    async fn test_form_shows_cannot_connect() {
        let flow = ConfigFlow::new(&AppConfig::default());
        let submitted = input("/dev/pms-sens-does-not-exist");
        match flow.step_user(Some(submitted.clone())).await {
            FlowResult::ShowForm { errors, defaults, .. } => {
                assert_eq!(errors.get("base").map(String::as_str), Some("cannot_connect"));
                assert_eq!(defaults, submitted);
            }
            other => panic!("expected form, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_input_shows_defaults() {
        let flow = ConfigFlow::new(&AppConfig::default());
        match flow.step_user(None).await {
            FlowResult::ShowForm { step_id, defaults, errors } => {
                assert_eq!(step_id, "user");
                assert_eq!(defaults, SensorEntryConfig::default());
                assert!(errors.is_empty());
            }
            other => panic!("expected form, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_existing_device_creates_entry() {
        let flow = ConfigFlow::new(&AppConfig::default());
        let path = existing_path();
        match flow.step_user(Some(input(&path))).await {
            FlowResult::CreateEntry { title, data } => {
                assert_eq!(title, "PMS5003");
                assert_eq!(data.serial_device, path);
            }
            other => panic!("expected entry, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_duplicate_device_aborts() {
        let path = existing_path();
        let mut config = AppConfig::default();
        config
            .add_entry(ConfigEntry::new(DEFAULT_NAME, input(&path)))
            .unwrap();

        let flow = ConfigFlow::new(&config);
        assert_eq!(
            flow.step_user(Some(input(&path))).await,
            FlowResult::Abort {
                reason: "already_configured"
            }
        );
    }
}
