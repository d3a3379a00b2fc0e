//! Configuration management

mod onboarding;
mod settings;

pub use onboarding::{validate_input, ConfigFlow, EntryInfo, FlowResult, OnboardingError};
pub use settings::{AppConfig, ConfigEntry, CONFIG_VERSION};
