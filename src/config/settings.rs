//! Stored configuration entries

use anyhow::{Context, Result};
use pms_sens_core::DEFAULT_NAME;
use pms_sens_sources::SimulationConfig;
use pms_sens_types::SensorEntryConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::onboarding::OnboardingError;

/// Current config format version
pub const CONFIG_VERSION: u32 = 1;

fn default_version() -> u32 {
    CONFIG_VERSION
}

fn default_title() -> String {
    DEFAULT_NAME.to_string()
}

/// One set-up sensor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigEntry {
    /// Random id assigned at creation; prefixes observer unique ids
    pub entry_id: String,
    #[serde(default = "default_title")]
    pub title: String,
    /// Identity of the physical device (its serial path)
    pub unique_id: String,
    pub data: SensorEntryConfig,
}

impl ConfigEntry {
    pub fn new(title: impl Into<String>, data: SensorEntryConfig) -> Self {
        Self {
            entry_id: uuid::Uuid::new_v4().simple().to_string(),
            title: title.into(),
            unique_id: data.unique_id().to_string(),
            data,
        }
    }
}

/// Application-wide configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the config format
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub entries: Vec<ConfigEntry>,
    /// Settings of the simulated backend
    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl AppConfig {
    /// Load configuration from disk
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_path()?)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_path()?)
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("org", "pms-sens", "pms-sens")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.json"))
    }

    /// Load configuration from a specific file path
    ///
    /// A missing file yields the default configuration.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config
            .simulation
            .validate()
            .with_context(|| format!("Invalid simulation settings in {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to a specific file path
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    pub fn is_configured(&self, unique_id: &str) -> bool {
        self.entries.iter().any(|e| e.unique_id == unique_id)
    }

    /// Add an entry, refusing a second entry for the same device
    pub fn add_entry(&mut self, entry: ConfigEntry) -> Result<&ConfigEntry, OnboardingError> {
        if self.is_configured(&entry.unique_id) {
            return Err(OnboardingError::AlreadyConfigured(entry.unique_id));
        }
        self.entries.push(entry);
        Ok(&self.entries[self.entries.len() - 1])
    }

    pub fn find_entry(&self, unique_id: &str) -> Option<&ConfigEntry> {
        self.entries.iter().find(|e| e.unique_id == unique_id)
    }

    pub fn remove_entry(&mut self, unique_id: &str) -> Option<ConfigEntry> {
        let index = self.entries.iter().position(|e| e.unique_id == unique_id)?;
        Some(self.entries.remove(index))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            entries: Vec::new(),
            simulation: SimulationConfig::default(),
        }
    }
}
