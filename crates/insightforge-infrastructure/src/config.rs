//! Application configuration.
//!
//! Loaded from `~/.config/insightforge/config.toml`. The file is optional;
//! a missing or empty file yields the defaults, while a file that exists but
//! cannot be read or parsed is reported as an error.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use insightforge_core::error::{ForgeError, Result};

use crate::paths::ForgePaths;

const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 30;

/// Settings for the insightforge runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Override for the mock generator delay, in milliseconds.
    /// Unset means the generator's own default.
    pub generation_delay_ms: Option<u64>,

    /// How long a generation may stay in flight before it is treated as
    /// failed and the form is restored.
    pub generation_timeout_secs: u64,

    /// Override for the store directory. Unset means the per-user data dir.
    pub data_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            generation_delay_ms: None,
            generation_timeout_secs: DEFAULT_GENERATION_TIMEOUT_SECS,
            data_dir: None,
        }
    }
}

impl AppConfig {
    /// Loads the configuration from the default config file path.
    pub fn load() -> Result<Self> {
        Self::load_from(&ForgePaths::config_file()?)
    }

    /// Loads the configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            ForgeError::config(format!(
                "Failed to read config file at {}: {}",
                path.display(),
                e
            ))
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        toml::from_str(&content).map_err(|e| {
            ForgeError::config(format!(
                "Failed to parse config file at {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Returns the configured generator delay override, if any.
    pub fn generation_delay(&self) -> Option<Duration> {
        self.generation_delay_ms.map(Duration::from_millis)
    }

    /// Returns the generation timeout as a duration.
    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    /// Returns the store directory, honoring the config override.
    pub fn store_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.join("store")),
            None => ForgePaths::store_dir(),
        }
    }
}
