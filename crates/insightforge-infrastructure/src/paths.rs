//! Unified path management for insightforge files.
//!
//! All configuration and persisted state live under per-user application
//! directories so behavior is consistent across platforms.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/insightforge/          # Config directory
//! └── config.toml                  # Application configuration
//!
//! ~/.local/share/insightforge/     # Data directory
//! └── store/                       # Persisted key-value store
//!     ├── insightforge-user.json
//!     ├── insightforge-theme.json
//!     └── insightforge-history.json
//! ```

use std::path::PathBuf;

use insightforge_core::error::{ForgeError, Result};

/// Unified path management for insightforge.
pub struct ForgePaths;

impl ForgePaths {
    const APP_DIR: &'static str = "insightforge";

    /// Returns the insightforge configuration directory
    /// (e.g., `~/.config/insightforge/`).
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(Self::APP_DIR))
            .ok_or_else(|| ForgeError::config("Cannot find config directory"))
    }

    /// Returns the insightforge data directory
    /// (e.g., `~/.local/share/insightforge/`).
    pub fn data_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|dir| dir.join(Self::APP_DIR))
            .ok_or_else(|| ForgeError::config("Cannot find data directory"))
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the directory holding the persisted key-value store.
    pub fn store_dir() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join("store"))
    }
}
