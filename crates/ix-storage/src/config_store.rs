//! TOML configuration file storage

use crate::atomic::write_atomic;
use ix_core::config::Config;
use ix_core::error::{IxError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Project-local configuration path
pub const PROJECT_CONFIG_PATH: &str = ".intelx/config.toml";

/// Loads and saves the intelx configuration file
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store backed by an explicit path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store backed by `.intelx/config.toml` in the working directory
    pub fn project() -> Self {
        Self::new(PROJECT_CONFIG_PATH)
    }

    /// Store backed by the per-user config directory
    pub fn user() -> Option<Self> {
        dirs::config_dir().map(|dir| Self::new(dir.join("intelx").join("config.toml")))
    }

    /// Project config if present, else the user config, else the project path
    pub fn discover() -> Self {
        let project = Self::project();
        if project.exists() {
            return project;
        }
        match Self::user() {
            Some(user) if user.exists() => user,
            _ => project,
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the backing file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the configuration; a missing file yields the defaults
    pub fn load(&self) -> Result<Config> {
        if !self.exists() {
            debug!("No config at {:?}, using defaults", self.path);
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&self.path)?;
        toml::from_str(&content).map_err(|e| {
            IxError::Toml(e.to_string())
                .with_context(format!("Failed to parse {}", self.path.display()))
        })
    }

    /// Save the configuration, creating parent directories as needed
    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(config).map_err(|e| IxError::Toml(e.to_string()))?;
        write_atomic(&self.path, content.as_bytes())?;
        debug!("Saved config to {:?}", self.path);
        Ok(())
    }
}
