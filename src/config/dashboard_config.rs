//! Dashboard configuration loaded from TOML
//!
//! Every field has a default, so an absent or partial file still yields a
//! working setup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use super::defaults;
use super::validation;
use crate::types::WellEntry;

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "deepbit.toml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration.
///
/// Load with `DashboardConfig::load()` which searches:
/// 1. `$DEEPBIT_CONFIG` env var
/// 2. `./deepbit.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream processing service
    #[serde(default)]
    pub upload: UploadConfig,

    #[serde(default)]
    pub notifications: NotificationConfig,

    /// Sidebar well catalog, in display order
    #[serde(default = "default_wells")]
    pub wells: Vec<WellEntry>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            upload: UploadConfig::default(),
            notifications: NotificationConfig::default(),
            wells: default_wells(),
        }
    }
}

fn default_wells() -> Vec<WellEntry> {
    defaults::DEFAULT_WELLS
        .iter()
        .map(|&(name, depth)| WellEntry::new(name, depth))
        .collect()
}

impl DashboardConfig {
    /// Load configuration using the standard search order, then apply
    /// environment overrides.
    ///
    /// Defaults are used only when no config file is found. A file that
    /// exists but fails to parse or validate is an error.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok(), Path::new("."))
    }

    /// [`DashboardConfig::load`] with the environment lookup and the
    /// directory holding `deepbit.toml` injected.
    pub fn load_with(
        lookup: impl Fn(&str) -> Option<String>,
        dir: &Path,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::load_file_or_default(&lookup, dir)?;
        config.apply_env_overrides(&lookup);
        Ok(config)
    }

    fn load_file_or_default(
        lookup: &impl Fn(&str) -> Option<String>,
        dir: &Path,
    ) -> Result<Self, ConfigError> {
        // 1. Check env var
        if let Some(path) = lookup("DEEPBIT_CONFIG").filter(|v| !v.trim().is_empty()) {
            let p = PathBuf::from(&path);
            if p.exists() {
                let config = Self::load_from_file(&p)?;
                info!(path = %p.display(), wells = config.wells.len(), "Loaded config from DEEPBIT_CONFIG");
                return Ok(config);
            }
            warn!(path = %path, "DEEPBIT_CONFIG points to non-existent file, falling back");
        }

        // 2. Check ./deepbit.toml
        let local = dir.join(LOCAL_CONFIG_FILE);
        if local.exists() {
            let config = Self::load_from_file(&local)?;
            info!(path = %local.display(), wells = config.wells.len(), "Loaded config from {}", LOCAL_CONFIG_FILE);
            return Ok(config);
        }

        // 3. Defaults
        info!("No {} found, using built-in defaults", LOCAL_CONFIG_FILE);
        Ok(Self::default())
    }

    /// Load from a specific TOML file path. Unknown keys are logged as
    /// warnings; range errors fail the load.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, err) => ConfigError::Parse(path.to_path_buf(), err),
            other => other,
        })
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `DEEPBIT_SERVER_ADDR`, `DEEPBIT_UPLOAD_URL` and
    /// `DEEPBIT_CORS_ORIGINS`. The lookup is injected so tests never touch
    /// the process environment.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(addr) = lookup("DEEPBIT_SERVER_ADDR").filter(|v| !v.trim().is_empty()) {
            info!(addr = %addr, "Server address overridden by DEEPBIT_SERVER_ADDR");
            self.server.addr = addr;
        }
        if let Some(url) = lookup("DEEPBIT_UPLOAD_URL").filter(|v| !v.trim().is_empty()) {
            info!(url = %url, "Upload service overridden by DEEPBIT_UPLOAD_URL");
            self.upload.base_url = url;
        }
        if let Some(origins) = lookup("DEEPBIT_CORS_ORIGINS") {
            self.server.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Range and consistency checks. All problems are collected, not just
    /// the first.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let errors = validation::validate_ranges(self);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),
    #[error("Config parse error ({}): {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),
    #[error("Config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation failed:\n  - {}", .0.join("\n  - "))]
    Validation(Vec<String>),
}

// ============================================================================
// Sections
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address, e.g. `0.0.0.0:8080`
    pub addr: String,
    pub max_upload_bytes: usize,
    /// Allowed cross-origin callers; empty means same-origin only
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: defaults::SERVER_ADDR.to_string(),
            max_upload_bytes: defaults::MAX_UPLOAD_BYTES,
            cors_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Base URL; requests go to `{base_url}/api/uploads`
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::UPLOAD_BASE_URL.to_string(),
            timeout_secs: defaults::UPLOAD_TIMEOUT_SECS,
        }
    }
}

impl UploadConfig {
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub capacity: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            capacity: defaults::NOTIFICATION_CAPACITY,
        }
    }
}
