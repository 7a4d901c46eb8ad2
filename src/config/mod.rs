//! Configuration
//!
//! Layered configuration: built-in defaults, the global config file, an
//! optional explicit file, then `DAILY_FOLDER__*` environment variables.

mod loader;
pub mod xdg;

pub use loader::ConfigLoader;

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::path::DEFAULT_ROOT_LABEL;
use crate::types::LibraryScope;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

fn default_root_label() -> String {
    DEFAULT_ROOT_LABEL.to_string()
}

fn default_settle_delay_ms() -> u64 {
    250
}

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyFolderConfig {
    /// Name of the top-level collection the hierarchy hangs from
    #[serde(default = "default_root_label")]
    pub root_label: String,

    /// Library used when the caller does not pick one
    #[serde(default)]
    pub default_scope: LibraryScope,

    #[serde(default)]
    pub navigation: NavigationConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DailyFolderConfig {
    /// Configured root label, or the default when blank.
    pub fn root_label(&self) -> &str {
        let trimmed = self.root_label.trim();
        if trimmed.is_empty() {
            DEFAULT_ROOT_LABEL
        } else {
            trimmed
        }
    }
}

impl Default for DailyFolderConfig {
    fn default() -> Self {
        Self {
            root_label: default_root_label(),
            default_scope: LibraryScope::default(),
            navigation: NavigationConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Tree navigation tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Wait after expanding a row before scanning again (milliseconds)
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

impl NavigationConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Collection store directory; None means `$XDG_DATA_HOME/daily-folder/store`
    #[serde(default)]
    pub store_path: Option<PathBuf>,
}

impl StorageConfig {
    /// Resolve the store directory, falling back to the XDG data location.
    pub fn resolve_store_path(&self) -> Result<PathBuf, ApiError> {
        match &self.store_path {
            Some(path) if !path.as_os_str().is_empty() => Ok(path.clone()),
            _ => Ok(xdg::data_dir()?.join("store")),
        }
    }
}
