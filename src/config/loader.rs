//! ConfigLoader: composes config sources and writes the config file.

use super::{xdg, DailyFolderConfig};
use crate::error::ApiError;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use std::path::Path;
use tracing::debug;

const ENV_PREFIX: &str = "DAILY_FOLDER";

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration.
    ///
    /// Precedence: defaults (lowest) -> global file -> `explicit` file ->
    /// environment (highest). The global file is optional; an explicit file
    /// must exist.
    pub fn load(explicit: Option<&Path>) -> Result<DailyFolderConfig, ApiError> {
        let mut builder = Config::builder();
        let global = xdg::global_config_path()?;
        debug!(path = %global.display(), "Global config candidate");
        builder = builder.add_source(File::from(global).format(FileFormat::Toml).required(false));
        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }
        Self::finish(builder)
    }

    /// Load configuration from a specific file with environment overlay.
    pub fn load_from_file(path: &Path) -> Result<DailyFolderConfig, ApiError> {
        let builder = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(true));
        Self::finish(builder)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<DailyFolderConfig, ApiError> {
        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Write `config` as TOML to `path`, creating parent directories.
    pub fn save(path: &Path, config: &DailyFolderConfig) -> Result<(), ApiError> {
        let content = toml::to_string_pretty(config)
            .map_err(|e| ApiError::ConfigError(format!("Failed to serialize config: {}", e)))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ApiError::ConfigError(format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        std::fs::write(path, content).map_err(|e| {
            ApiError::ConfigError(format!("Failed to write config {}: {}", path.display(), e))
        })
    }

    /// Persist a new root label into the file at `path`, keeping other settings.
    pub fn set_root_label(path: &Path, label: &str) -> Result<DailyFolderConfig, ApiError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(ApiError::ConfigError("Root label cannot be empty".to_string()));
        }
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|e| {
                ApiError::ConfigError(format!("Failed to read config {}: {}", path.display(), e))
            })?;
            toml::from_str(&content).map_err(|e| {
                ApiError::ConfigError(format!("Failed to parse config {}: {}", path.display(), e))
            })?
        } else {
            DailyFolderConfig::default()
        };
        config.root_label = label.to_string();
        Self::save(path, &config)?;
        Ok(config)
    }
}
