//! Error types for store access and the hierarchy API.

use thiserror::Error;

/// Errors raised by a collection store implementation
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage backend error: {0}")]
    Backend(#[from] sled::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("Corrupt store record: {0}")]
    Corrupt(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by resolver, navigator, configuration and CLI
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Lookup of collection '{name}' failed: {source}")]
    LookupFailure {
        name: String,
        #[source]
        source: StoreError,
    },

    #[error("Failed to create collection '{name}': {source}")]
    CreationFailed {
        name: String,
        #[source]
        source: StoreError,
    },

    #[error("Navigation stopped: '{segment}' not found in tree view")]
    NavigationIncomplete { segment: String },

    #[error("Invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    StorageError(#[from] StoreError),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
