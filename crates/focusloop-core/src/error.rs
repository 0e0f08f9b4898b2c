//! Core error types for focusloop-core.
//!
//! Most failures in this crate are handled where they occur (rejected
//! setting fields, blocked playback, unavailable persistence) and never
//! reach the caller. The types below describe them, and `CoreError` covers
//! the few startup failures that do propagate (config and catalog loading).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for focusloop-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog-related errors
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Playback-related errors
    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Durable key-value storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing database
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// The backend refuses all reads and writes
    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),

    /// The data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Catalog loading errors.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Failed to read the catalog file
    #[error("Failed to read catalog from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to parse the catalog file
    #[error("Failed to parse catalog: {0}")]
    ParseFailed(String),

    /// An entry has an empty identifier
    #[error("Empty {kind} id in catalog")]
    EmptyId { kind: &'static str },

    /// Two entries of the same kind share an identifier
    #[error("Duplicate {kind} id '{id}' in catalog")]
    DuplicateId { kind: &'static str, id: String },
}

/// Playback runtime errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// The runtime refused to start audio (e.g. no prior user gesture)
    #[error("Playback blocked for '{locator}': {reason}")]
    Blocked { locator: String, reason: String },

    /// The runtime cannot play this kind of locator
    #[error("Unsupported source '{0}'")]
    UnsupportedSource(String),

    /// The audio device or decoder failed
    #[error("Playback device error: {0}")]
    Device(String),
}

/// Setting validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Durations are whole minutes and must be positive
    #[error("Invalid duration for '{field}': must be greater than zero")]
    NonPositiveDuration { field: &'static str },

    /// Volumes are percentages
    #[error("Invalid volume for '{field}': {value} is outside 0..=100")]
    VolumeOutOfRange { field: &'static str, value: i64 },

    /// The id does not exist in the catalog
    #[error("Unknown {kind} id '{id}'")]
    UnknownId { kind: &'static str, id: String },

    /// The setting key is not recognized
    #[error("Unknown setting '{0}'")]
    UnknownKey(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(inner, _msg) => {
                if inner.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    fn load_config() -> Result<()> {
        let parsed: Result<(), ConfigError> = Err(ConfigError::ParseFailed("expected `=`".into()));
        parsed?;
        Ok(())
    }

    #[test]
    fn config_error_converts_with_context() {
        let err = load_config().unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::ParseFailed(_))));
        assert_eq!(
            err.to_string(),
            "Configuration error: Failed to parse configuration: expected `=`"
        );
    }

    #[test]
    fn catalog_error_converts() {
        let err: CoreError = CatalogError::DuplicateId {
            kind: "ambient",
            id: "rain".into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Catalog error: Duplicate ambient id 'rain' in catalog"
        );
    }
}
