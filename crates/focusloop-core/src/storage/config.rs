//! TOML-based application configuration.
//!
//! Stores deployment-level options that are not user preferences:
//! - Storage backend and database location
//! - Alert sound and local asset directory for playback
//! - Optional catalog file replacing the built-in catalog
//! - Log level
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, StorageError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Sqlite,
    Memory,
}

/// Storage-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_backend")]
    pub backend: StorageBackend,
    /// Database file; defaults to `<data_dir>/focusloop.db`.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Playback configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "default_alert_source")]
    pub alert_source: String,
    /// Base directory for relative source locators. URLs are passed through
    /// untouched; the device-backed runtime only plays local files.
    #[serde(default)]
    pub assets_dir: Option<PathBuf>,
    /// How often the host checks the playback runtime for finished streams.
    #[serde(default = "default_finished_poll_ms")]
    pub finished_poll_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

// Default functions
fn default_backend() -> StorageBackend {
    StorageBackend::Sqlite
}
fn default_alert_source() -> String {
    "sounds/notification.mp3".into()
}
fn default_finished_poll_ms() -> u64 {
    250
}
fn default_log_level() -> String {
    "info".into()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            path: None,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            alert_source: default_alert_source(),
            assets_dir: None,
            finished_poll_ms: default_finished_poll_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// `<data_dir>/config.toml`.
    pub fn default_path() -> Result<PathBuf, StorageError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, or return defaults if absent.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Self::load_from(&path)
    }

    /// Load from `path`, or return defaults if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Persist to `path`.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Database file location for the SQLite backend.
    pub fn database_path(&self) -> Result<PathBuf, StorageError> {
        match &self.storage.path {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join("focusloop.db")),
        }
    }

    /// Resolve a source locator against `assets_dir`. URLs and absolute
    /// paths are returned unchanged.
    pub fn resolve_asset(&self, locator: &str) -> String {
        if locator.contains("://") || Path::new(locator).is_absolute() {
            return locator.to_string();
        }
        match &self.audio.assets_dir {
            Some(dir) => dir.join(locator).to_string_lossy().into_owned(),
            None => locator.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(cfg.storage.backend, StorageBackend::Sqlite);
        assert_eq!(cfg.audio.finished_poll_ms, 250);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let cfg = Config::from_toml_str(
            r#"
            [storage]
            backend = "memory"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.storage.backend, StorageBackend::Memory);
        assert_eq!(cfg.logging.level, "debug");
        assert_eq!(cfg.audio.alert_source, "sounds/notification.mp3");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[storage\nbackend = ").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::ParseFailed(_))
        ));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.audio.assets_dir = Some(PathBuf::from("/srv/sounds"));
        cfg.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.audio.assets_dir, Some(PathBuf::from("/srv/sounds")));
    }

    #[test]
    fn resolve_asset_leaves_urls_alone() {
        let mut cfg = Config::default();
        cfg.audio.assets_dir = Some(PathBuf::from("/srv/sounds"));
        assert_eq!(
            cfg.resolve_asset("https://example.com/a.mp3"),
            "https://example.com/a.mp3"
        );
        assert_eq!(
            cfg.resolve_asset("audios/night.mp3"),
            Path::new("/srv/sounds").join("audios/night.mp3").to_string_lossy()
        );
    }
}
