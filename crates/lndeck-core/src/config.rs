//! Configuration management for lndeck.
//!
//! The config file lives at a platform-appropriate location:
//! - Linux: `~/.config/lndeck/config.toml`
//! - macOS: `~/Library/Application Support/lndeck/config.toml`
//!
//! Every field has a usable default, so the file is optional — a missing
//! config simply means defaults everywhere. CLI flags override whatever
//! the file says.
//!
//! # Config File Format (TOML)
//!
//! ```toml
//! # engine_socket = "/run/user/1000/lndeckd.sock"
//! refresh_interval_secs = 5
//! # explorer_base = "http://localhost:8080"   # self-hosted mempool instance
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file at {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file at {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to write config file at {path}: {source}")]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("could not determine config directory for this platform")]
    NoConfigDir,
}

/// Default seconds between collection refreshes.
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 5;

fn default_refresh_interval() -> u64 {
    DEFAULT_REFRESH_INTERVAL_SECS
}

/// The persisted configuration for lndeck.
///
/// This is what gets saved to and loaded from the TOML config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the wallet engine daemon's Unix socket.
    /// If not set, the platform default ([`AppConfig::default_socket_path`])
    /// is used.
    #[serde(default)]
    pub engine_socket: Option<PathBuf>,

    /// Seconds between automatic refreshes of the peer and channel lists.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    /// Optional block-explorer base URL override, for self-hosted mempool
    /// instances (the only option on regtest).
    #[serde(default)]
    pub explorer_base: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            engine_socket: None,
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
            explorer_base: None,
        }
    }
}

impl AppConfig {
    /// Returns the platform-appropriate config directory path.
    ///
    /// - Linux: `~/.config/lndeck/`
    /// - macOS: `~/Library/Application Support/lndeck/`
    ///
    /// Returns `None` if the platform's config directory can't be determined
    /// (very rare — would mean $HOME is not set).
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("lndeck"))
    }

    /// Returns the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf, ConfigError> {
        Ok(Self::config_dir()
            .ok_or(ConfigError::NoConfigDir)?
            .join("config.toml"))
    }

    /// Returns the platform-appropriate data directory for the log file.
    ///
    /// - Linux: `~/.local/share/lndeck/`
    /// - macOS: `~/Library/Application Support/lndeck/`
    pub fn data_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("lndeck"))
    }

    /// Returns the default path for the engine daemon's Unix socket.
    ///
    /// Uses `$XDG_RUNTIME_DIR` on Linux (typically `/run/user/1000/`),
    /// falling back to `/tmp/lndeckd-{user}.sock`.
    pub fn default_socket_path() -> PathBuf {
        if let Some(runtime_dir) = dirs::runtime_dir() {
            runtime_dir.join("lndeckd.sock")
        } else {
            let user = std::env::var("USER").unwrap_or_else(|_| "unknown".to_string());
            PathBuf::from(format!("/tmp/lndeckd-{user}.sock"))
        }
    }

    /// The socket path to use: the configured one, or the platform default.
    pub fn socket_path(&self) -> PathBuf {
        self.engine_socket
            .clone()
            .unwrap_or_else(Self::default_socket_path)
    }

    /// The refresh interval as a `Duration`.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Loads the config from the default config file path.
    ///
    /// Returns `Ok(None)` if the config file doesn't exist yet.
    /// Returns `Err(...)` if the file exists but can't be read or parsed.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    /// Loads the config from a specific file path.
    ///
    /// Returns `Ok(None)` if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_owned(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseFile {
            path: path.to_owned(),
            source: e,
        })?;
        Ok(Some(config))
    }

    /// Saves this config to a specific file path.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteFile {
                path: path.to_owned(),
                source: e,
            })?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::WriteFile {
            path: path.to_owned(),
            source: e,
        })?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn config_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");

        let config = AppConfig {
            engine_socket: Some(PathBuf::from("/tmp/engine.sock")),
            refresh_interval_secs: 10,
            explorer_base: Some("http://localhost:8080".to_string()),
        };

        config.save_to(&path).unwrap();
        let loaded = AppConfig::load_from(&path).unwrap().unwrap();

        assert_eq!(loaded.engine_socket, Some(PathBuf::from("/tmp/engine.sock")));
        assert_eq!(loaded.refresh_interval_secs, 10);
        assert_eq!(loaded.explorer_base.as_deref(), Some("http://localhost:8080"));
    }

    #[test]
    fn config_missing_file_returns_none() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nonexistent.toml");
        let result = AppConfig::load_from(&path).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn config_creates_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("deep").join("nested").join("config.toml");

        AppConfig::default().save_to(&path).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn empty_file_gets_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        let loaded = AppConfig::load_from(&path).unwrap().unwrap();
        assert_eq!(loaded.refresh_interval_secs, DEFAULT_REFRESH_INTERVAL_SECS);
        assert!(loaded.engine_socket.is_none());
        assert!(loaded.explorer_base.is_none());
    }

    #[test]
    fn configured_socket_wins_over_default() {
        let config = AppConfig {
            engine_socket: Some(PathBuf::from("/custom/engine.sock")),
            ..AppConfig::default()
        };
        assert_eq!(config.socket_path(), PathBuf::from("/custom/engine.sock"));
    }
}
