//! TOML-based persistence of the last-known device paths.
//!
//! Reads and writes [`PersistedPortConfig`] to the platform-appropriate
//! config file:
//! - Windows:  `%APPDATA%\IRHub\ports.toml`
//! - Linux:    `~/.config/irhub/ports.toml`
//! - macOS:    `~/Library/Application Support/IRHub/ports.toml`
//!
//! The daemon reads this file once at startup (to auto-reconnect the roles
//! that were connected last run) and rewrites it after every successful
//! connect/disconnect. Durability is best-effort: a failed save is logged by
//! the caller and the live connection state stays authoritative.

use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for config persistence operations.
#[derive(Debug, Error)]
pub enum ConfigStoreError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing port config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse port config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize port config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Last-known device path per role.
///
/// `None` means the role was explicitly disconnected (or never connected);
/// the daemon makes no reconnect attempt for it at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedPortConfig {
    /// Device path last connected as the receiver.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver_path: Option<String>,
    /// Device path last connected as the transmitter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transmitter_path: Option<String>,
}

/// Storage seam for the persisted port config.
///
/// The daemon talks to this trait so tests can substitute an in-memory or
/// mock store for the real file-backed one.
#[cfg_attr(test, mockall::automock)]
pub trait PortConfigStore: Send + Sync {
    /// Loads the persisted config, defaulting when none exists yet.
    fn load(&self) -> Result<PersistedPortConfig, ConfigStoreError>;
    /// Persists `config`, replacing any previous contents.
    fn save(&self, config: &PersistedPortConfig) -> Result<(), ConfigStoreError>;
}

// ── File-backed store ─────────────────────────────────────────────────────────

/// File-backed store keeping `ports.toml` in a config directory.
pub struct TomlPortConfigStore {
    dir: PathBuf,
}

impl TomlPortConfigStore {
    /// Creates a store rooted at an explicit directory (CLI override, tests).
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Creates a store rooted at the platform config directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigStoreError::NoPlatformConfigDir`] when the base
    /// directory cannot be determined from the environment.
    pub fn from_platform_dir() -> Result<Self, ConfigStoreError> {
        platform_config_dir()
            .map(Self::new)
            .ok_or(ConfigStoreError::NoPlatformConfigDir)
    }

    fn file_path(&self) -> PathBuf {
        self.dir.join("ports.toml")
    }
}

impl PortConfigStore for TomlPortConfigStore {
    fn load(&self) -> Result<PersistedPortConfig, ConfigStoreError> {
        let path = self.file_path();
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(PersistedPortConfig::default())
            }
            Err(source) => Err(ConfigStoreError::Io { path, source }),
        }
    }

    fn save(&self, config: &PersistedPortConfig) -> Result<(), ConfigStoreError> {
        // Ensure the directory exists before writing.
        std::fs::create_dir_all(&self.dir).map_err(|source| ConfigStoreError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.file_path();
        let content = toml::to_string_pretty(config)?;
        std::fs::write(&path, content).map_err(|source| ConfigStoreError::Io { path, source })
    }
}

/// Resolves the platform config base directory including the app subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("IRHub"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("irhub"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("IRHub")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── In-memory store ───────────────────────────────────────────────────────────

/// In-memory store for integration tests and ephemeral (`--no-persist`-style)
/// runs. Contents are lost at process exit.
#[derive(Default)]
pub struct MemoryPortConfigStore {
    config: Mutex<PersistedPortConfig>,
}

impl MemoryPortConfigStore {
    pub fn new(config: PersistedPortConfig) -> Self {
        Self {
            config: Mutex::new(config),
        }
    }
}

impl PortConfigStore for MemoryPortConfigStore {
    fn load(&self) -> Result<PersistedPortConfig, ConfigStoreError> {
        Ok(self
            .config
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone())
    }

    fn save(&self, config: &PersistedPortConfig) -> Result<(), ConfigStoreError> {
        *self.config.lock().unwrap_or_else(|e| e.into_inner()) = config.clone();
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (TomlPortConfigStore, PathBuf) {
        let dir = std::env::temp_dir().join(format!("irhub_test_{}", uuid::Uuid::new_v4()));
        (TomlPortConfigStore::new(dir.clone()), dir)
    }

    #[test]
    fn test_load_returns_default_when_file_absent() {
        let (store, dir) = temp_store();
        let cfg = store.load().expect("absent file must load as default");
        assert_eq!(cfg, PersistedPortConfig::default());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let (store, dir) = temp_store();
        let cfg = PersistedPortConfig {
            receiver_path: Some("/dev/ttyACM0".into()),
            transmitter_path: Some("/dev/ttyUSB0".into()),
        };

        store.save(&cfg).expect("save");
        let loaded = store.load().expect("load");

        assert_eq!(loaded, cfg);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_none_paths_are_omitted_from_toml() {
        let cfg = PersistedPortConfig {
            receiver_path: Some("/dev/ttyACM0".into()),
            transmitter_path: None,
        };
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        assert!(toml_str.contains("receiver_path"));
        assert!(
            !toml_str.contains("transmitter_path"),
            "None must be omitted so the file stays minimal"
        );
    }

    #[test]
    fn test_empty_toml_deserializes_to_default() {
        let cfg: PersistedPortConfig = toml::from_str("").unwrap();
        assert_eq!(cfg, PersistedPortConfig::default());
    }

    #[test]
    fn test_invalid_toml_is_a_parse_error() {
        let (store, dir) = temp_store();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("ports.toml"), "[[[ not valid toml").unwrap();

        let result = store.load();
        assert!(matches!(result, Err(ConfigStoreError::Parse(_))));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_save_overwrites_previous_contents() {
        let (store, dir) = temp_store();
        store
            .save(&PersistedPortConfig {
                receiver_path: Some("/dev/ttyACM0".into()),
                transmitter_path: None,
            })
            .unwrap();
        store.save(&PersistedPortConfig::default()).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, PersistedPortConfig::default());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_memory_store_round_trips() {
        let store = MemoryPortConfigStore::default();
        let cfg = PersistedPortConfig {
            receiver_path: Some("/dev/ttyACM1".into()),
            transmitter_path: None,
        };
        store.save(&cfg).unwrap();
        assert_eq!(store.load().unwrap(), cfg);
    }
}
