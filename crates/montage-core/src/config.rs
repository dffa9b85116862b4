//! Editor preferences, persisted separately from the document.
//!
//! Preferences have their own serialize/load boundary so document state and
//! app configuration never share a persistence contract: the document store
//! knows nothing about this module, and hosts load/save it explicitly at
//! session boundaries.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::DEFAULT_CANVAS_SIZE;
use crate::layer::{DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("could not determine a configuration directory")]
    NoConfigDir,
}

/// App preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Whether drag snapping is active.
    pub snap_enabled: bool,
    /// Whether guide lines are drawn during a snap.
    pub show_guides: bool,
    pub default_font_family: String,
    pub default_font_size: f64,
    pub canvas_width: f64,
    pub canvas_height: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap_enabled: true,
            show_guides: true,
            default_font_family: DEFAULT_FONT_FAMILY.to_string(),
            default_font_size: DEFAULT_FONT_SIZE,
            canvas_width: DEFAULT_CANVAS_SIZE.width,
            canvas_height: DEFAULT_CANVAS_SIZE.height,
        }
    }
}

impl EditorConfig {
    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::ConfigStore;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::{ConfigError, EditorConfig};
    use std::fs;
    use std::path::PathBuf;

    /// File-backed preference store for native platforms.
    ///
    /// Stores the config as a single JSON file; a missing file loads
    /// defaults so first launch needs no setup step.
    pub struct ConfigStore {
        path: PathBuf,
    }

    impl ConfigStore {
        /// Create a store backed by the given file path.
        pub fn new(path: PathBuf) -> Self {
            Self { path }
        }

        /// Create a store in the platform configuration directory.
        pub fn default_location() -> Result<Self, ConfigError> {
            let base = dirs::config_dir()
                .or_else(dirs::home_dir)
                .ok_or(ConfigError::NoConfigDir)?;
            Ok(Self::new(base.join("montage").join("config.json")))
        }

        pub fn path(&self) -> &PathBuf {
            &self.path
        }

        /// Load the stored config, falling back to defaults when the file
        /// does not exist yet.
        pub fn load(&self) -> Result<EditorConfig, ConfigError> {
            if !self.path.exists() {
                log::debug!("no config at {}, using defaults", self.path.display());
                return Ok(EditorConfig::default());
            }
            let json = fs::read_to_string(&self.path)?;
            match EditorConfig::from_json(&json) {
                Ok(config) => Ok(config),
                Err(e) => {
                    log::warn!("failed to parse {}: {}", self.path.display(), e);
                    Err(e.into())
                }
            }
        }

        /// Write the config, creating parent directories as needed.
        pub fn save(&self, config: &EditorConfig) -> Result<(), ConfigError> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&self.path, config.to_json()?)?;
            log::debug!("saved config to {}", self.path.display());
            Ok(())
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("config.json"));

        let mut config = EditorConfig::default();
        config.snap_enabled = false;
        config.default_font_size = 32.0;

        store.save(&config).unwrap();
        let loaded = store.load().unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("absent.json"));

        let loaded = store.load().unwrap();
        assert_eq!(loaded, EditorConfig::default());
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("nested").join("deep").join("config.json"));

        store.save(&EditorConfig::default()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        let store = ConfigStore::new(path);
        assert!(matches!(store.load(), Err(ConfigError::Serialization(_))));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        // Older configs with missing fields still load via serde defaults.
        let partial = r#"{"snap_enabled": false}"#;
        let config = EditorConfig::from_json(partial).unwrap();
        assert!(!config.snap_enabled);
        assert!(config.show_guides);
    }
}
