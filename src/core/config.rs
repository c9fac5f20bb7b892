//! Persisted tool settings
//!
//! One record with one recognized key: the folder the machines drop their
//! part preview images into. The store is created with documented defaults
//! the first time it is needed; a store that cannot be read or written never
//! fails the caller.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Folder scanned when neither the flag, the environment, nor the store
/// provides one.
pub const DEFAULT_IMAGE_FOLDER: &str = "parts";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root folder holding the part preview images.
    pub image_folder: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            image_folder: PathBuf::from(DEFAULT_IMAGE_FOLDER),
        }
    }
}

impl Settings {
    /// Load the per-user settings record, creating and persisting the
    /// default one on first use.
    pub fn load_or_init() -> Self {
        match Self::path() {
            Some(path) => Self::load_or_init_at(&path),
            None => Self::default(),
        }
    }

    /// Load the settings record at `path`, writing the default record there
    /// when it is missing or unreadable.
    pub fn load_or_init_at(path: &Path) -> Self {
        if let Ok(contents) = std::fs::read_to_string(path) {
            if let Ok(settings) = serde_yml::from_str(&contents) {
                return settings;
            }
        }

        let settings = Self::default();
        let _ = settings.save_at(path);
        settings
    }

    /// Write the record to `path`, creating parent directories on demand.
    pub fn save_at(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_yml::to_string(self)
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        std::fs::write(path, contents)
    }

    /// Path of the per-user settings file.
    pub fn path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "cutlist")
            .map(|dirs| dirs.config_dir().join("settings.yaml"))
    }
}
