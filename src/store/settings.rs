//! Settings persistence.

use std::path::{Path, PathBuf};

use crate::types::{Settings, SettingsPatch};

use super::{read_record, write_record, StoreError};

/// Holds the current settings and writes every change through to disk.
///
/// The store does not validate values; durations of zero or below are kept as
/// given and floored when the timer uses them.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    /// Backing file, or `None` for an in-memory store
    path: Option<PathBuf>,
    settings: Settings,
}

impl SettingsStore {
    /// File name of the settings record inside the data directory.
    pub const FILE_NAME: &'static str = "settings.json";

    /// Opens the store backed by `path`, loading whatever is persisted there.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = Self::load(&path);
        Self {
            path: Some(path),
            settings,
        }
    }

    /// Opens the store inside a data directory.
    pub fn in_dir(dir: &Path) -> Self {
        Self::open(dir.join(Self::FILE_NAME))
    }

    /// Creates a store that never touches the disk.
    pub fn in_memory(settings: Settings) -> Self {
        Self {
            path: None,
            settings,
        }
    }

    /// Reads the settings persisted at `path`, falling back to defaults.
    pub fn load(path: &Path) -> Settings {
        read_record(path).unwrap_or_default()
    }

    /// Returns the current settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Merges `patch` over the current settings and persists the result.
    ///
    /// The in-memory settings change even when the write fails.
    pub fn update(&mut self, patch: &SettingsPatch) -> Result<&Settings, StoreError> {
        self.settings.apply(patch);
        if let Some(path) = &self.path {
            write_record(path, &self.settings)?;
        }
        Ok(&self.settings)
    }
}
