//! Persistence for settings and the timer session.
//!
//! Each record is a small JSON file in the data directory. Writes are
//! synchronous and go through a temporary file plus rename so a crash never
//! leaves a half-written record behind. Reads are forgiving: a missing file
//! loads the default, a corrupt one is logged and replaced by the default.

mod error;
mod session;
mod settings;

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

pub use error::StoreError;
pub use session::SessionStore;
pub use settings::SettingsStore;

/// Reads a JSON record, returning `None` when it is absent or unreadable.
fn read_record<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No record at {:?}, using defaults", path);
            return None;
        }
        Err(e) => {
            tracing::warn!("Failed to read {:?}, using defaults: {}", path, e);
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("Discarding corrupt record {:?}: {}", path, e);
            None
        }
    }
}

/// Writes a JSON record atomically, creating the parent directory if needed.
fn write_record<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| StoreError::CreateDirFailed(format!("{}: {}", parent.display(), e)))?;
    }

    let json =
        serde_json::to_vec_pretty(value).map_err(|e| StoreError::SerializeFailed(e.to_string()))?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)
        .map_err(|e| StoreError::WriteFailed(format!("{}: {}", tmp.display(), e)))?;
    fs::rename(&tmp, path)
        .map_err(|e| StoreError::WriteFailed(format!("{}: {}", path.display(), e)))?;

    Ok(())
}

/// Removes a record. A record that is already gone counts as removed.
fn remove_record(path: &Path) -> Result<(), StoreError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StoreError::RemoveFailed(format!("{}: {}", path.display(), e))),
    }
}
