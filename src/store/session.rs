//! Session persistence.
//!
//! The session record lets a restarted daemon pick up mid-phase: the end time
//! is absolute, so however long the process was gone, the next resync sees the
//! right remaining time.

use std::path::{Path, PathBuf};

use crate::types::SessionState;

use super::{read_record, remove_record, write_record, StoreError};

/// Reads and writes the `{phase, endTime}` record.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    /// Backing file, or `None` for a store that persists nothing
    path: Option<PathBuf>,
}

impl SessionStore {
    /// File name of the session record inside the data directory.
    pub const FILE_NAME: &'static str = "session.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Creates the store inside a data directory.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(Self::FILE_NAME))
    }

    /// Creates a store that persists nothing and always loads `Paused`.
    pub fn in_memory() -> Self {
        Self { path: None }
    }

    /// Returns the last saved session, or `Paused` on first run or corruption.
    pub fn load(&self) -> SessionState {
        self.path
            .as_deref()
            .and_then(read_record::<SessionState>)
            .unwrap_or_default()
    }

    /// Persists `state`.
    pub fn save(&self, state: &SessionState) -> Result<(), StoreError> {
        match &self.path {
            Some(path) => write_record(path, state),
            None => Ok(()),
        }
    }

    /// Removes the persisted session.
    pub fn clear(&self) -> Result<(), StoreError> {
        match &self.path {
            Some(path) => remove_record(path),
            None => Ok(()),
        }
    }
}
