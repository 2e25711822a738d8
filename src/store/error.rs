//! Persistence error types.

use thiserror::Error;

/// Errors that can occur while writing persisted records.
///
/// Reads never fail: a missing or unreadable record loads as its default.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The data directory could not be created.
    #[error("Failed to create data directory: {0}")]
    CreateDirFailed(String),

    /// The record could not be serialized.
    #[error("Failed to serialize record: {0}")]
    SerializeFailed(String),

    /// The record could not be written to disk.
    #[error("Failed to write record: {0}")]
    WriteFailed(String),

    /// The record could not be removed.
    #[error("Failed to remove record: {0}")]
    RemoveFailed(String),
}
