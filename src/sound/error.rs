//! Sound system error types.
//!
//! Audio is optional: every error here ends up logged and swallowed, never
//! shown to the user.

use thiserror::Error;

/// Errors that can occur in the cue playback system.
#[derive(Debug, Error)]
pub enum SoundError {
    /// No audio output device could be opened.
    #[error("Audio device not available: {0}")]
    DeviceNotAvailable(String),

    /// The audio thread could not be started.
    #[error("Failed to start audio thread: {0}")]
    ThreadSpawnFailed(String),

    /// The audio thread has exited and no longer accepts cues.
    #[error("Audio thread is gone")]
    Disconnected,

    /// Mixing a tone into the output stream failed.
    #[error("Sound playback error: {0}")]
    PlaybackError(String),
}
