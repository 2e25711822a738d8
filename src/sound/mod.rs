//! Audible cues for phase changes.
//!
//! This module provides:
//!
//! - The two-tone cue definitions (`BreakStart` rising, `BreakEnd` falling)
//! - A rodio-backed player running on its own audio thread
//! - Graceful degradation when no audio device is available
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐  crossbeam   ┌──────────────────┐
//! │  RodioCuePlayer  │─────────────▶│   audio thread   │
//! │ (Send + Sync)    │     Cue      │ OutputStream +   │
//! └──────────────────┘              │ SineWave tones   │
//!                                   └──────────────────┘
//! ```

mod cue;
mod error;
mod player;

pub use cue::{Cue, Tone, TONE_AMPLITUDE};
pub use error::SoundError;
pub use player::RodioCuePlayer;

/// Fire-and-forget cue playback.
///
/// Implementations never block and never report failure to the caller; a
/// missing audio device simply means silence.
pub trait CuePlayer: Send + Sync {
    /// Plays the cue announcing the start of a break.
    fn play_break_start(&self);

    /// Plays the cue announcing the end of a break.
    fn play_break_end(&self);
}

impl CuePlayer for RodioCuePlayer {
    fn play_break_start(&self) {
        if let Err(e) = self.play(Cue::BreakStart) {
            tracing::debug!("Break start cue dropped: {}", e);
        }
    }

    fn play_break_end(&self) {
        if let Err(e) = self.play(Cue::BreakEnd) {
            tracing::debug!("Break end cue dropped: {}", e);
        }
    }
}

/// Player that stays silent, used when audio cannot be set up at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentCuePlayer;

impl CuePlayer for SilentCuePlayer {
    fn play_break_start(&self) {}

    fn play_break_end(&self) {}
}

/// Returns the rodio player, or a silent one if the audio thread won't start.
#[must_use]
pub fn try_create_player() -> std::sync::Arc<dyn CuePlayer> {
    match RodioCuePlayer::spawn() {
        Ok(player) => std::sync::Arc::new(player),
        Err(e) => {
            tracing::warn!("Audio not available, cues disabled: {}", e);
            std::sync::Arc::new(SilentCuePlayer)
        }
    }
}

/// Mock cue player for testing.
#[derive(Debug, Default)]
pub struct MockCuePlayer {
    cues: std::sync::Mutex<Vec<Cue>>,
}

impl MockCuePlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn play_count(&self) -> usize {
        self.cues.lock().unwrap().len()
    }

    #[must_use]
    pub fn get_cues(&self) -> Vec<Cue> {
        self.cues.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.cues.lock().unwrap().clear();
    }
}

impl CuePlayer for MockCuePlayer {
    fn play_break_start(&self) {
        self.cues.lock().unwrap().push(Cue::BreakStart);
    }

    fn play_break_end(&self) {
        self.cues.lock().unwrap().push(Cue::BreakEnd);
    }
}
