//! Two-tone cues played on phase changes.

use std::time::Duration;

/// Peak amplitude of every tone.
pub const TONE_AMPLITUDE: f32 = 0.1;

/// A single sine tone within a cue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: f32,
    pub duration: Duration,
    /// Delay from the start of the cue
    pub offset: Duration,
}

impl Tone {
    const fn new(frequency_hz: f32, duration_ms: u64, offset_ms: u64) -> Self {
        Self {
            frequency_hz,
            duration: Duration::from_millis(duration_ms),
            offset: Duration::from_millis(offset_ms),
        }
    }
}

/// Audible cue for a phase change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Rising pair, played when a break begins
    BreakStart,
    /// Falling pair, played when a break ends
    BreakEnd,
}

impl Cue {
    /// Returns the tones making up this cue. The second overlaps the first.
    #[must_use]
    pub fn tones(self) -> [Tone; 2] {
        match self {
            Cue::BreakStart => [Tone::new(880.0, 150, 0), Tone::new(1100.0, 200, 100)],
            Cue::BreakEnd => [Tone::new(1100.0, 150, 0), Tone::new(880.0, 200, 100)],
        }
    }
}
