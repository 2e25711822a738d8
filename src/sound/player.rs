//! Cue player implementation using rodio.
//!
//! The rodio output stream cannot move between threads, so it lives on a
//! dedicated audio thread. `RodioCuePlayer` is only a channel sender and is
//! cheap to share with the async side.

use std::thread;

use crossbeam_channel::{Receiver, Sender};
use rodio::source::{SineWave, Source};
use rodio::{OutputStream, OutputStreamHandle};
use tracing::{debug, warn};

use super::cue::{Cue, TONE_AMPLITUDE};
use super::error::SoundError;

/// Plays cues on a background audio thread.
///
/// The output device is opened on the first cue, not at construction, and
/// reopened on later cues if that failed. Without a device cues are dropped.
#[derive(Debug, Clone)]
pub struct RodioCuePlayer {
    tx: Sender<Cue>,
}

impl RodioCuePlayer {
    /// Starts the audio thread.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::ThreadSpawnFailed` if the OS refuses the thread.
    pub fn spawn() -> Result<Self, SoundError> {
        let (tx, rx) = crossbeam_channel::unbounded();

        thread::Builder::new()
            .name("ocular-audio".to_string())
            .spawn(move || audio_loop(rx))
            .map_err(|e| SoundError::ThreadSpawnFailed(e.to_string()))?;

        Ok(Self { tx })
    }

    /// Queues a cue for playback without waiting for it.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::Disconnected` if the audio thread has exited.
    pub fn play(&self, cue: Cue) -> Result<(), SoundError> {
        self.tx.send(cue).map_err(|_| SoundError::Disconnected)
    }
}

/// Receives cues until every sender is dropped.
fn audio_loop(rx: Receiver<Cue>) {
    let mut output: Option<(OutputStream, OutputStreamHandle)> = None;

    for cue in rx.iter() {
        if output.is_none() {
            output = open_output()
                .inspect_err(|e| debug!("Skipping {:?} cue: {}", cue, e))
                .ok();
        }

        let Some((_stream, handle)) = &output else {
            continue;
        };

        if let Err(e) = play_cue(handle, cue) {
            warn!("Failed to play {:?} cue: {}", cue, e);
        }
    }

    debug!("Audio thread exiting");
}

fn open_output() -> Result<(OutputStream, OutputStreamHandle), SoundError> {
    let output =
        OutputStream::try_default().map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;
    debug!("Audio output stream initialized");
    Ok(output)
}

/// Mixes both tones of a cue into the output stream.
fn play_cue(handle: &OutputStreamHandle, cue: Cue) -> Result<(), SoundError> {
    for tone in cue.tones() {
        let source = SineWave::new(tone.frequency_hz)
            .take_duration(tone.duration)
            .amplify(TONE_AMPLITUDE)
            .delay(tone.offset);

        handle
            .play_raw(source)
            .map_err(|e| SoundError::PlaybackError(e.to_string()))?;
    }

    debug!("Playing {:?} cue", cue);
    Ok(())
}
