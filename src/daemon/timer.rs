//! Phase timer for the eye-rest reminder.
//!
//! This module provides the core state machine:
//! - State transitions (Paused → Working ⇄ Break)
//! - Remaining time derived from an absolute deadline and the wall clock
//! - Event firing for cues, notifications and tips
//! - Session persistence so a restart resumes mid-phase
//!
//! `resync` is the only place a deadline is checked. It runs on every poll and
//! before every client request, advances at most one phase per call, and
//! computes the new deadline from "now" rather than from the stale one.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::clock::Clock;
use crate::store::{SessionStore, SettingsStore};
use crate::types::{ActivePhase, DisplayState, Phase, SessionState, Settings, SettingsPatch};

/// Shown as the current tip while a fresh one is being fetched.
pub const TIP_PLACEHOLDER: &str =
    "Look at an object at least 20 feet away to relax your eye muscles.";

// ============================================================================
// TimerEvent
// ============================================================================

/// Timer events for cues, notifications and tips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// A phase with a deadline was entered
    PhaseEntered {
        phase: ActivePhase,
        /// Length of the new phase in seconds
        duration_secs: u32,
        /// Mute preference at the moment of entry
        muted: bool,
        /// Identifies this entry; tips carry it back
        generation: u64,
    },
    /// Timer paused by the user
    Paused,
    /// Timer reset by the user
    Reset,
}

// ============================================================================
// TimerError
// ============================================================================

/// Errors returned for intents that are invalid in the current phase.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimerError {
    /// `start` while a phase is counting down
    #[error("Timer is already running")]
    AlreadyRunning,

    /// `pause` while nothing is counting down
    #[error("Timer is not running")]
    NotRunning,
}

// ============================================================================
// PhaseTimer
// ============================================================================

/// Owns the session and settings and decides when phases change.
pub struct PhaseTimer {
    settings: SettingsStore,
    sessions: SessionStore,
    session: SessionState,
    clock: Arc<dyn Clock>,
    event_tx: mpsc::UnboundedSender<TimerEvent>,
    /// Seconds shown for the displayed phase
    time_left: u32,
    /// Length of the displayed phase, committed on entry
    phase_total: u32,
    /// Paused with the configured work duration on display
    idle: bool,
    current_tip: Option<String>,
    /// Bumped on every phase entry and reset
    generation: u64,
}

impl PhaseTimer {
    /// Creates a paused timer. Nothing is read from the session store.
    pub fn new(
        settings: SettingsStore,
        sessions: SessionStore,
        clock: Arc<dyn Clock>,
        event_tx: mpsc::UnboundedSender<TimerEvent>,
    ) -> Self {
        let work = settings.settings().effective_duration(ActivePhase::Working);
        Self {
            settings,
            sessions,
            session: SessionState::Paused,
            clock,
            event_tx,
            time_left: work,
            phase_total: work,
            idle: true,
            current_tip: None,
            generation: 0,
        }
    }

    /// Creates a timer and resumes whatever session was persisted.
    ///
    /// An active session is resynced immediately, so a deadline that passed
    /// while the daemon was down advances one phase right away.
    pub fn restore(
        settings: SettingsStore,
        sessions: SessionStore,
        clock: Arc<dyn Clock>,
        event_tx: mpsc::UnboundedSender<TimerEvent>,
    ) -> Self {
        let persisted = sessions.load();
        let mut timer = Self::new(settings, sessions, clock, event_tx);

        if let SessionState::Active { phase, .. } = persisted {
            tracing::info!("Resuming {} session", Phase::from(phase));
            timer.session = persisted;
            timer.phase_total = timer.settings.settings().effective_duration(phase);
            timer.idle = false;
            timer.resync();
        }

        timer
    }

    // ------------------------------------------------------------------------
    // Intents
    // ------------------------------------------------------------------------

    /// Starts a focus interval.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::AlreadyRunning` unless the timer is paused.
    pub fn start(&mut self) -> Result<(), TimerError> {
        if self.session.is_active() {
            return Err(TimerError::AlreadyRunning);
        }

        self.enter_phase(ActivePhase::Working);
        Ok(())
    }

    /// Stops the countdown, keeping the remaining time on display.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::NotRunning` if the timer is already paused.
    pub fn pause(&mut self) -> Result<(), TimerError> {
        if !self.session.is_active() {
            return Err(TimerError::NotRunning);
        }

        // Freeze the display at the true remaining time, not the last poll.
        self.time_left = self.remaining_secs().unwrap_or(self.time_left);
        self.session = SessionState::Paused;
        self.persist_session();
        self.emit(TimerEvent::Paused);

        Ok(())
    }

    /// Starts when paused, pauses otherwise.
    pub fn toggle(&mut self) -> Phase {
        match self.session {
            SessionState::Paused => {
                self.enter_phase(ActivePhase::Working);
            }
            SessionState::Active { .. } => {
                // Cannot fail: the session is active.
                let _ = self.pause();
            }
        }
        self.session.phase()
    }

    /// Returns to the initial paused state and forgets the persisted session.
    pub fn reset(&mut self) {
        self.session = SessionState::Paused;
        if let Err(e) = self.sessions.clear() {
            tracing::warn!("Failed to clear session: {}", e);
        }

        let work = self.settings().effective_duration(ActivePhase::Working);
        self.time_left = work;
        self.phase_total = work;
        self.idle = true;
        self.current_tip = None;
        self.generation += 1;

        self.emit(TimerEvent::Reset);
    }

    /// Merges a settings update and persists it.
    ///
    /// A running phase keeps its deadline; the new durations apply from the
    /// next transition. While idle the displayed work duration follows.
    pub fn update_settings(&mut self, patch: &SettingsPatch) -> &Settings {
        if let Err(e) = self.settings.update(patch) {
            tracing::warn!("Failed to persist settings: {}", e);
        }

        if self.idle {
            let work = self.settings().effective_duration(ActivePhase::Working);
            self.time_left = work;
            self.phase_total = work;
        }

        self.settings.settings()
    }

    // ------------------------------------------------------------------------
    // Resync
    // ------------------------------------------------------------------------

    /// Recomputes remaining time from the clock and performs a due transition.
    ///
    /// Returns true if a phase transition happened. Calling it again at the
    /// same instant never transitions twice.
    pub fn resync(&mut self) -> bool {
        let SessionState::Active { phase, .. } = self.session else {
            return false;
        };
        let Some(remaining) = self.remaining_secs() else {
            return false;
        };

        if remaining > 0 {
            self.time_left = remaining;
            return false;
        }

        tracing::debug!("{} deadline reached", Phase::from(phase));
        self.enter_phase(phase.next());
        true
    }

    /// Whole seconds until the deadline, rounded up, or `None` when paused.
    fn remaining_secs(&self) -> Option<u32> {
        let end = self.session.end_time_ms()?;
        let millis = end.saturating_sub(self.clock.now_ms()).max(0);
        let secs = millis.saturating_add(999) / 1000;
        Some(u32::try_from(secs).unwrap_or(u32::MAX))
    }

    /// Commits a new phase with a fresh deadline and announces it.
    fn enter_phase(&mut self, phase: ActivePhase) {
        let duration = self.settings().effective_duration(phase);
        let end_time_ms = self
            .clock
            .now_ms()
            .saturating_add(i64::from(duration) * 1000);

        self.session = SessionState::active(phase, end_time_ms);
        self.time_left = duration;
        self.phase_total = duration;
        self.idle = false;
        self.generation += 1;

        if phase == ActivePhase::Break {
            self.current_tip = None;
        }

        self.persist_session();
        tracing::info!("Entered {} for {}s", Phase::from(phase), duration);

        self.emit(TimerEvent::PhaseEntered {
            phase,
            duration_secs: duration,
            muted: self.settings().is_muted,
            generation: self.generation,
        });
    }

    // ------------------------------------------------------------------------
    // Tips
    // ------------------------------------------------------------------------

    /// Attaches a fetched tip if the break that asked for it is still running.
    ///
    /// Returns false and drops the tip when the phase changed in the meantime.
    pub fn attach_tip(&mut self, generation: u64, tip: String) -> bool {
        let still_current = generation == self.generation
            && self.session.phase() == Phase::Break;

        if still_current {
            self.current_tip = Some(tip);
        } else {
            tracing::debug!(
                generation,
                current = self.generation,
                "Dropping tip for a phase that already ended"
            );
        }
        still_current
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Returns the derived display state.
    pub fn snapshot(&self) -> DisplayState {
        let total = f64::from(self.phase_total.max(1));
        let progress = (1.0 - f64::from(self.time_left) / total).clamp(0.0, 1.0);

        DisplayState {
            phase: self.session.phase(),
            time_left: self.time_left,
            progress,
            current_tip: self
                .current_tip
                .clone()
                .unwrap_or_else(|| TIP_PLACEHOLDER.to_string()),
            settings: self.settings().clone(),
        }
    }

    /// Returns the current session.
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Returns the current settings.
    pub fn settings(&self) -> &Settings {
        self.settings.settings()
    }

    /// Returns the current generation, bumped on phase entry and reset.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn persist_session(&self) {
        if let Err(e) = self.sessions.save(&self.session) {
            tracing::warn!("Failed to persist session: {}", e);
        }
    }

    fn emit(&self, event: TimerEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::debug!("No event listener, dropping timer event");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
