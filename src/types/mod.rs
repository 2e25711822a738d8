//! Core data types for the eye-rest timer.
//!
//! This module defines the data structures used for:
//! - Phase and session state (with the persisted session record)
//! - User settings and partial settings updates
//! - The derived display state shown by the CLI
//! - IPC request/response serialization

use serde::{Deserialize, Serialize};

/// Default focus interval in seconds (20 minutes).
pub const DEFAULT_WORK_SECONDS: i64 = 20 * 60;

/// Default rest interval in seconds.
pub const DEFAULT_BREAK_SECONDS: i64 = 20;

// ============================================================================
// Phase
// ============================================================================

/// The timer's current mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    /// Focus interval is counting down
    Working,
    /// Rest interval is counting down
    Break,
    /// Nothing is counting down
    #[default]
    Paused,
}

impl Phase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Working => "WORKING",
            Phase::Break => "BREAK",
            Phase::Paused => "PAUSED",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A phase that has a deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePhase {
    Working,
    Break,
}

impl ActivePhase {
    /// Returns the phase that follows this one when its deadline passes.
    pub fn next(self) -> Self {
        match self {
            ActivePhase::Working => ActivePhase::Break,
            ActivePhase::Break => ActivePhase::Working,
        }
    }
}

impl From<ActivePhase> for Phase {
    fn from(phase: ActivePhase) -> Self {
        match phase {
            ActivePhase::Working => Phase::Working,
            ActivePhase::Break => Phase::Break,
        }
    }
}

// ============================================================================
// SessionState
// ============================================================================

/// Persisted timer session.
///
/// A paused session never carries an end time and an active one always does,
/// so the `{phase, endTime}` record is only reachable through the fallible
/// conversion from [`SessionRecord`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SessionRecord", into = "SessionRecord")]
pub enum SessionState {
    #[default]
    Paused,
    Active {
        phase: ActivePhase,
        /// Absolute deadline in Unix milliseconds
        end_time_ms: i64,
    },
}

impl SessionState {
    /// Creates an active session ending at `end_time_ms`.
    pub fn active(phase: ActivePhase, end_time_ms: i64) -> Self {
        SessionState::Active { phase, end_time_ms }
    }

    /// Returns the phase of this session.
    pub fn phase(&self) -> Phase {
        match self {
            SessionState::Paused => Phase::Paused,
            SessionState::Active { phase, .. } => (*phase).into(),
        }
    }

    /// Returns the absolute deadline, if the session is active.
    pub fn end_time_ms(&self) -> Option<i64> {
        match self {
            SessionState::Paused => None,
            SessionState::Active { end_time_ms, .. } => Some(*end_time_ms),
        }
    }

    /// Returns true if a deadline is pending.
    pub fn is_active(&self) -> bool {
        matches!(self, SessionState::Active { .. })
    }
}

/// On-disk shape of the session: `{"phase": "...", "endTime": n|null}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub phase: Phase,
    #[serde(rename = "endTime", default)]
    pub end_time: Option<i64>,
}

impl TryFrom<SessionRecord> for SessionState {
    type Error = String;

    fn try_from(record: SessionRecord) -> Result<Self, Self::Error> {
        match (record.phase, record.end_time) {
            (_, Some(end)) if end < 0 => Err(format!("endTime {end} is before the epoch")),
            (Phase::Paused, None) => Ok(SessionState::Paused),
            (Phase::Working, Some(end)) => Ok(SessionState::active(ActivePhase::Working, end)),
            (Phase::Break, Some(end)) => Ok(SessionState::active(ActivePhase::Break, end)),
            (Phase::Paused, Some(_)) => Err("paused session must not carry an endTime".into()),
            (phase, None) => Err(format!("{phase} session is missing its endTime")),
        }
    }
}

impl From<SessionState> for SessionRecord {
    fn from(state: SessionState) -> Self {
        Self {
            phase: state.phase(),
            end_time: state.end_time_ms(),
        }
    }
}

// ============================================================================
// Settings
// ============================================================================

/// User-tunable durations and preferences.
///
/// Missing fields fall back to their defaults so older or newer settings files
/// keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Focus interval in seconds
    pub work_duration: i64,
    /// Rest interval in seconds
    pub break_duration: i64,
    /// Suppresses audible cues
    pub is_muted: bool,
    /// Shows the rest tip in the status output
    pub show_coach: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_duration: DEFAULT_WORK_SECONDS,
            break_duration: DEFAULT_BREAK_SECONDS,
            is_muted: false,
            show_coach: true,
        }
    }
}

impl Settings {
    /// Merges the fields present in `patch` over these settings.
    pub fn apply(&mut self, patch: &SettingsPatch) {
        if let Some(work) = patch.work_duration {
            self.work_duration = work;
        }
        if let Some(brk) = patch.break_duration {
            self.break_duration = brk;
        }
        if let Some(muted) = patch.is_muted {
            self.is_muted = muted;
        }
        if let Some(coach) = patch.show_coach {
            self.show_coach = coach;
        }
    }

    /// Returns the duration used for `phase`, never less than one second.
    pub fn effective_duration(&self, phase: ActivePhase) -> u32 {
        let configured = match phase {
            ActivePhase::Working => self.work_duration,
            ActivePhase::Break => self.break_duration,
        };
        u32::try_from(configured.max(1)).unwrap_or(u32::MAX)
    }
}

/// Partial settings update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub break_duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_muted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_coach: Option<bool>,
}

impl SettingsPatch {
    /// Returns true if the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.work_duration.is_none()
            && self.break_duration.is_none()
            && self.is_muted.is_none()
            && self.show_coach.is_none()
    }
}

// ============================================================================
// DisplayState
// ============================================================================

/// Derived view of the timer, recomputed on every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayState {
    pub phase: Phase,
    /// Whole seconds left in the displayed phase
    pub time_left: u32,
    /// Fraction of the displayed phase already elapsed, in `[0, 1]`
    pub progress: f64,
    pub current_tip: String,
    pub settings: Settings,
}

// ============================================================================
// IPC Types
// ============================================================================

/// IPC request from client to daemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum IpcRequest {
    /// Begin a focus interval
    Start,
    /// Stop counting down
    Pause,
    /// Start when paused, pause otherwise
    Toggle,
    /// Return to the initial paused state
    Reset,
    /// Query the current display state
    Status,
    /// Recompute from the wall clock and report
    Resync,
    /// Query the current settings
    Settings,
    /// Merge a partial settings update
    Update {
        #[serde(flatten)]
        patch: SettingsPatch,
    },
}

/// IPC response from daemon to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpcResponse {
    /// Response status ("success" or "error")
    pub status: String,
    /// Human-readable message
    pub message: String,
    /// Display state after the request was applied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<DisplayState>,
}

impl IpcResponse {
    /// Creates a success response.
    pub fn success(message: impl Into<String>, data: Option<DisplayState>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            data,
        }
    }

    /// Creates an error response.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            data: None,
        }
    }

    /// Returns true for an error response.
    pub fn is_error(&self) -> bool {
        self.status == "error"
    }
}

// ============================================================================
// Tests
// ============================================================================
