//! Ocular Rest Library
//!
//! This library provides the core functionality for the eye-rest reminder.
//! It includes:
//! - Phase timer alternating focus and rest intervals
//! - Settings and session stores that survive restarts
//! - IPC server/client for daemon-CLI communication
//! - CLI command parsing and display utilities
//! - Desktop notifications, audible cues and rest tips

pub mod cli;
pub mod clock;
pub mod config;
pub mod daemon;
pub mod notification;
pub mod sound;
pub mod store;
pub mod tip;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    ActivePhase, DisplayState, IpcRequest, IpcResponse, Phase, SessionState, Settings,
    SettingsPatch,
};

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::DaemonConfig;
pub use daemon::{PhaseDispatcher, PhaseTimer, TimerError, TimerEvent};
pub use store::{SessionStore, SettingsStore, StoreError};

pub use notification::{MockNotifier, Notification, NotificationError, Notifier, Permission};
pub use sound::{CuePlayer, MockCuePlayer, SoundError};
pub use tip::{MockTipSource, TipSource, FALLBACK_TIPS};
