//! Command definitions for the eye-rest reminder CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::DaemonConfig;
use crate::types::SettingsPatch;

// ============================================================================
// CLI Structure
// ============================================================================

/// Ocular Rest - focus and eye-rest interval reminder
#[derive(Parser, Debug)]
#[command(
    name = "ocular-rest",
    version,
    about = "Eye-rest reminder that alternates focus and rest intervals",
    long_about = "Runs a small daemon that alternates a focus interval with a short eye-rest \
                  break, playing a cue and raising a desktop notification at each change.\n\
                  The other commands talk to that daemon over a Unix socket.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory for settings, session and socket (default: ~/.ocular-rest)
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start a focus interval
    Start,

    /// Pause the running interval
    Pause,

    /// Start when paused, pause otherwise
    Toggle,

    /// Stop and return to the initial state
    Reset,

    /// Show the current phase and time left
    Status,

    /// Keep showing the status until interrupted
    Watch(WatchArgs),

    /// Show the current settings
    Settings,

    /// Change settings
    Set(SetArgs),

    /// Run the timer daemon in the foreground
    Daemon(DaemonArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Watch Arguments
// ============================================================================

/// Arguments for the watch command
#[derive(Args, Debug, Clone)]
pub struct WatchArgs {
    /// Refresh interval in milliseconds (100-10000)
    #[arg(
        short,
        long,
        default_value = "1000",
        value_parser = clap::value_parser!(u64).range(100..=10_000)
    )]
    pub interval: u64,
}

// ============================================================================
// Set Arguments
// ============================================================================

/// Arguments for the set command
#[derive(Args, Debug, Clone, Default)]
pub struct SetArgs {
    /// Focus interval in minutes (1-60)
    #[arg(
        short,
        long,
        value_name = "MINUTES",
        value_parser = clap::value_parser!(u32).range(1..=60)
    )]
    pub work: Option<u32>,

    /// Rest interval in seconds (5-300)
    #[arg(
        short,
        long = "break",
        value_name = "SECONDS",
        value_parser = clap::value_parser!(u32).range(5..=300)
    )]
    pub break_secs: Option<u32>,

    /// Silence the audible cues
    #[arg(long, conflicts_with = "unmute")]
    pub mute: bool,

    /// Play the audible cues
    #[arg(long)]
    pub unmute: bool,

    /// Show the rest tip in the status output
    #[arg(long, conflicts_with = "no_coach")]
    pub coach: bool,

    /// Hide the rest tip
    #[arg(long)]
    pub no_coach: bool,
}

impl SetArgs {
    /// Converts the flags into a partial settings update.
    pub fn to_patch(&self) -> SettingsPatch {
        SettingsPatch {
            work_duration: self.work.map(|minutes| i64::from(minutes) * 60),
            break_duration: self.break_secs.map(i64::from),
            is_muted: flag_pair(self.mute, self.unmute),
            show_coach: flag_pair(self.coach, self.no_coach),
        }
    }
}

/// Maps an on/off flag pair to an optional value.
fn flag_pair(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

// ============================================================================
// Daemon Arguments
// ============================================================================

/// Arguments for the daemon command
#[derive(Args, Debug, Clone, Default)]
pub struct DaemonArgs {
    /// How often to check the deadline, in milliseconds
    #[arg(long, value_name = "MS")]
    pub poll_ms: Option<u64>,

    /// Disable desktop notifications
    #[arg(long)]
    pub no_notify: bool,

    /// Disable audible cues
    #[arg(long)]
    pub no_sound: bool,
}

impl DaemonArgs {
    /// Applies the flags over a loaded configuration.
    pub fn apply(&self, config: &mut DaemonConfig) {
        if let Some(poll_ms) = self.poll_ms {
            config.poll_interval_ms = poll_ms;
        }
        if self.no_notify {
            config.notifications = false;
        }
        if self.no_sound {
            config.sound = false;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
