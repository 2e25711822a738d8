//! Display utilities for the eye-rest reminder CLI.
//!
//! This module provides formatted output for:
//! - Intent confirmations
//! - Error messages
//! - Status display with a progress bar
//! - Settings listing

use crate::types::{DisplayState, IpcResponse, Phase, Settings};

/// Width of the progress bar in characters.
const BAR_WIDTH: usize = 20;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows the daemon's confirmation followed by the status line.
    pub fn show_action(response: &IpcResponse) {
        if !response.message.is_empty() {
            println!("* {}", response.message);
        }
        if let Some(data) = &response.data {
            println!("  {}", Self::status_line(data));
        }
    }

    /// Shows the current timer status.
    pub fn show_status(response: &IpcResponse) {
        match &response.data {
            Some(data) => print!("{}", Self::render_status(data)),
            None => println!("No status available"),
        }
    }

    /// Shows the current settings.
    pub fn show_settings(response: &IpcResponse) {
        match &response.data {
            Some(data) => print!("{}", Self::render_settings(&data.settings)),
            None => println!("No settings available"),
        }
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("Error: {}", message);
    }

    /// Renders the multi-line status block.
    pub fn render_status(state: &DisplayState) -> String {
        let mut out = String::new();
        out.push_str("Ocular Rest\n");
        out.push_str("─────────────────────────────\n");
        out.push_str(&format!(
            "{:<10}{}\n",
            Self::phase_label(state.phase),
            Self::format_time(state.time_left)
        ));
        out.push_str(&format!(
            "{} {:>3}%\n",
            Self::progress_bar(state.progress),
            Self::percent(state.progress)
        ));

        if state.settings.show_coach && state.phase == Phase::Break {
            out.push_str(&format!("\n{}\n", state.current_tip));
        }
        out
    }

    /// Renders the one-line status used by `watch`.
    pub fn status_line(state: &DisplayState) -> String {
        format!(
            "{:<10}{} {} {:>3}%",
            Self::phase_label(state.phase),
            Self::format_time(state.time_left),
            Self::progress_bar(state.progress),
            Self::percent(state.progress)
        )
    }

    /// Renders the settings listing.
    pub fn render_settings(settings: &Settings) -> String {
        format!(
            "Focus:  {}\nRest:   {}s\nMuted:  {}\nCoach:  {}\n",
            Self::format_time(u32::try_from(settings.work_duration.max(0)).unwrap_or(u32::MAX)),
            settings.break_duration,
            Self::yes_no(settings.is_muted),
            Self::yes_no(settings.show_coach),
        )
    }

    fn phase_label(phase: Phase) -> &'static str {
        match phase {
            Phase::Working => "Focusing",
            Phase::Break => "Resting",
            Phase::Paused => "Paused",
        }
    }

    /// Formats seconds as `mm:ss`; minutes are not capped at 59.
    fn format_time(total_seconds: u32) -> String {
        format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
    }

    fn progress_bar(progress: f64) -> String {
        let filled = (progress.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
        format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
    }

    fn percent(progress: f64) -> u32 {
        (progress.clamp(0.0, 1.0) * 100.0).round() as u32
    }

    fn yes_no(value: bool) -> &'static str {
        if value {
            "yes"
        } else {
            "no"
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
