//! Daemon configuration.
//!
//! Settings the user tunes while the timer runs (durations, mute, coach) live
//! in the settings store. This is the configuration of the daemon process
//! itself: where data lives, how often to poll, which collaborators to enable.
//!
//! Precedence: built-in defaults, then `config.json` in the data directory,
//! then environment variables, then command-line flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Name of the data directory under the home directory.
pub const DATA_DIR_NAME: &str = ".ocular-rest";

/// File name of the optional daemon configuration.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// File name of the daemon socket inside the data directory.
pub const SOCKET_FILE_NAME: &str = "ocular-rest.sock";

/// Environment variables checked, in order, for the tip API key.
pub const API_KEY_ENV_VARS: [&str; 3] = ["OCULAR_REST_API_KEY", "GEMINI_API_KEY", "API_KEY"];

const MIN_POLL_INTERVAL_MS: u64 = 100;
const MAX_POLL_INTERVAL_MS: u64 = 1000;

fn default_poll_interval_ms() -> u64 {
    250
}

fn default_true() -> bool {
    true
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Returns `~/.ocular-rest`, or `./.ocular-rest` when there is no home.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}

// ============================================================================
// TipConfig
// ============================================================================

/// Settings for the text-generation tip service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TipConfig {
    /// API key; without one only local tips are used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the API
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model name used in the request path
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TipConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_endpoint(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// ============================================================================
// DaemonConfig
// ============================================================================

/// Configuration of the daemon process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Directory holding settings, session, config and socket
    #[serde(skip)]
    pub data_dir: PathBuf,

    /// How often the timer is resynced, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Whether desktop notifications are requested at all
    #[serde(default = "default_true")]
    pub notifications: bool,

    /// Whether the audio thread is started at all
    #[serde(default = "default_true")]
    pub sound: bool,

    #[serde(default)]
    pub tip: TipConfig,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            poll_interval_ms: default_poll_interval_ms(),
            notifications: true,
            sound: true,
            tip: TipConfig::default(),
        }
    }
}

impl DaemonConfig {
    /// Loads `config.json` from `data_dir`, then applies the environment.
    ///
    /// A missing or malformed file yields the defaults.
    #[must_use]
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join(CONFIG_FILE_NAME);
        let mut config = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str::<Self>(&raw).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        };

        config.data_dir = data_dir.to_path_buf();
        config.apply_env(|name| std::env::var(name).ok());
        config
    }

    /// Applies environment overrides through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| lookup(*name))
            .find(|value| !value.is_empty())
        {
            self.tip.api_key = Some(key);
        }
    }

    /// Returns the poll interval, clamped to a sane range.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(
            self.poll_interval_ms
                .clamp(MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS),
        )
    }

    /// Returns the path of the daemon socket.
    #[must_use]
    pub fn socket_path(&self) -> PathBuf {
        self.data_dir.join(SOCKET_FILE_NAME)
    }
}
