//! Notification content for phase changes.

/// Icon shown with the break notification.
pub const BREAK_ICON_URL: &str = "https://cdn-icons-png.flaticon.com/512/3233/3233483.png";

/// A desktop notification ready to be delivered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: Option<String>,
    /// Asks the notification server not to play its own sound
    pub silent: bool,
}

impl Notification {
    #[must_use]
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            icon: None,
            silent: false,
        }
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }
}

/// Builds the notification raised when a break begins.
#[must_use]
pub fn break_started(break_secs: u32, tip: &str, muted: bool) -> Notification {
    Notification::new(
        "Ocular Rest Time!",
        format!("Look away from the screen for {break_secs} seconds. {tip}"),
    )
    .icon(BREAK_ICON_URL)
    .silent(muted)
}

/// Builds the notification raised when a focus interval begins.
#[must_use]
pub fn focus_started(work_secs: u32, muted: bool) -> Notification {
    Notification::new(
        "Focus Session Started",
        format!("Next rest in {} minutes.", rounded_minutes(work_secs)),
    )
    .silent(muted)
}

/// Rounds seconds to the nearest whole minute, halves rounding up.
fn rounded_minutes(secs: u32) -> u32 {
    secs.saturating_add(30) / 60
}
