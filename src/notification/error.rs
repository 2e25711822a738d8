//! Notification system error types.

use thiserror::Error;

/// Errors that can occur in the notification system.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// Notifications have not been permitted.
    #[error("Notification permission not granted")]
    PermissionDenied,

    /// No notification server is reachable.
    #[error("Notification service not available: {0}")]
    NotAvailable(String),

    /// The notification could not be delivered.
    #[error("Failed to send notification: {0}")]
    SendFailed(String),
}

impl NotificationError {
    /// Returns true if this error is related to permissions.
    #[must_use]
    pub fn is_permission_error(&self) -> bool {
        matches!(self, Self::PermissionDenied | Self::NotAvailable(_))
    }
}
