//! Desktop notification integration.
//!
//! This module provides:
//!
//! - A one-time, lazy permission request
//! - Content builders for the break and focus notifications
//! - A notify-rust backed notifier and a recording mock
//!
//! Delivery is best-effort. Without permission nothing is sent, and send
//! failures are logged by the caller and otherwise ignored.

mod content;
mod desktop;
pub mod error;

pub use self::content::{break_started, focus_started, Notification, BREAK_ICON_URL};
pub use self::desktop::DesktopNotifier;
pub use self::error::NotificationError;

/// Whether the host allows notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Permission {
    /// Not requested yet
    Default = 0,
    Granted = 1,
    Denied = 2,
}

impl Permission {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Permission::Granted,
            2 => Permission::Denied,
            _ => Permission::Default,
        }
    }
}

/// Sends notifications to the user.
pub trait Notifier: Send + Sync {
    /// Returns the current permission without requesting it.
    fn permission(&self) -> Permission;

    /// Requests permission once; later calls return the settled answer.
    ///
    /// May block while the notification service is probed.
    fn request_permission(&self) -> Permission;

    /// Delivers a notification. May block.
    fn notify(&self, notification: &Notification) -> Result<(), NotificationError>;
}

/// Mock notifier for testing.
#[derive(Debug)]
pub struct MockNotifier {
    notifications: std::sync::Mutex<Vec<Notification>>,
    permission: std::sync::Mutex<Permission>,
    grant_on_request: std::sync::atomic::AtomicBool,
    should_fail: std::sync::atomic::AtomicBool,
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNotifier {
    /// Creates a mock that already has permission.
    #[must_use]
    pub fn new() -> Self {
        Self {
            notifications: std::sync::Mutex::new(Vec::new()),
            permission: std::sync::Mutex::new(Permission::Granted),
            grant_on_request: std::sync::atomic::AtomicBool::new(true),
            should_fail: std::sync::atomic::AtomicBool::new(false),
        }
    }

    /// Creates a mock whose permission request will be denied.
    #[must_use]
    pub fn denied() -> Self {
        let mock = Self::new();
        *mock.permission.lock().unwrap() = Permission::Default;
        mock.grant_on_request
            .store(false, std::sync::atomic::Ordering::SeqCst);
        mock
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail
            .store(should_fail, std::sync::atomic::Ordering::SeqCst);
    }

    #[must_use]
    pub fn get_notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    #[must_use]
    pub fn notification_count(&self) -> usize {
        self.notifications.lock().unwrap().len()
    }

    pub fn clear_recorded(&self) {
        self.notifications.lock().unwrap().clear();
    }
}

impl Notifier for MockNotifier {
    fn permission(&self) -> Permission {
        *self.permission.lock().unwrap()
    }

    fn request_permission(&self) -> Permission {
        let mut permission = self.permission.lock().unwrap();
        if *permission == Permission::Default {
            *permission = if self
                .grant_on_request
                .load(std::sync::atomic::Ordering::SeqCst)
            {
                Permission::Granted
            } else {
                Permission::Denied
            };
        }
        *permission
    }

    fn notify(&self, notification: &Notification) -> Result<(), NotificationError> {
        if self.should_fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(NotificationError::SendFailed("Mock failure".to_string()));
        }
        self.notifications
            .lock()
            .unwrap()
            .push(notification.clone());
        Ok(())
    }
}
