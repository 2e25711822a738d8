//! Desktop notifications via notify-rust.

use std::sync::atomic::{AtomicU8, Ordering};

use super::content::Notification;
use super::error::NotificationError;
use super::{Notifier, Permission};

const APP_NAME: &str = "Ocular Rest";

/// Delivers notifications through the platform notification service.
///
/// On freedesktop systems "permission" means a notification server answered
/// the capability probe; elsewhere it is granted as soon as it is requested.
#[derive(Debug)]
pub struct DesktopNotifier {
    permission: AtomicU8,
    enabled: bool,
}

impl DesktopNotifier {
    /// Creates a notifier. A disabled notifier denies every request.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            permission: AtomicU8::new(Permission::Default as u8),
            enabled,
        }
    }

    fn probe(&self) -> Result<(), NotificationError> {
        if !self.enabled {
            return Err(NotificationError::PermissionDenied);
        }
        probe_server()
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
fn probe_server() -> Result<(), NotificationError> {
    let info = notify_rust::get_server_information()
        .map_err(|e| NotificationError::NotAvailable(e.to_string()))?;
    tracing::debug!("Notification server: {} {}", info.name, info.version);
    Ok(())
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn probe_server() -> Result<(), NotificationError> {
    Ok(())
}

impl Notifier for DesktopNotifier {
    fn permission(&self) -> Permission {
        Permission::from_u8(self.permission.load(Ordering::SeqCst))
    }

    fn request_permission(&self) -> Permission {
        let current = self.permission();
        if current != Permission::Default {
            return current;
        }

        let granted = match self.probe() {
            Ok(()) => Permission::Granted,
            Err(e) => {
                tracing::warn!("Desktop notifications disabled: {}", e);
                Permission::Denied
            }
        };
        self.permission.store(granted as u8, Ordering::SeqCst);
        granted
    }

    fn notify(&self, notification: &Notification) -> Result<(), NotificationError> {
        if self.permission() != Permission::Granted {
            return Err(NotificationError::PermissionDenied);
        }

        let mut native = notify_rust::Notification::new();
        native
            .appname(APP_NAME)
            .summary(&notification.title)
            .body(&notification.body);

        if let Some(icon) = &notification.icon {
            native.icon(icon);
        }

        #[cfg(all(unix, not(target_os = "macos")))]
        if notification.silent {
            native.hint(notify_rust::Hint::SuppressSound(true));
        }

        native
            .show()
            .map(|_| ())
            .map_err(|e| NotificationError::SendFailed(e.to_string()))
    }
}
