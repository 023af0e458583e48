use notify_rust::{Notification as RustNotification, Timeout};

use super::error::{NotificationError, Result};
use super::types::Notification;

/// Sends a notification through D-Bus directly when `notify-send` is missing.
/// Blocks until a button is pressed or the notification closes if it has buttons.
pub fn send(notification: &Notification) -> Result<usize> {
    let mut rust_notification = RustNotification::new();
    rust_notification
        .summary(notification.summary())
        .body(notification.body());

    if let Some(app_name) = notification.app_name() {
        rust_notification.appname(app_name);
    }
    if let Some(icon) = notification.icon() {
        rust_notification.icon(icon);
    }
    if let Some(ms) = notification.expire_time_ms() {
        rust_notification.timeout(Timeout::Milliseconds(ms));
    }

    show(rust_notification, notification)
}

#[cfg(all(unix, not(target_os = "macos")))]
fn show(mut rust_notification: RustNotification, notification: &Notification) -> Result<usize> {
    if let Some(urgency) = notification.urgency() {
        rust_notification.urgency(dbus::urgency(urgency));
    }
    if let Some(hint) = dbus::category_hint(notification.categories()) {
        rust_notification.hint(hint);
    }
    for (index, label) in notification.actions().iter().enumerate() {
        rust_notification.action(&(index + 1).to_string(), label);
    }

    let handle = rust_notification
        .show()
        .map_err(|e| NotificationError::NotifyRustFailed(e.to_string()))?;

    if notification.actions().is_empty() {
        return Ok(0);
    }

    let mut pressed = 0;
    handle.wait_for_action(|key| pressed = notification.action_index(key));
    Ok(pressed)
}

/// Urgency, categories and buttons only exist on the D-Bus backend.
#[cfg(not(all(unix, not(target_os = "macos"))))]
fn show(rust_notification: RustNotification, notification: &Notification) -> Result<usize> {
    if !notification.actions().is_empty() {
        tracing::debug!("notification buttons are not supported on this platform");
    }
    rust_notification
        .show()
        .map(|_| 0)
        .map_err(|e| NotificationError::NotifyRustFailed(e.to_string()))
}

#[cfg(all(unix, not(target_os = "macos")))]
mod dbus {
    use notify_rust::Hint;

    use crate::infra::notification::types::Urgency;

    pub(super) fn urgency(urgency: Urgency) -> notify_rust::Urgency {
        match urgency {
            Urgency::Low => notify_rust::Urgency::Low,
            Urgency::Normal => notify_rust::Urgency::Normal,
            Urgency::Critical => notify_rust::Urgency::Critical,
        }
    }

    /// All categories travel in one comma-separated hint.
    pub(super) fn category_hint(categories: &[String]) -> Option<Hint> {
        (!categories.is_empty()).then(|| Hint::Category(categories.join(",")))
    }

}
