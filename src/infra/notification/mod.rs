mod error;
mod fallback;
mod notify_send;
mod types;

pub use error::{NotificationError, Result};
pub use types::{Notification, Urgency};

use crate::backend::is_available;
use crate::process::ProcessRunner;

/// Sends a notification using the best available method.
/// Prefers `notify-send`, falls back to notify-rust.
///
/// Returns the 1-based index of the button the user pressed, or 0 when the
/// notification closed or expired without one.
pub fn notify(runner: &dyn ProcessRunner, notification: &Notification) -> Result<usize> {
    if is_notify_send_available(runner) {
        notify_send::send(runner, notification)
    } else {
        tracing::debug!("{} not found, using notify-rust", notify_send::BINARY);
        fallback::send(notification)
    }
}

/// Checks if notify-send is available on the system.
pub fn is_notify_send_available(runner: &dyn ProcessRunner) -> bool {
    is_available(runner, notify_send::BINARY)
}
