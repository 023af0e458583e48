use crate::backend::{DialogOptions, ListStyle};
use crate::process::{ExecOptions, ProcessRunner};

use super::error::{NotificationError, Result};
use super::types::Notification;

pub const BINARY: &str = "notify-send";

/// Sends a notification with `notify-send`, waiting for a button when any are
/// attached. Returns the 1-based index of the pressed button or 0.
pub fn send(runner: &dyn ProcessRunner, notification: &Notification) -> Result<usize> {
    let output = runner.exec(BINARY, &command_args(notification), &ExecOptions::default())?;

    if !output.success {
        return Err(NotificationError::NotifySendFailed(
            output.stderr.trim().to_string(),
        ));
    }

    Ok(notification.action_index(output.value()))
}

fn command_args(notification: &Notification) -> Vec<String> {
    let mut options = DialogOptions::new()
        .set_opt("app_name", notification.app_name())
        .set_opt("urgency", notification.urgency().map(|u| u.as_str()))
        .set_opt("expire_time", notification.expire_time_ms())
        .set_opt("icon", notification.icon());
    if !notification.categories().is_empty() {
        options = options.set("category", notification.categories().to_vec());
    }

    // Categories share one comma-separated flag; actions need one flag each.
    let mut args = options.to_args(ListStyle::Joined(','));
    for (index, label) in notification.actions().iter().enumerate() {
        args.extend(["--action".to_string(), format!("{}={label}", index + 1)]);
    }
    args.extend([
        notification.summary().to_string(),
        notification.body().to_string(),
    ]);
    args
}
