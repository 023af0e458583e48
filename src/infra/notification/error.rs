use thiserror::Error;

use crate::error::DialogError;

/// Errors that can occur during notification operations.
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("notify-send failed: {0}")]
    NotifySendFailed(String),

    #[error("notify-rust failed: {0}")]
    NotifyRustFailed(String),

    #[error(transparent)]
    Process(#[from] DialogError),
}

pub type Result<T> = std::result::Result<T, NotificationError>;
