//! Progress bars that keep running while the caller works.
//!
//! kdialog exposes its progress dialog over D-Bus ([`RemoteProgress`]); zenity
//! reads updates from stdin, which [`PipeProgress`] feeds through a FIFO relay.

mod fifo;
pub mod pipe;
pub mod remote;

pub use pipe::PipeProgress;
pub use remote::RemoteProgress;

use crate::error::{DialogError, Result};

/// A live progress dialog.
///
/// Handles start `Active` and become `Closed` through [`ProgressBar::close`],
/// by reaching their size with auto-close, or when the dialog goes away on its
/// own. Updates to a closed handle are silently ignored.
pub trait ProgressBar {
    fn set_label_text(&mut self, text: &str) -> Result<()>;

    /// Moves the bar to `value`, in units of the size given at construction.
    fn set_progress(&mut self, value: u64) -> Result<()>;

    /// Last value passed to [`ProgressBar::set_progress`].
    fn progress(&self) -> u64;

    fn is_active(&self) -> bool;

    fn close(&mut self) -> Result<()>;
}

pub(crate) fn require_size(size: u64) -> Result<()> {
    if size == 0 {
        return Err(DialogError::precondition("progress bar size must be positive"));
    }
    Ok(())
}
