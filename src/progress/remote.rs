use std::sync::Arc;

use super::{ProgressBar, require_size};
use crate::backend::{DialogOptions, ListStyle, kdialog};
use crate::error::{DialogError, Result};
use crate::process::{ExecOptions, ProcessRunner};

const QDBUS: &str = "qdbus";

/// kdialog progress dialog driven through `qdbus`.
pub struct RemoteProgress {
    runner: Arc<dyn ProcessRunner>,
    service: String,
    path: String,
    size: u64,
    value: u64,
    auto_close: bool,
    active: bool,
}

impl RemoteProgress {
    /// Opens `kdialog --progressbar` and connects to the dialog it reports.
    pub(crate) fn start(
        runner: Arc<dyn ProcessRunner>,
        text: &str,
        size: u64,
        auto_close: bool,
        options: &DialogOptions,
    ) -> Result<Self> {
        require_size(size)?;

        let mut args = options.to_args(ListStyle::Repeated);
        args.extend([
            "--progressbar".to_string(),
            text.to_string(),
            size.to_string(),
        ]);
        let output = runner.exec(kdialog::BINARY, &args, &ExecOptions::default())?;

        let mut reference = output.value().split_whitespace();
        let (Some(service), Some(path), None) =
            (reference.next(), reference.next(), reference.next())
        else {
            return Err(DialogError::protocol(kdialog::BINARY, output.value()));
        };

        let mut bar = Self {
            runner,
            service: service.to_string(),
            path: path.to_string(),
            size,
            value: 0,
            auto_close,
            active: true,
        };
        tracing::debug!(service = %bar.service, "progress dialog opened");

        if auto_close {
            bar.call(&["Set", "", "autoClose", "true"])?;
        }
        Ok(bar)
    }

    /// D-Bus service name of the dialog.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Invokes a method on the dialog. A failure means the dialog is gone.
    fn call(&mut self, method: &[&str]) -> Result<()> {
        let mut args = vec![self.service.clone(), self.path.clone()];
        args.extend(method.iter().map(|s| s.to_string()));

        let output = self.runner.exec(QDBUS, &args, &ExecOptions::default())?;
        if !output.success {
            tracing::debug!(service = %self.service, "progress dialog no longer reachable");
            self.active = false;
        }
        Ok(())
    }
}

impl ProgressBar for RemoteProgress {
    fn set_label_text(&mut self, text: &str) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.call(&["setLabelText", text])
    }

    fn set_progress(&mut self, value: u64) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.value = value.min(self.size);
        let value = self.value.to_string();
        self.call(&["Set", "", "value", &value])?;

        if self.auto_close && self.value >= self.size {
            tracing::debug!(service = %self.service, "progress complete, dialog closes itself");
            self.active = false;
        }
        Ok(())
    }

    fn progress(&self) -> u64 {
        self.value
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn close(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        let result = self.call(&["close"]);
        self.active = false;
        result
    }
}

impl Drop for RemoteProgress {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::debug!("failed to close progress dialog: {e}");
        }
    }
}
