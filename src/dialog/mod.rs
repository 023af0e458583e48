//! Backend-agnostic dialogs.
//!
//! [`Dialogs`] picks the adapter for the selected backend and folds the two
//! result conventions into one: answers become [`Answer`], list choices come
//! back as labels, cancellation is `None`.

mod password;

pub use password::{MISMATCH_LABEL, confirm_new_password};

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::backend::{
    self, Backend, DialogOptions, FileSelection, Kdialog, SliderRange, Zenity, zenity,
};
use crate::error::{DialogError, Result};
use crate::infra::notification::{self, Notification};
use crate::outcome::{Answer, Rgb};
use crate::process::ProcessRunner;
use crate::progress::ProgressBar;
use crate::shared::config::Config;
use crate::shared::env_var::EnvVars;

enum Adapter {
    Kdialog(Kdialog),
    Zenity(Zenity),
}

/// Entry point for every dialog.
///
/// Holds the selected backend as a plain field; changing it needs `&mut self`.
pub struct Dialogs {
    runner: Arc<dyn ProcessRunner>,
    backend: Backend,
    config: Config,
}

impl Dialogs {
    pub fn new(runner: Arc<dyn ProcessRunner>, backend: Backend, config: Config) -> Self {
        Self {
            runner,
            backend,
            config,
        }
    }

    /// Uses the configured backend, or detects one from installed binaries
    /// and the environment.
    pub fn detect(runner: Arc<dyn ProcessRunner>, env: &EnvVars, config: Config) -> Self {
        let backend = match config.backend {
            Some(backend) => backend,
            None => backend::resolve(runner.as_ref(), env),
        };
        tracing::debug!(%backend, "dialog backend selected");
        Self::new(runner, backend, config)
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Overrides the backend, bypassing detection.
    pub fn set_backend(&mut self, backend: Backend) {
        self.backend = backend;
    }

    fn adapter(&self) -> Result<Adapter> {
        match self.backend {
            Backend::Kdialog => Ok(Adapter::Kdialog(Kdialog::new(self.runner.clone()))),
            Backend::Zenity => Ok(Adapter::Zenity(Zenity::new(self.runner.clone()))),
            Backend::None => Err(DialogError::NoBackend),
        }
    }

    pub fn info(&self, text: &str, options: &DialogOptions) -> Result<()> {
        match self.adapter()? {
            Adapter::Kdialog(k) => k.msgbox(text, options),
            Adapter::Zenity(z) => z.info(text, options),
        }
    }

    pub fn warning(&self, text: &str, options: &DialogOptions) -> Result<()> {
        match self.adapter()? {
            Adapter::Kdialog(k) => k.sorry(text, options),
            Adapter::Zenity(z) => z.warning(text, options),
        }
    }

    pub fn error(&self, text: &str, options: &DialogOptions) -> Result<()> {
        match self.adapter()? {
            Adapter::Kdialog(k) => k.error(text, options),
            Adapter::Zenity(z) => z.error(text, options),
        }
    }

    pub fn question(&self, text: &str, options: &DialogOptions) -> Result<bool> {
        match self.adapter()? {
            Adapter::Kdialog(k) => k.yes_no(text, options),
            Adapter::Zenity(z) => z.question(text, options),
        }
    }

    pub fn warning_question(&self, text: &str, options: &DialogOptions) -> Result<bool> {
        match self.adapter()? {
            Adapter::Kdialog(k) => k.warning_yes_no(text, options),
            Adapter::Zenity(z) => z.warning_question(text, options),
        }
    }

    pub fn continue_cancel(&self, text: &str, options: &DialogOptions) -> Result<bool> {
        match self.adapter()? {
            Adapter::Kdialog(k) => k.warning_continue_cancel(text, options),
            Adapter::Zenity(z) => z.continue_cancel(text, options),
        }
    }

    /// Yes/no/cancel question.
    pub fn question_cancel(&self, text: &str, options: &DialogOptions) -> Result<Answer> {
        match self.adapter()? {
            Adapter::Kdialog(k) => k.yes_no_cancel(text, options),
            Adapter::Zenity(z) => z.question_cancel(text, options),
        }
    }

    pub fn warning_question_cancel(&self, text: &str, options: &DialogOptions) -> Result<Answer> {
        match self.adapter()? {
            Adapter::Kdialog(k) => k.warning_yes_no_cancel(text, options),
            Adapter::Zenity(z) => {
                let options = options.clone().with_default("icon_name", "dialog-warning");
                z.question_cancel(text, &options)
            }
        }
    }

    pub fn entry(&self, text: &str, init: &str, options: &DialogOptions) -> Result<Option<String>> {
        match self.adapter()? {
            Adapter::Kdialog(k) => k.input_box(text, init, options),
            Adapter::Zenity(z) => z.entry(text, init, options),
        }
    }

    pub fn password(&self, text: &str, options: &DialogOptions) -> Result<Option<String>> {
        match self.adapter()? {
            Adapter::Kdialog(k) => k.password(text, options),
            Adapter::Zenity(z) => z.password(text, options),
        }
    }

    /// Asks for a new password twice and returns it once both entries match.
    pub fn new_password(&self, text: &str, options: &DialogOptions) -> Result<Option<String>> {
        match self.adapter()? {
            Adapter::Kdialog(k) => k.new_password(text, options),
            Adapter::Zenity(z) => {
                confirm_new_password(text, |label| z.password_pair(label, options))
            }
        }
    }

    /// Single choice menu. Returns the chosen label.
    pub fn menu<S: AsRef<str>>(
        &self,
        text: &str,
        items: &[S],
        options: &DialogOptions,
    ) -> Result<Option<String>> {
        match self.adapter()? {
            Adapter::Kdialog(k) => Ok(k
                .menu(text, items, options)?
                .map(|position| label_at(items, position))),
            Adapter::Zenity(z) => z.list(text, items, options),
        }
    }

    pub fn radiolist<S: AsRef<str>>(
        &self,
        text: &str,
        items: &[S],
        selected: Option<&str>,
        options: &DialogOptions,
    ) -> Result<Option<String>> {
        match self.adapter()? {
            Adapter::Kdialog(k) => {
                let selected = selected.and_then(|label| position_of(items, label));
                Ok(k.radiolist(text, items, selected, options)?
                    .map(|position| label_at(items, position)))
            }
            Adapter::Zenity(z) => z.radiolist(text, items, selected, options),
        }
    }

    /// Checklist. Returns the checked labels in item order.
    pub fn checklist<S: AsRef<str>>(
        &self,
        text: &str,
        items: &[S],
        selected: &BTreeSet<String>,
        options: &DialogOptions,
    ) -> Result<Option<Vec<String>>> {
        match self.adapter()? {
            Adapter::Kdialog(k) => {
                let defaults = checklist_defaults(items, selected);
                Ok(k.checklist(text, items, &defaults, options)?.map(|checked| {
                    checked
                        .into_iter()
                        .filter_map(|(position, on)| on.then(|| label_at(items, position)))
                        .collect()
                }))
            }
            Adapter::Zenity(z) => Ok(z.checklist(text, items, selected, options)?.map(|joined| {
                joined
                    .split(zenity::SEPARATOR)
                    .filter(|label| !label.is_empty())
                    .map(String::from)
                    .collect()
            })),
        }
    }

    pub fn file_selection(
        &self,
        selection: &FileSelection,
        options: &DialogOptions,
    ) -> Result<Option<Vec<String>>> {
        match self.adapter()? {
            Adapter::Kdialog(k) => k.file_selection(selection, options),
            Adapter::Zenity(z) => z.file_selection(selection, options),
        }
    }

    /// Color picker. `default` must be `#rgb` or `#rrggbb`.
    pub fn color(&self, default: Option<&str>, options: &DialogOptions) -> Result<Option<Rgb>> {
        let default = default.map(Rgb::from_hex).transpose()?;
        match self.adapter()? {
            Adapter::Kdialog(k) => k.get_color(default, options),
            Adapter::Zenity(z) => z.color_selection(default, options),
        }
    }

    /// Slider. `value` only positions the zenity scale; kdialog has no initial value.
    pub fn slider(
        &self,
        text: &str,
        range: SliderRange,
        value: Option<i64>,
        options: &DialogOptions,
    ) -> Result<Option<i64>> {
        match self.adapter()? {
            Adapter::Kdialog(k) => k.slider(text, range, options),
            Adapter::Zenity(z) => z.scale(text, range, value, options),
        }
    }

    pub fn calendar(&self, text: &str, options: &DialogOptions) -> Result<Option<NaiveDate>> {
        match self.adapter()? {
            Adapter::Kdialog(k) => k.calendar(text, options),
            Adapter::Zenity(z) => z.calendar(text, options),
        }
    }

    pub fn text_box(&self, path: &str, options: &DialogOptions) -> Result<()> {
        match self.adapter()? {
            Adapter::Kdialog(k) => k.text_box(path, options),
            Adapter::Zenity(z) => z.text_info(path, options),
        }
    }

    /// Short-lived popup that does not wait for the user.
    pub fn popup(&self, text: &str, options: &DialogOptions) -> Result<()> {
        match self.adapter()? {
            Adapter::Kdialog(k) => k.passive_popup(text, self.config.popup.timeout_secs, options),
            Adapter::Zenity(z) => z.notification(text, options),
        }
    }

    /// Opens a progress dialog. Auto-close follows the configuration.
    pub fn progress(
        &self,
        text: &str,
        size: u64,
        options: &DialogOptions,
    ) -> Result<Box<dyn ProgressBar>> {
        self.progress_with(text, size, self.config.progress.auto_close, options)
    }

    pub fn progress_with(
        &self,
        text: &str,
        size: u64,
        auto_close: bool,
        options: &DialogOptions,
    ) -> Result<Box<dyn ProgressBar>> {
        let bar: Box<dyn ProgressBar> = match self.adapter()? {
            Adapter::Kdialog(k) => Box::new(k.progress_bar(text, size, auto_close, options)?),
            Adapter::Zenity(z) => Box::new(z.progress_bar(text, size, auto_close, options)?),
        };
        Ok(bar)
    }

    /// Sends a desktop notification, filling unset fields from the configuration.
    ///
    /// Works regardless of the selected dialog backend.
    pub fn notify(&self, notification: Notification) -> notification::Result<usize> {
        let config = &self.config.notification;
        let mut defaults = Notification::default()
            .with_app_name(&config.app_name)
            .with_urgency(config.urgency);
        if let Some(ms) = config.expire_time_ms {
            defaults = defaults.with_expire_time(ms);
        }
        notification::notify(self.runner.as_ref(), &notification.or_defaults(&defaults))
    }
}

/// 1-based positions of the `items` whose label is in `selected`.
///
/// Labels are the canonical checklist selection; kdialog needs positions.
pub fn checklist_defaults<S: AsRef<str>>(items: &[S], selected: &BTreeSet<String>) -> BTreeSet<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| selected.contains(item.as_ref()))
        .map(|(index, _)| index + 1)
        .collect()
}

fn position_of<S: AsRef<str>>(items: &[S], label: &str) -> Option<usize> {
    items
        .iter()
        .position(|item| item.as_ref() == label)
        .map(|index| index + 1)
}

/// Label for a 1-based position the adapter already validated.
fn label_at<S: AsRef<str>>(items: &[S], position: usize) -> String {
    items
        .get(position.saturating_sub(1))
        .map(|item| item.as_ref().to_string())
        .unwrap_or_default()
}
