//! `kdialog` adapter.
//!
//! kdialog takes the dialog kind as a flag followed by positional arguments,
//! reports buttons through the exit status (0 accept, 1 reject, 2 cancel) and
//! prints values on stdout.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::NaiveDate;

use super::{DialogOptions, FileSelection, ListStyle, SliderRange};
use crate::error::{DialogError, Result};
use crate::outcome::{self, Answer, Rgb};
use crate::process::{ExecOptions, ExecOutput, ProcessRunner};
use crate::progress::RemoteProgress;

pub const BINARY: &str = "kdialog";

/// Exit status kdialog uses for "Cancel"/"No" on input dialogs.
const CANCELLED: i32 = 1;

/// Qt date layout matching [`outcome::DATE_FORMAT`].
const DATE_FORMAT: &str = "dd MM yyyy";

pub struct Kdialog {
    runner: Arc<dyn ProcessRunner>,
}

impl Kdialog {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }

    fn exec(&self, options: &DialogOptions, dialog_args: Vec<String>) -> Result<ExecOutput> {
        let mut args = options.to_args(ListStyle::Repeated);
        args.extend(dialog_args);
        self.runner.exec(BINARY, &args, &ExecOptions::default())
    }

    /// Stdout as the value unless the user cancelled.
    fn value(output: &ExecOutput) -> Option<String> {
        (output.status != CANCELLED).then(|| output.value().to_string())
    }

    pub fn msgbox(&self, text: &str, options: &DialogOptions) -> Result<()> {
        self.exec(options, strings(&["--msgbox", text])).map(|_| ())
    }

    pub fn sorry(&self, text: &str, options: &DialogOptions) -> Result<()> {
        self.exec(options, strings(&["--sorry", text])).map(|_| ())
    }

    pub fn error(&self, text: &str, options: &DialogOptions) -> Result<()> {
        self.exec(options, strings(&["--error", text])).map(|_| ())
    }

    pub fn yes_no(&self, text: &str, options: &DialogOptions) -> Result<bool> {
        Ok(self.exec(options, strings(&["--yesno", text]))?.success)
    }

    pub fn warning_yes_no(&self, text: &str, options: &DialogOptions) -> Result<bool> {
        Ok(self.exec(options, strings(&["--warningyesno", text]))?.success)
    }

    pub fn warning_continue_cancel(&self, text: &str, options: &DialogOptions) -> Result<bool> {
        Ok(self
            .exec(options, strings(&["--warningcontinuecancel", text]))?
            .success)
    }

    pub fn yes_no_cancel(&self, text: &str, options: &DialogOptions) -> Result<Answer> {
        let output = self.exec(options, strings(&["--yesnocancel", text]))?;
        Ok(Answer::from_status(output.status))
    }

    pub fn warning_yes_no_cancel(&self, text: &str, options: &DialogOptions) -> Result<Answer> {
        let output = self.exec(options, strings(&["--warningyesnocancel", text]))?;
        Ok(Answer::from_status(output.status))
    }

    pub fn input_box(&self, text: &str, init: &str, options: &DialogOptions) -> Result<Option<String>> {
        let output = self.exec(options, strings(&["--inputbox", text, init]))?;
        Ok(Self::value(&output))
    }

    pub fn password(&self, text: &str, options: &DialogOptions) -> Result<Option<String>> {
        let output = self.exec(options, strings(&["--password", text]))?;
        Ok(Self::value(&output))
    }

    /// Native "new password" dialog with a built-in confirmation field.
    pub fn new_password(&self, text: &str, options: &DialogOptions) -> Result<Option<String>> {
        let output = self.exec(options, strings(&["--newpassword", text]))?;
        Ok(Self::value(&output))
    }

    /// Single choice menu. Returns the 1-based position of the chosen item.
    pub fn menu<S: AsRef<str>>(
        &self,
        text: &str,
        items: &[S],
        options: &DialogOptions,
    ) -> Result<Option<usize>> {
        require_items(items)?;
        let mut args = strings(&["--menu", text]);
        for (position, item) in positions(items) {
            args.extend([position.to_string(), item.to_string()]);
        }
        let output = self.exec(options, args)?;
        Self::value(&output)
            .map(|tag| parse_position(&tag, items.len()))
            .transpose()
    }

    /// Radio list with an optional preselected 1-based position.
    pub fn radiolist<S: AsRef<str>>(
        &self,
        text: &str,
        items: &[S],
        selected: Option<usize>,
        options: &DialogOptions,
    ) -> Result<Option<usize>> {
        require_items(items)?;
        let mut args = strings(&["--radiolist", text]);
        for (position, item) in positions(items) {
            args.extend([
                position.to_string(),
                item.to_string(),
                on_off(selected == Some(position)).to_string(),
            ]);
        }
        let output = self.exec(options, args)?;
        Self::value(&output)
            .filter(|tag| !tag.is_empty())
            .map(|tag| parse_position(&tag, items.len()))
            .transpose()
    }

    /// Checklist. `selected` holds 1-based positions checked initially.
    ///
    /// The result maps every 1-based position to whether it ended up checked.
    pub fn checklist<S: AsRef<str>>(
        &self,
        text: &str,
        items: &[S],
        selected: &BTreeSet<usize>,
        options: &DialogOptions,
    ) -> Result<Option<BTreeMap<usize, bool>>> {
        require_items(items)?;
        let mut args = strings(&["--separate-output", "--checklist", text]);
        for (position, item) in positions(items) {
            args.extend([
                position.to_string(),
                item.to_string(),
                on_off(selected.contains(&position)).to_string(),
            ]);
        }
        let output = self.exec(options, args)?;
        let Some(value) = Self::value(&output) else {
            return Ok(None);
        };

        let mut checked = BTreeSet::new();
        for token in value.split_whitespace() {
            checked.insert(parse_position(token, items.len())?);
        }
        Ok(Some(
            (1..=items.len())
                .map(|position| (position, checked.contains(&position)))
                .collect(),
        ))
    }

    /// File or directory picker. Every selected path is returned.
    pub fn file_selection(
        &self,
        selection: &FileSelection,
        options: &DialogOptions,
    ) -> Result<Option<Vec<String>>> {
        selection.validate()?;

        let start = selection.expanded_start();
        let filter = selection.filters.join(" ");
        let mut args = Vec::new();
        if selection.directory {
            args.push("--getexistingdirectory".to_string());
            args.extend(start);
        } else {
            if selection.multiple {
                args.extend(strings(&["--multiple", "--separate-output"]));
            }
            args.push(if selection.save {
                "--getsavefilename".to_string()
            } else {
                "--getopenfilename".to_string()
            });
            match (start, filter.is_empty()) {
                (Some(start), true) => args.push(start),
                (start, false) => {
                    args.extend([start.unwrap_or_else(|| ".".to_string()), filter]);
                }
                (None, true) => {}
            }
        }

        let output = self.exec(options, args)?;
        Ok(Self::value(&output).map(|value| value.lines().map(String::from).collect()))
    }

    pub fn get_color(&self, default: Option<Rgb>, options: &DialogOptions) -> Result<Option<Rgb>> {
        let mut args = vec!["--getcolor".to_string()];
        if let Some(default) = default {
            args.extend(["--default".to_string(), default.to_hex()]);
        }
        let output = self.exec(options, args)?;
        Self::value(&output)
            .map(|value| Rgb::parse_output(BINARY, &value))
            .transpose()
    }

    pub fn slider(
        &self,
        text: &str,
        range: SliderRange,
        options: &DialogOptions,
    ) -> Result<Option<i64>> {
        let args = vec![
            "--slider".to_string(),
            text.to_string(),
            range.min.to_string(),
            range.max.to_string(),
            range.step.to_string(),
        ];
        let output = self.exec(options, args)?;
        Self::value(&output)
            .map(|value| outcome::parse_number(BINARY, &value).map(|n| range.clamp(n)))
            .transpose()
    }

    /// Calendar picker.
    ///
    /// Unlike every other kdialog dialog, a zero exit status is read as
    /// "cancelled" here and only a non-zero status yields a date.
    pub fn calendar(&self, text: &str, options: &DialogOptions) -> Result<Option<NaiveDate>> {
        let output = self.exec(
            options,
            strings(&["--calendar", text, "--dateformat", DATE_FORMAT]),
        )?;
        if output.status == 0 || output.value().trim().is_empty() {
            return Ok(None);
        }
        outcome::parse_date(BINARY, output.value()).map(Some)
    }

    pub fn text_box(&self, path: &str, options: &DialogOptions) -> Result<()> {
        let path = crate::shared::dirs::expand_tilde(path);
        self.exec(options, strings(&["--textbox", &path])).map(|_| ())
    }

    /// Shows a passive popup and returns without waiting for it to expire.
    pub fn passive_popup(&self, text: &str, timeout_secs: u32, options: &DialogOptions) -> Result<()> {
        let mut args = options.to_args(ListStyle::Repeated);
        args.extend([
            "--passivepopup".to_string(),
            text.to_string(),
            timeout_secs.to_string(),
        ]);
        self.runner
            .spawn(BINARY, &args, &ExecOptions::default())
            .map(|_| ())
    }

    /// Opens a progress dialog driven over D-Bus.
    pub fn progress_bar(
        &self,
        text: &str,
        size: u64,
        auto_close: bool,
        options: &DialogOptions,
    ) -> Result<RemoteProgress> {
        RemoteProgress::start(self.runner.clone(), text, size, auto_close, options)
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn on_off(checked: bool) -> &'static str {
    if checked { "on" } else { "off" }
}

fn positions<S: AsRef<str>>(items: &[S]) -> impl Iterator<Item = (usize, &str)> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| (index + 1, item.as_ref()))
}

fn require_items<S>(items: &[S]) -> Result<()> {
    if items.is_empty() {
        return Err(DialogError::precondition("a list dialog needs at least one item"));
    }
    Ok(())
}

/// Parses a tag printed by kdialog back into a 1-based position.
fn parse_position(tag: &str, len: usize) -> Result<usize> {
    let trimmed = tag.trim().trim_matches('"');
    trimmed
        .parse::<usize>()
        .ok()
        .filter(|position| (1..=len).contains(position))
        .ok_or_else(|| DialogError::protocol(BINARY, tag))
}
