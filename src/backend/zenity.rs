//! `zenity` adapter.
//!
//! zenity selects the dialog kind with a flag, takes the prompt through
//! `--text` and reports every non-zero exit status as "cancelled". Lists print
//! labels, not indices.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;

use super::{DialogOptions, FileSelection, ListStyle, SliderRange};
use crate::error::{DialogError, Result};
use crate::outcome::{self, Answer, Rgb};
use crate::process::{ExecOptions, ExecOutput, ProcessRunner};
use crate::progress::PipeProgress;

pub const BINARY: &str = "zenity";

/// Separator for multi-value output (checklists, multiple files, forms).
pub const SEPARATOR: char = '|';

/// Label of the extra button that stands in for "Cancel" on three-way questions.
pub const CANCEL_LABEL: &str = "Cancel";

const ITEM_COLUMN: &str = "Item";
const PICK_COLUMN: &str = "Pick";

pub struct Zenity {
    runner: Arc<dyn ProcessRunner>,
}

impl Zenity {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }

    /// Runs `zenity <mode args> <options> <trailing>`.
    ///
    /// zenity has no `--geometry` or `--icon`, so those are rewritten first.
    fn exec(
        &self,
        mode: Vec<String>,
        options: &DialogOptions,
        trailing: Vec<String>,
    ) -> Result<ExecOutput> {
        let mut args = mode;
        args.extend(translate(options).to_args(ListStyle::Repeated));
        args.extend(trailing);
        self.runner.exec(BINARY, &args, &ExecOptions::default())
    }

    fn value(output: &ExecOutput) -> Option<String> {
        output.success.then(|| output.value().to_string())
    }

    pub fn info(&self, text: &str, options: &DialogOptions) -> Result<()> {
        self.exec(strings(&["--info", "--text", text]), options, Vec::new())
            .map(|_| ())
    }

    pub fn warning(&self, text: &str, options: &DialogOptions) -> Result<()> {
        self.exec(strings(&["--warning", "--text", text]), options, Vec::new())
            .map(|_| ())
    }

    pub fn error(&self, text: &str, options: &DialogOptions) -> Result<()> {
        self.exec(strings(&["--error", "--text", text]), options, Vec::new())
            .map(|_| ())
    }

    pub fn question(&self, text: &str, options: &DialogOptions) -> Result<bool> {
        let output = self.exec(strings(&["--question", "--text", text]), options, Vec::new())?;
        Ok(output.success)
    }

    pub fn warning_question(&self, text: &str, options: &DialogOptions) -> Result<bool> {
        let output = self.exec(
            strings(&["--question", "--text", text, "--icon-name", "dialog-warning"]),
            options,
            Vec::new(),
        )?;
        Ok(output.success)
    }

    pub fn continue_cancel(&self, text: &str, options: &DialogOptions) -> Result<bool> {
        let options = options
            .clone()
            .with_default("ok_label", "Continue")
            .with_default("cancel_label", "Cancel");
        let output = self.exec(strings(&["--question", "--text", text]), &options, Vec::new())?;
        Ok(output.success)
    }

    /// Yes/no/cancel question built from an extra button.
    ///
    /// Both "No" and the extra button exit with status 1; the extra button
    /// also prints its label.
    pub fn question_cancel(&self, text: &str, options: &DialogOptions) -> Result<Answer> {
        let output = self.exec(
            strings(&["--question", "--text", text, "--extra-button", CANCEL_LABEL]),
            options,
            Vec::new(),
        )?;
        Ok(match output.status {
            0 => Answer::Yes,
            1 if output.value() == CANCEL_LABEL => Answer::Cancel,
            1 => Answer::No,
            _ => Answer::Cancel,
        })
    }

    pub fn entry(&self, text: &str, init: &str, options: &DialogOptions) -> Result<Option<String>> {
        let output = self.exec(
            strings(&["--entry", "--text", text, "--entry-text", init]),
            options,
            Vec::new(),
        )?;
        Ok(Self::value(&output))
    }

    /// Password prompt. zenity has no prompt text here, so `text` becomes the
    /// title unless one is set.
    pub fn password(&self, text: &str, options: &DialogOptions) -> Result<Option<String>> {
        let options = options.clone().with_default("title", text);
        let output = self.exec(strings(&["--password"]), &options, Vec::new())?;
        Ok(Self::value(&output))
    }

    /// Two password fields in one form. Prints both values joined by [`SEPARATOR`].
    pub fn password_pair(&self, text: &str, options: &DialogOptions) -> Result<Option<String>> {
        let separator = SEPARATOR.to_string();
        let output = self.exec(
            strings(&[
                "--forms",
                "--text",
                text,
                "--add-password",
                "New",
                "--add-password",
                "Confirm",
                "--separator",
                &separator,
            ]),
            options,
            Vec::new(),
        )?;
        Ok(Self::value(&output))
    }

    /// Single choice list. Returns the chosen label.
    pub fn list<S: AsRef<str>>(
        &self,
        text: &str,
        items: &[S],
        options: &DialogOptions,
    ) -> Result<Option<String>> {
        require_items(items)?;
        let trailing = items.iter().map(|item| item.as_ref().to_string()).collect();
        let output = self.exec(
            strings(&["--list", "--text", text, "--column", ITEM_COLUMN]),
            options,
            trailing,
        )?;
        Ok(Self::value(&output).filter(|label| !label.is_empty()))
    }

    /// Radio list with an optional preselected label.
    pub fn radiolist<S: AsRef<str>>(
        &self,
        text: &str,
        items: &[S],
        selected: Option<&str>,
        options: &DialogOptions,
    ) -> Result<Option<String>> {
        require_items(items)?;
        let trailing = toggled_rows(items, |item| selected == Some(item));
        let output = self.exec(list_mode("--radiolist", text), options, trailing)?;
        Ok(Self::value(&output).filter(|label| !label.is_empty()))
    }

    /// Checklist. Returns the checked labels joined by [`SEPARATOR`].
    pub fn checklist<S: AsRef<str>>(
        &self,
        text: &str,
        items: &[S],
        selected: &BTreeSet<String>,
        options: &DialogOptions,
    ) -> Result<Option<String>> {
        require_items(items)?;
        let trailing = toggled_rows(items, |item| selected.contains(item));
        let output = self.exec(list_mode("--checklist", text), options, trailing)?;
        Ok(Self::value(&output))
    }

    /// File or directory picker. Multiple selections are split on [`SEPARATOR`].
    pub fn file_selection(
        &self,
        selection: &FileSelection,
        options: &DialogOptions,
    ) -> Result<Option<Vec<String>>> {
        selection.validate()?;

        let mut mode = vec!["--file-selection".to_string()];
        if let Some(start) = selection.expanded_start() {
            mode.extend(["--filename".to_string(), start]);
        }
        if selection.multiple {
            mode.extend(["--multiple".to_string(), "--separator".to_string(), SEPARATOR.to_string()]);
        }
        if selection.save {
            mode.extend(strings(&["--save", "--confirm-overwrite"]));
        }
        if selection.directory {
            mode.push("--directory".to_string());
        }

        let options = if selection.filters.is_empty() {
            options.clone()
        } else {
            options.clone().set("file_filter", selection.filters.clone())
        };

        let output = self.exec(mode, &options, Vec::new())?;
        Ok(Self::value(&output).map(|value| {
            if selection.multiple {
                value.split(SEPARATOR).map(String::from).collect()
            } else {
                vec![value]
            }
        }))
    }

    pub fn color_selection(&self, default: Option<Rgb>, options: &DialogOptions) -> Result<Option<Rgb>> {
        let mut mode = vec!["--color-selection".to_string()];
        if let Some(default) = default {
            mode.extend(["--color".to_string(), default.to_hex()]);
        }
        let output = self.exec(mode, options, Vec::new())?;
        Self::value(&output)
            .map(|value| Rgb::parse_output(BINARY, &value))
            .transpose()
    }

    /// Scale dialog. Without `value` the initial position is
    /// [`SliderRange::default_value`].
    pub fn scale(
        &self,
        text: &str,
        range: SliderRange,
        value: Option<i64>,
        options: &DialogOptions,
    ) -> Result<Option<i64>> {
        let initial = value.unwrap_or_else(|| range.default_value());
        let mode = vec![
            "--scale".to_string(),
            "--text".to_string(),
            text.to_string(),
            "--min-value".to_string(),
            range.min.to_string(),
            "--max-value".to_string(),
            range.max.to_string(),
            "--step".to_string(),
            range.step.to_string(),
            "--value".to_string(),
            initial.to_string(),
        ];
        let output = self.exec(mode, options, Vec::new())?;
        Self::value(&output)
            .map(|value| outcome::parse_number(BINARY, &value).map(|n| range.clamp(n)))
            .transpose()
    }

    pub fn calendar(&self, text: &str, options: &DialogOptions) -> Result<Option<NaiveDate>> {
        let output = self.exec(
            strings(&["--calendar", "--text", text, "--date-format", outcome::DATE_FORMAT]),
            options,
            Vec::new(),
        )?;
        Self::value(&output)
            .map(|value| outcome::parse_date(BINARY, &value))
            .transpose()
    }

    pub fn text_info(&self, path: &str, options: &DialogOptions) -> Result<()> {
        let path = crate::shared::dirs::expand_tilde(path);
        self.exec(strings(&["--text-info", "--filename", &path]), options, Vec::new())
            .map(|_| ())
    }

    /// Shows a tray notification without waiting for it.
    pub fn notification(&self, text: &str, options: &DialogOptions) -> Result<()> {
        let mut args = strings(&["--notification", "--text", text]);
        args.extend(translate(options).to_args(ListStyle::Repeated));
        self.runner
            .spawn(BINARY, &args, &ExecOptions::default())
            .map(|_| ())
    }

    /// Opens a progress dialog fed through a FIFO relay.
    pub fn progress_bar(
        &self,
        text: &str,
        size: u64,
        auto_close: bool,
        options: &DialogOptions,
    ) -> Result<PipeProgress> {
        PipeProgress::start(self.runner.clone(), text, size, auto_close, &translate(options))
    }
}

/// Rewrites options zenity spells differently.
fn translate(options: &DialogOptions) -> DialogOptions {
    options
        .clone()
        .split_geometry("geometry")
        .rename("icon", "window_icon")
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn list_mode(kind: &str, text: &str) -> Vec<String> {
    let separator = SEPARATOR.to_string();
    strings(&[
        "--list",
        kind,
        "--text",
        text,
        "--column",
        PICK_COLUMN,
        "--column",
        ITEM_COLUMN,
        "--separator",
        &separator,
        "--print-column",
        "2",
    ])
}

fn toggled_rows<S: AsRef<str>>(items: &[S], checked: impl Fn(&str) -> bool) -> Vec<String> {
    items
        .iter()
        .flat_map(|item| {
            let item = item.as_ref();
            let toggle = if checked(item) { "TRUE" } else { "FALSE" };
            [toggle.to_string(), item.to_string()]
        })
        .collect()
}

fn require_items<S>(items: &[S]) -> Result<()> {
    if items.is_empty() {
        return Err(DialogError::precondition("a list dialog needs at least one item"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CallKind, MockRunner, args};
    use rstest::rstest;

    fn zenity(runner: &Arc<MockRunner>) -> Zenity {
        Zenity::new(runner.clone())
    }

    #[test]
    fn info_puts_mode_before_options() {
        let runner = MockRunner::new();

        zenity(&runner)
            .info("Done", &DialogOptions::new().title("Build"))
            .unwrap();

        let call = runner.last_call();
        assert_eq!(call.command, "zenity");
        assert_eq!(call.args, args(&["--info", "--text", "Done", "--title", "Build"]));
    }

    #[test]
    fn geometry_and_icon_are_translated() {
        let runner = MockRunner::new();

        zenity(&runner)
            .info(
                "Hi",
                &DialogOptions::new().geometry(640, 480).icon("dialog-information"),
            )
            .unwrap();

        assert_eq!(
            runner.last_call().args,
            args(&[
                "--info",
                "--text",
                "Hi",
                "--width",
                "640",
                "--height",
                "480",
                "--window-icon",
                "dialog-information"
            ])
        );
    }

    #[rstest]
    #[case::yes(0, "", Answer::Yes)]
    #[case::no(1, "", Answer::No)]
    #[case::extra_button(1, "Cancel\n", Answer::Cancel)]
    #[case::timeout(5, "", Answer::Cancel)]
    #[case::killed(-1, "", Answer::Cancel)]
    fn question_cancel_distinguishes_extra_button(
        #[case] status: i32,
        #[case] stdout: &str,
        #[case] expected: Answer,
    ) {
        let runner = MockRunner::new();
        runner.push(status, stdout);

        let answer = zenity(&runner)
            .question_cancel("Save changes?", &DialogOptions::new())
            .unwrap();

        assert_eq!(answer, expected);
        assert_eq!(
            runner.last_call().args,
            args(&["--question", "--text", "Save changes?", "--extra-button", "Cancel"])
        );
    }

    #[test]
    fn continue_cancel_defaults_button_labels() {
        let runner = MockRunner::new();

        let accepted = zenity(&runner)
            .continue_cancel("Overwrite?", &DialogOptions::new())
            .unwrap();

        assert!(accepted);
        assert_eq!(
            runner.last_call().args,
            args(&[
                "--question",
                "--text",
                "Overwrite?",
                "--ok-label",
                "Continue",
                "--cancel-label",
                "Cancel"
            ])
        );
    }

    #[test]
    fn continue_cancel_keeps_caller_labels() {
        let runner = MockRunner::new();

        zenity(&runner)
            .continue_cancel("Overwrite?", &DialogOptions::new().ok_label("Go"))
            .unwrap();

        let call = runner.last_call();
        assert!(call.args.windows(2).any(|w| w == ["--ok-label", "Go"]));
        assert!(!call.args.contains(&"Continue".to_string()));
    }

    #[rstest]
    #[case::typed(0, "Alice\n", Some("Alice"))]
    #[case::cancelled(1, "", None)]
    #[case::closed(-1, "", None)]
    fn entry_returns_none_on_any_failure(
        #[case] status: i32,
        #[case] stdout: &str,
        #[case] expected: Option<&str>,
    ) {
        let runner = MockRunner::new();
        runner.push(status, stdout);

        let value = zenity(&runner)
            .entry("Name?", "Bob", &DialogOptions::new())
            .unwrap();

        assert_eq!(value.as_deref(), expected);
        assert_eq!(
            runner.last_call().args,
            args(&["--entry", "--text", "Name?", "--entry-text", "Bob"])
        );
    }

    #[test]
    fn password_uses_prompt_as_title() {
        let runner = MockRunner::new();
        runner.push(0, "hunter2\n");

        let value = zenity(&runner)
            .password("Unlock", &DialogOptions::new())
            .unwrap();

        assert_eq!(value.as_deref(), Some("hunter2"));
        assert_eq!(runner.last_call().args, args(&["--password", "--title", "Unlock"]));
    }

    #[test]
    fn password_pair_asks_for_two_fields() {
        let runner = MockRunner::new();
        runner.push(0, "abc|abc\n");

        let value = zenity(&runner)
            .password_pair("Choose a password", &DialogOptions::new())
            .unwrap();

        assert_eq!(value.as_deref(), Some("abc|abc"));
        assert_eq!(
            runner.last_call().args,
            args(&[
                "--forms",
                "--text",
                "Choose a password",
                "--add-password",
                "New",
                "--add-password",
                "Confirm",
                "--separator",
                "|"
            ])
        );
    }

    #[test]
    fn list_returns_label() {
        let runner = MockRunner::new();
        runner.push(0, "green\n");

        let choice = zenity(&runner)
            .list("Pick", &["red", "green"], &DialogOptions::new())
            .unwrap();

        assert_eq!(choice.as_deref(), Some("green"));
        assert_eq!(
            runner.last_call().args,
            args(&["--list", "--text", "Pick", "--column", "Item", "red", "green"])
        );
    }

    #[test]
    fn radiolist_marks_preselected_row() {
        let runner = MockRunner::new();
        runner.push(0, "M\n");

        let choice = zenity(&runner)
            .radiolist("Size", &["S", "M"], Some("M"), &DialogOptions::new())
            .unwrap();

        assert_eq!(choice.as_deref(), Some("M"));
        let call = runner.last_call();
        assert_eq!(call.args[..2], args(&["--list", "--radiolist"]));
        assert!(call.args.ends_with(&args(&["FALSE", "S", "TRUE", "M"])));
    }

    #[test]
    fn checklist_prints_joined_labels() {
        let runner = MockRunner::new();
        runner.push(0, "a|c\n");

        let selected = BTreeSet::from(["a".to_string()]);
        let value = zenity(&runner)
            .checklist("Pick", &["a", "b", "c"], &selected, &DialogOptions::new())
            .unwrap();

        assert_eq!(value.as_deref(), Some("a|c"));
        assert_eq!(
            runner.last_call().args,
            args(&[
                "--list",
                "--checklist",
                "--text",
                "Pick",
                "--column",
                "Pick",
                "--column",
                "Item",
                "--separator",
                "|",
                "--print-column",
                "2",
                "TRUE",
                "a",
                "FALSE",
                "b",
                "FALSE",
                "c"
            ])
        );
    }

    #[test]
    fn list_without_items_fails_before_invoking() {
        let runner = MockRunner::new();
        let items: [&str; 0] = [];

        let result = zenity(&runner).checklist("Pick", &items, &BTreeSet::new(), &DialogOptions::new());

        assert!(matches!(result, Err(DialogError::Precondition(_))));
        assert!(runner.dialog_calls().is_empty());
    }

    #[test]
    fn multiple_files_split_on_separator_with_repeated_filters() {
        let runner = MockRunner::new();
        runner.push(0, "/tmp/a.png|/tmp/b.jpg\n");

        let selection = FileSelection::open()
            .filter("*.png")
            .filter("*.jpg")
            .multiple(true);
        let files = zenity(&runner)
            .file_selection(&selection, &DialogOptions::new())
            .unwrap();

        assert_eq!(
            files,
            Some(vec!["/tmp/a.png".to_string(), "/tmp/b.jpg".to_string()])
        );
        assert_eq!(
            runner.last_call().args,
            args(&[
                "--file-selection",
                "--multiple",
                "--separator",
                "|",
                "--file-filter",
                "*.png",
                "--file-filter",
                "*.jpg"
            ])
        );
    }

    #[test]
    fn save_picker_confirms_overwrite_and_expands_tilde() {
        temp_env::with_vars([("HOME", Some("/home/me"))], || {
            let runner = MockRunner::new();
            runner.push(0, "/home/me/out.txt\n");

            let file = zenity(&runner)
                .file_selection(&FileSelection::save().start("~/out.txt"), &DialogOptions::new())
                .unwrap();

            assert_eq!(file, Some(vec!["/home/me/out.txt".to_string()]));
            assert_eq!(
                runner.last_call().args,
                args(&[
                    "--file-selection",
                    "--filename",
                    "/home/me/out.txt",
                    "--save",
                    "--confirm-overwrite"
                ])
            );
        });
    }

    #[test]
    fn cancelled_picker_is_none() {
        let runner = MockRunner::new();
        runner.push(1, "");

        let dir = zenity(&runner)
            .file_selection(&FileSelection::directory(), &DialogOptions::new())
            .unwrap();

        assert_eq!(dir, None);
        assert_eq!(
            runner.last_call().args,
            args(&["--file-selection", "--directory"])
        );
    }

    #[test]
    fn color_selection_parses_rgb_output() {
        let runner = MockRunner::new();
        runner.push(0, "rgb(10,20,30)\n");

        let color = zenity(&runner)
            .color_selection(Some(Rgb::new(0xab, 0xcd, 0xef)), &DialogOptions::new())
            .unwrap();

        assert_eq!(color, Some(Rgb::new(10, 20, 30)));
        assert_eq!(
            runner.last_call().args,
            args(&["--color-selection", "--color", "#abcdef"])
        );
    }

    #[test]
    fn color_selection_rejects_garbage() {
        let runner = MockRunner::new();
        runner.push(0, "blue-ish\n");

        let result = zenity(&runner).color_selection(None, &DialogOptions::new());
        assert!(matches!(result, Err(DialogError::Protocol { .. })));
    }

    // Without an explicit value the scale starts at floor(min / max), which is
    // 0 for a 10..100 range even though 0 lies outside it.
    #[test]
    fn scale_defaults_to_floor_of_min_over_max() {
        let runner = MockRunner::new();
        runner.push(0, "30\n");

        let range = SliderRange::new(10, 100, 10).unwrap();
        let value = zenity(&runner)
            .scale("Level", range, None, &DialogOptions::new())
            .unwrap();

        assert_eq!(value, Some(30));
        assert_eq!(
            runner.last_call().args,
            args(&[
                "--scale",
                "--text",
                "Level",
                "--min-value",
                "10",
                "--max-value",
                "100",
                "--step",
                "10",
                "--value",
                "0"
            ])
        );
    }

    #[test]
    fn scale_uses_explicit_value_and_clamps_result() {
        let runner = MockRunner::new();
        runner.push(0, "250\n");

        let range = SliderRange::new(0, 200, 25).unwrap();
        let value = zenity(&runner)
            .scale("Level", range, Some(50), &DialogOptions::new())
            .unwrap();

        assert_eq!(value, Some(200));
        assert!(runner.last_call().args.ends_with(&args(&["--value", "50"])));
    }

    #[rstest]
    #[case::picked(0, "05 03 2024\n", NaiveDate::from_ymd_opt(2024, 3, 5))]
    #[case::cancelled(1, "", None)]
    fn calendar_parses_day_month_year(
        #[case] status: i32,
        #[case] stdout: &str,
        #[case] expected: Option<NaiveDate>,
    ) {
        let runner = MockRunner::new();
        runner.push(status, stdout);

        let date = zenity(&runner)
            .calendar("When?", &DialogOptions::new())
            .unwrap();

        assert_eq!(date, expected);
        assert_eq!(
            runner.last_call().args,
            args(&["--calendar", "--text", "When?", "--date-format", "%d %m %Y"])
        );
    }

    #[test]
    fn calendar_rejects_unexpected_layout() {
        let runner = MockRunner::new();
        runner.push(0, "2024-03-05\n");

        let result = zenity(&runner).calendar("When?", &DialogOptions::new());
        assert!(matches!(result, Err(DialogError::Protocol { .. })));
    }

    #[test]
    fn text_info_reads_file() {
        let runner = MockRunner::new();

        zenity(&runner)
            .text_info("/etc/motd", &DialogOptions::new())
            .unwrap();

        assert_eq!(
            runner.last_call().args,
            args(&["--text-info", "--filename", "/etc/motd"])
        );
    }

    #[test]
    fn notification_is_spawned() {
        let runner = MockRunner::new();

        zenity(&runner)
            .notification("Build finished", &DialogOptions::new())
            .unwrap();

        let call = runner.last_call();
        assert_eq!(call.kind, CallKind::Spawn);
        assert_eq!(call.args, args(&["--notification", "--text", "Build finished"]));
    }
}
