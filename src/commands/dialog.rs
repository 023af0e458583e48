use std::collections::BTreeSet;
use std::io::BufRead;

use clap::Subcommand;

use dialogbridge::backend::{DialogOptions, FileSelection, SliderRange};
use dialogbridge::dialog::Dialogs;
use dialogbridge::infra::notification::{Notification, Urgency};
use dialogbridge::outcome::DialogResult;
use dialogbridge::progress::ProgressBar;

/// Dialog subcommands. Each prints its result; display-only dialogs print nothing.
#[derive(Subcommand, Clone, PartialEq, Eq)]
pub enum DialogCommand {
    /// Show an information message
    Info { text: String },

    /// Show a warning message
    Warning { text: String },

    /// Show an error message
    Error { text: String },

    /// Ask a yes/no question
    Question {
        text: String,

        /// Add a cancel button
        #[arg(long)]
        cancel: bool,

        /// Use warning styling
        #[arg(long)]
        warning: bool,
    },

    /// Ask for a line of text
    Entry {
        text: String,

        /// Initial value
        #[arg(long, default_value = "")]
        init: String,
    },

    /// Ask for a password
    Password {
        text: String,

        /// Ask twice and require both entries to match
        #[arg(long)]
        confirm: bool,
    },

    /// Pick one item from a list
    Menu {
        text: String,

        #[arg(required = true)]
        items: Vec<String>,

        /// Show radio buttons instead of a plain list
        #[arg(long)]
        radio: bool,

        /// Preselected item (with --radio)
        #[arg(long, requires = "radio")]
        selected: Option<String>,

        /// Print the 1-based position instead of the label
        #[arg(long)]
        index: bool,
    },

    /// Pick any number of items from a list
    Checklist {
        text: String,

        #[arg(required = true)]
        items: Vec<String>,

        /// Item checked initially (repeatable)
        #[arg(long = "checked")]
        checked: Vec<String>,

        /// Print 1-based positions instead of labels
        #[arg(long)]
        index: bool,
    },

    /// Choose files to open
    Open {
        /// Starting directory or file
        #[arg(long)]
        start: Option<String>,

        /// Glob filter such as "*.png *.jpg" (repeatable)
        #[arg(long = "filter")]
        filters: Vec<String>,

        /// Allow selecting several files
        #[arg(long)]
        multiple: bool,
    },

    /// Choose a file to save to
    Save {
        #[arg(long)]
        start: Option<String>,

        #[arg(long = "filter")]
        filters: Vec<String>,
    },

    /// Choose a directory
    Directory {
        #[arg(long)]
        start: Option<String>,
    },

    /// Pick a color
    Color {
        /// Initial color as #rgb or #rrggbb
        #[arg(long)]
        default: Option<String>,
    },

    /// Pick a number on a slider
    Slider {
        text: String,

        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        min: i64,

        #[arg(long, default_value_t = 100, allow_negative_numbers = true)]
        max: i64,

        #[arg(long, default_value_t = 1)]
        step: i64,

        /// Initial value
        #[arg(long, allow_negative_numbers = true)]
        value: Option<i64>,
    },

    /// Pick a date
    Calendar { text: String },

    /// Show the contents of a file
    TextBox { path: String },

    /// Show a popup that goes away on its own
    Popup { text: String },

    /// Send a desktop notification
    Notify {
        summary: String,

        #[arg(default_value = "")]
        body: String,

        #[arg(long)]
        icon: Option<String>,

        #[arg(long, value_enum)]
        urgency: Option<Urgency>,

        /// Milliseconds before the notification expires
        #[arg(long)]
        expire_time: Option<u32>,

        /// Notification category (repeatable)
        #[arg(long = "category")]
        categories: Vec<String>,

        /// Button label (repeatable); prints the pressed button's 1-based index
        #[arg(long = "action")]
        actions: Vec<String>,
    },

    /// Show a progress bar driven by stdin
    ///
    /// Each line is either a number between 0 and SIZE or "#text" to change
    /// the label.
    Progress {
        text: String,

        #[arg(long, default_value_t = 100)]
        size: u64,

        /// Keep the dialog open after reaching SIZE
        #[arg(long)]
        no_auto_close: bool,
    },
}

impl DialogCommand {
    pub fn run(&self, dialogs: &Dialogs, options: &DialogOptions) -> anyhow::Result<Option<DialogResult>> {
        let result: DialogResult = match self {
            Self::Info { text } => {
                dialogs.info(text, options)?;
                return Ok(None);
            }
            Self::Warning { text } => {
                dialogs.warning(text, options)?;
                return Ok(None);
            }
            Self::Error { text } => {
                dialogs.error(text, options)?;
                return Ok(None);
            }
            Self::Question {
                text,
                cancel,
                warning,
            } => match (*cancel, *warning) {
                (true, false) => dialogs.question_cancel(text, options)?.into(),
                (true, true) => dialogs.warning_question_cancel(text, options)?.into(),
                (false, false) => dialogs.question(text, options)?.into(),
                (false, true) => dialogs.warning_question(text, options)?.into(),
            },
            Self::Entry { text, init } => dialogs.entry(text, init, options)?.into(),
            Self::Password { text, confirm } => {
                if *confirm {
                    dialogs.new_password(text, options)?.into()
                } else {
                    dialogs.password(text, options)?.into()
                }
            }
            Self::Menu {
                text,
                items,
                radio,
                selected,
                index,
            } => {
                let choice = if *radio {
                    dialogs.radiolist(text, items, selected.as_deref(), options)?
                } else {
                    dialogs.menu(text, items, options)?
                };
                match (choice, *index) {
                    (Some(label), true) => {
                        DialogResult::Indices(positions(items, &BTreeSet::from([label])))
                    }
                    (choice, _) => choice.into(),
                }
            }
            Self::Checklist {
                text,
                items,
                checked,
                index,
            } => {
                let selected: BTreeSet<String> = checked.iter().cloned().collect();
                match (dialogs.checklist(text, items, &selected, options)?, *index) {
                    (Some(labels), true) => {
                        DialogResult::Indices(positions(items, &labels.into_iter().collect()))
                    }
                    (labels, _) => labels.into(),
                }
            }
            Self::Open {
                start,
                filters,
                multiple,
            } => {
                let selection = FileSelection {
                    start: start.clone(),
                    filters: filters.clone(),
                    multiple: *multiple,
                    ..FileSelection::open()
                };
                dialogs.file_selection(&selection, options)?.into()
            }
            Self::Save { start, filters } => {
                let selection = FileSelection {
                    start: start.clone(),
                    filters: filters.clone(),
                    ..FileSelection::save()
                };
                dialogs.file_selection(&selection, options)?.into()
            }
            Self::Directory { start } => {
                let selection = FileSelection {
                    start: start.clone(),
                    ..FileSelection::directory()
                };
                dialogs.file_selection(&selection, options)?.into()
            }
            Self::Color { default } => dialogs.color(default.as_deref(), options)?.into(),
            Self::Slider {
                text,
                min,
                max,
                step,
                value,
            } => {
                let range = SliderRange::new(*min, *max, *step)?;
                dialogs.slider(text, range, *value, options)?.into()
            }
            Self::Calendar { text } => dialogs.calendar(text, options)?.into(),
            Self::TextBox { path } => {
                dialogs.text_box(path, options)?;
                return Ok(None);
            }
            Self::Popup { text } => {
                dialogs.popup(text, options)?;
                return Ok(None);
            }
            Self::Notify {
                summary,
                body,
                icon,
                urgency,
                expire_time,
                categories,
                actions,
            } => {
                let notification = build_notification(
                    summary,
                    body,
                    icon.as_deref(),
                    *urgency,
                    *expire_time,
                    categories,
                    actions,
                );
                match dialogs.notify(notification)? {
                    0 if actions.is_empty() => return Ok(None),
                    0 => DialogResult::Absent,
                    pressed => DialogResult::Number(i64::try_from(pressed)?),
                }
            }
            Self::Progress {
                text,
                size,
                no_auto_close,
            } => {
                let mut bar = dialogs.progress_with(text, *size, !*no_auto_close, options)?;
                let stdin = std::io::stdin();
                drive_progress(bar.as_mut(), *size, stdin.lock())?
            }
        };
        Ok(Some(result))
    }
}

fn build_notification(
    summary: &str,
    body: &str,
    icon: Option<&str>,
    urgency: Option<Urgency>,
    expire_time: Option<u32>,
    categories: &[String],
    actions: &[String],
) -> Notification {
    let mut notification = Notification::new(summary, body);
    if let Some(icon) = icon {
        notification = notification.with_icon(icon);
    }
    if let Some(urgency) = urgency {
        notification = notification.with_urgency(urgency);
    }
    if let Some(ms) = expire_time {
        notification = notification.with_expire_time(ms);
    }
    for category in categories {
        notification = notification.with_category(category);
    }
    for action in actions {
        notification = notification.with_action(action);
    }
    notification
}

/// 1-based positions of `items` found in `labels`.
fn positions(items: &[String], labels: &BTreeSet<String>) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| labels.contains(*item))
        .map(|(index, _)| index + 1)
        .collect()
}

/// Feeds progress lines into `bar` until input ends or the dialog goes away.
///
/// Returns `Cancelled` when the dialog disappeared before reaching `size`.
fn drive_progress(
    bar: &mut dyn ProgressBar,
    size: u64,
    input: impl BufRead,
) -> anyhow::Result<DialogResult> {
    for line in input.lines() {
        if !bar.is_active() {
            break;
        }
        let line = line?;
        let line = line.trim();
        if let Some(label) = line.strip_prefix('#') {
            bar.set_label_text(label.trim())?;
        } else if let Ok(value) = line.parse::<u64>() {
            bar.set_progress(value)?;
        } else if !line.is_empty() {
            tracing::warn!("ignoring progress input {line:?}");
        }
    }

    let finished = bar.progress() >= size || bar.is_active();
    bar.close()?;
    Ok(if finished {
        DialogResult::Confirmed
    } else {
        DialogResult::Cancelled
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dialogbridge::error::Result;
    use rstest::rstest;

    /// Records every update and closes after `lifetime` updates.
    #[derive(Default)]
    struct RecordingBar {
        updates: Vec<String>,
        value: u64,
        lifetime: Option<usize>,
        closed: bool,
    }

    impl RecordingBar {
        fn tick(&mut self, update: String) {
            self.updates.push(update);
            if self.lifetime == Some(self.updates.len()) {
                self.closed = true;
            }
        }
    }

    impl ProgressBar for RecordingBar {
        fn set_label_text(&mut self, text: &str) -> Result<()> {
            self.tick(format!("#{text}"));
            Ok(())
        }

        fn set_progress(&mut self, value: u64) -> Result<()> {
            self.value = value;
            self.tick(value.to_string());
            Ok(())
        }

        fn progress(&self) -> u64 {
            self.value
        }

        fn is_active(&self) -> bool {
            !self.closed
        }

        fn close(&mut self) -> Result<()> {
            self.closed = true;
            Ok(())
        }
    }

    #[test]
    fn progress_input_drives_bar() {
        let mut bar = RecordingBar::default();

        let result = drive_progress(&mut bar, 10, "# Copying\n3\n\nnot-a-number\n10\n".as_bytes()).unwrap();

        assert_eq!(bar.updates, ["#Copying", "3", "10"]);
        assert_eq!(result, DialogResult::Confirmed);
        assert!(bar.closed);
    }

    #[test]
    fn progress_stops_when_dialog_goes_away() {
        let mut bar = RecordingBar {
            lifetime: Some(1),
            ..RecordingBar::default()
        };

        let result = drive_progress(&mut bar, 10, "2\n5\n7\n".as_bytes()).unwrap();

        assert_eq!(bar.updates, ["2"]);
        assert_eq!(result, DialogResult::Cancelled);
    }

    #[rstest]
    #[case::some(&["b", "c"], vec![2, 3])]
    #[case::none(&[], vec![])]
    #[case::unknown(&["zzz"], vec![])]
    fn positions_are_one_based(#[case] labels: &[&str], #[case] expected: Vec<usize>) {
        let items: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let labels: BTreeSet<String> = labels.iter().map(|s| s.to_string()).collect();
        assert_eq!(positions(&items, &labels), expected);
    }

    #[test]
    fn notification_carries_every_flag() {
        let notification = build_notification(
            "Build",
            "done",
            Some("dialog-information"),
            Some(Urgency::Low),
            Some(500),
            &["transfer".to_string()],
            &["Open".to_string()],
        );

        assert_eq!(notification.icon(), Some("dialog-information"));
        assert_eq!(notification.urgency(), Some(Urgency::Low));
        assert_eq!(notification.expire_time_ms(), Some(500));
        assert_eq!(notification.categories(), ["transfer"]);
        assert_eq!(notification.actions(), ["Open"]);
    }
}
