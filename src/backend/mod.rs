//! Dialog backends: identity, detection, option translation and the two adapters.

pub mod detect;
pub mod kdialog;
pub mod options;
pub mod zenity;

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{DialogError, Result};

pub use detect::{is_available, resolve};
pub use kdialog::Kdialog;
pub use options::{DialogOptions, ListStyle, OptionValue};
pub use zenity::Zenity;

/// Which dialog program renders dialogs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// KDE's `kdialog`.
    Kdialog,
    /// GNOME's `zenity`.
    Zenity,
    /// No backend; every dialog call fails with [`DialogError::NoBackend`].
    None,
}

impl Backend {
    /// Name of the executable, if any.
    pub fn binary(self) -> Option<&'static str> {
        match self {
            Self::Kdialog => Some(kdialog::BINARY),
            Self::Zenity => Some(zenity::BINARY),
            Self::None => None,
        }
    }

    /// Parses a backend name, accepting desktop-flavored aliases.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "kdialog" | "kde" => Some(Self::Kdialog),
            "zenity" | "gtk" | "gnome" => Some(Self::Zenity),
            "none" => Some(Self::None),
            _ => None,
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary().unwrap_or("none"))
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("unknown backend '{s}' (expected kdialog, zenity or none)"))
    }
}

/// Parameters of a file or directory picker.
///
/// `multiple`, `save` and `directory` are mutually exclusive; [`FileSelection::validate`]
/// rejects combinations before any process is started.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileSelection {
    /// Starting file or directory; a leading `~` is expanded.
    pub start: Option<String>,
    /// Glob groups such as `"*.png *.jpg"`.
    pub filters: Vec<String>,
    pub multiple: bool,
    pub save: bool,
    pub directory: bool,
}

impl FileSelection {
    pub fn open() -> Self {
        Self::default()
    }

    pub fn save() -> Self {
        Self {
            save: true,
            ..Self::default()
        }
    }

    pub fn directory() -> Self {
        Self {
            directory: true,
            ..Self::default()
        }
    }

    pub fn start(mut self, start: impl Into<String>) -> Self {
        self.start = Some(start.into());
        self
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filters.push(filter.into());
        self
    }

    pub fn multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.save && self.directory {
            return Err(DialogError::precondition(
                "a picker cannot select a directory and a save target at once",
            ));
        }
        if self.multiple && (self.save || self.directory) {
            return Err(DialogError::precondition(
                "multiple selection is only available when opening files",
            ));
        }
        Ok(())
    }

    pub(crate) fn expanded_start(&self) -> Option<String> {
        self.start.as_deref().map(crate::shared::dirs::expand_tilde)
    }
}

/// Bounds of a slider or scale dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliderRange {
    pub min: i64,
    pub max: i64,
    pub step: i64,
}

impl SliderRange {
    pub fn new(min: i64, max: i64, step: i64) -> Result<Self> {
        if min > max {
            return Err(DialogError::precondition(format!(
                "slider minimum {min} is greater than maximum {max}"
            )));
        }
        if step <= 0 {
            return Err(DialogError::precondition(format!(
                "slider step must be positive, got {step}"
            )));
        }
        Ok(Self { min, max, step })
    }

    /// Initial value when the caller gives none: `floor(min / max)`.
    ///
    /// This is usually `0` rather than a midpoint. A zero maximum yields `min`.
    pub fn default_value(&self) -> i64 {
        if self.max == 0 {
            return self.min;
        }
        (self.min as f64 / self.max as f64).floor() as i64
    }

    /// Clamps to `[min, max]` and snaps down onto the step grid.
    pub fn clamp(&self, value: i64) -> i64 {
        let value = value.clamp(self.min, self.max);
        self.min + (value - self.min) / self.step * self.step
    }
}
