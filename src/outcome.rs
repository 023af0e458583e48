//! Normalized dialog outcomes and the parsers that produce them from raw
//! backend output.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{DialogError, Result};

/// Answer of a confirmation dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Answer {
    Yes,
    No,
    Cancel,
}

impl Answer {
    /// Maps a three-way exit status: 0 is yes, 1 is no, anything else cancels.
    pub fn from_status(status: i32) -> Self {
        match status {
            0 => Self::Yes,
            1 => Self::No,
            _ => Self::Cancel,
        }
    }
}

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a caller-supplied `#rgb` or `#rrggbb` color.
    pub fn from_hex(hex: &str) -> Result<Self> {
        parse_hex(hex).ok_or_else(|| {
            DialogError::precondition(format!(
                "color must be #rgb or #rrggbb, got {hex:?}"
            ))
        })
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Parses a color printed by a backend: `#rrggbb`, `rgb(r,g,b)` or `rgba(r,g,b,a)`.
    pub(crate) fn parse_output(command: &str, output: &str) -> Result<Self> {
        let output = output.trim();
        if let Some(rgb) = parse_hex(output) {
            return Ok(rgb);
        }

        let (_, r, g, b) = lazy_regex::regex_captures!(
            r"^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*[\d.]+\s*)?\)$",
            output
        )
        .ok_or_else(|| DialogError::protocol(command, output))?;

        let channel = |c: &str| {
            c.parse::<u8>()
                .map_err(|_| DialogError::protocol(command, output))
        };
        Ok(Self::new(channel(r)?, channel(g)?, channel(b)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    let digits = hex.strip_prefix('#')?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match digits.len() {
        3 => {
            let expand = |i: usize| channel(digits[i..=i].repeat(2).as_str());
            Some(Rgb::new(expand(0)?, expand(1)?, expand(2)?))
        }
        6 => Some(Rgb::new(
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        )),
        _ => None,
    }
}

/// Calendar output layout shared by both backends: day, month, year.
pub(crate) const DATE_FORMAT: &str = "%d %m %Y";

pub(crate) fn parse_date(command: &str, output: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(output.trim(), DATE_FORMAT)
        .map_err(|_| DialogError::protocol(command, output))
}

pub(crate) fn parse_number(command: &str, output: &str) -> Result<i64> {
    let trimmed = output.trim();
    trimmed
        .parse::<i64>()
        .or_else(|_| trimmed.parse::<f64>().map(|f| f.floor() as i64))
        .map_err(|_| DialogError::protocol(command, output))
}

/// Backend-agnostic result of any dialog operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", content = "value", rename_all = "snake_case")]
pub enum DialogResult {
    Confirmed,
    Declined,
    Cancelled,
    Value(String),
    Selection(Vec<String>),
    Indices(Vec<usize>),
    Color(Rgb),
    Date(NaiveDate),
    Number(i64),
    Absent,
}

impl DialogResult {
    /// True when the user said no, cancelled, or closed the dialog.
    pub fn is_negative(&self) -> bool {
        matches!(self, Self::Declined | Self::Cancelled | Self::Absent)
    }
}

impl fmt::Display for DialogResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Confirmed => f.write_str("yes"),
            Self::Declined => f.write_str("no"),
            Self::Cancelled => f.write_str("cancel"),
            Self::Value(value) => f.write_str(value),
            Self::Selection(items) => f.write_str(&items.join("\n")),
            Self::Indices(indices) => {
                let lines: Vec<String> = indices.iter().map(usize::to_string).collect();
                f.write_str(&lines.join("\n"))
            }
            Self::Color(rgb) => write!(f, "{rgb}"),
            Self::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Number(n) => write!(f, "{n}"),
            Self::Absent => Ok(()),
        }
    }
}

impl From<Answer> for DialogResult {
    fn from(answer: Answer) -> Self {
        match answer {
            Answer::Yes => Self::Confirmed,
            Answer::No => Self::Declined,
            Answer::Cancel => Self::Cancelled,
        }
    }
}

impl From<bool> for DialogResult {
    fn from(confirmed: bool) -> Self {
        if confirmed {
            Self::Confirmed
        } else {
            Self::Declined
        }
    }
}

impl From<Option<String>> for DialogResult {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Absent, Self::Value)
    }
}

impl From<Option<Vec<String>>> for DialogResult {
    fn from(value: Option<Vec<String>>) -> Self {
        value.map_or(Self::Absent, Self::Selection)
    }
}

impl From<Option<Rgb>> for DialogResult {
    fn from(value: Option<Rgb>) -> Self {
        value.map_or(Self::Absent, Self::Color)
    }
}

impl From<Option<NaiveDate>> for DialogResult {
    fn from(value: Option<NaiveDate>) -> Self {
        value.map_or(Self::Absent, Self::Date)
    }
}

impl From<Option<i64>> for DialogResult {
    fn from(value: Option<i64>) -> Self {
        value.map_or(Self::Absent, Self::Number)
    }
}
