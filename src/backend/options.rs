//! Backend-agnostic dialog options and their translation into CLI flags.
//!
//! [`DialogOptions`] is an open map: the builder methods cover the options
//! every dialog understands, and [`DialogOptions::set`] passes anything else
//! through as `--key-name value`.

/// Value of a single option.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Text(String),
    Number(i64),
    Float(f64),
    /// `true` emits the bare flag, `false` emits nothing.
    Flag(bool),
    List(Vec<String>),
    /// Rendered as a single `WxH` token.
    Geometry { width: u32, height: u32 },
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for OptionValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for OptionValue {
    fn from(value: u32) -> Self {
        Self::Number(i64::from(value))
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<Vec<String>> for OptionValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<Vec<&str>> for OptionValue {
    fn from(value: Vec<&str>) -> Self {
        Self::List(value.into_iter().map(String::from).collect())
    }
}

/// How a list value is laid out on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStyle {
    /// `--flag a,b,c`
    Joined(char),
    /// `--flag a --flag b --flag c`
    Repeated,
}

/// Ordered option map. Setting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DialogOptions {
    entries: Vec<(String, OptionValue)>,
}

impl DialogOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an arbitrary option.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.insert(key.into(), value.into());
        self
    }

    /// Sets an option only when a value is present.
    pub fn set_opt<V: Into<OptionValue>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.set(key, value),
            None => self,
        }
    }

    /// Sets a boolean flag.
    pub fn flag(self, key: impl Into<String>, enabled: bool) -> Self {
        self.set(key, enabled)
    }

    pub fn title(self, title: impl Into<String>) -> Self {
        self.set("title", title.into())
    }

    pub fn geometry(self, width: u32, height: u32) -> Self {
        self.set("geometry", OptionValue::Geometry { width, height })
    }

    pub fn icon(self, icon: impl Into<String>) -> Self {
        self.set("icon", icon.into())
    }

    pub fn ok_label(self, label: impl Into<String>) -> Self {
        self.set("ok_label", label.into())
    }

    pub fn cancel_label(self, label: impl Into<String>) -> Self {
        self.set("cancel_label", label.into())
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sets `key` unless the caller already chose a value for it.
    pub(crate) fn with_default(self, key: &str, value: impl Into<OptionValue>) -> Self {
        if self.contains(key) {
            self
        } else {
            self.set(key, value)
        }
    }

    /// Renames `from` to `to`, keeping its position.
    pub(crate) fn rename(mut self, from: &str, to: &str) -> Self {
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| k == from) {
            entry.0 = to.to_string();
        }
        self
    }

    /// Replaces a `Geometry` value under `key` with separate `width`/`height` entries.
    pub(crate) fn split_geometry(mut self, key: &str) -> Self {
        let Some(index) = self.entries.iter().position(|(k, _)| k == key) else {
            return self;
        };
        if let OptionValue::Geometry { width, height } = self.entries[index].1 {
            self.entries.remove(index);
            self.entries
                .insert(index, ("height".to_string(), OptionValue::from(height)));
            self.entries
                .insert(index, ("width".to_string(), OptionValue::from(width)));
        }
        self
    }

    /// Appends all entries of `other`, letting `other` win on conflicts.
    pub(crate) fn merge(mut self, other: &DialogOptions) -> Self {
        for (key, value) in &other.entries {
            self.insert(key.clone(), value.clone());
        }
        self
    }

    /// Translates the options into argument tokens.
    pub fn to_args(&self, list_style: ListStyle) -> Vec<String> {
        let mut args = Vec::new();
        for (key, value) in &self.entries {
            push_option(&mut args, &flag_name(key), value, list_style);
        }
        args
    }

    fn insert(&mut self, key: String, value: OptionValue) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }
}

/// `foo_bar` becomes `--foo-bar`.
pub fn flag_name(key: &str) -> String {
    format!("--{}", key.replace('_', "-"))
}

fn push_option(args: &mut Vec<String>, flag: &str, value: &OptionValue, list_style: ListStyle) {
    match value {
        OptionValue::Flag(true) => args.push(flag.to_string()),
        OptionValue::Flag(false) => {}
        OptionValue::Text(text) => args.extend([flag.to_string(), text.clone()]),
        OptionValue::Number(n) => args.extend([flag.to_string(), n.to_string()]),
        OptionValue::Float(f) => args.extend([flag.to_string(), f.to_string()]),
        OptionValue::Geometry { width, height } => {
            args.extend([flag.to_string(), format!("{width}x{height}")]);
        }
        OptionValue::List(items) => match list_style {
            ListStyle::Joined(separator) => {
                let joined = items.join(&separator.to_string());
                args.extend([flag.to_string(), joined]);
            }
            ListStyle::Repeated => {
                for item in items {
                    args.extend([flag.to_string(), item.clone()]);
                }
            }
        },
    }
}
