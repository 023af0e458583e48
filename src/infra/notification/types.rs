use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Urgency level understood by freedesktop notification daemons.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    JsonSchema,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    #[default]
    Normal,
    Critical,
}

impl Urgency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::Critical => "critical",
        }
    }
}

/// A desktop notification, optionally with buttons.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Notification {
    summary: String,
    body: String,
    app_name: Option<String>,
    icon: Option<String>,
    urgency: Option<Urgency>,
    expire_time_ms: Option<u32>,
    categories: Vec<String>,
    actions: Vec<String>,
}

impl Notification {
    /// Creates a notification with the given summary line and body.
    pub fn new(summary: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            body: body.into(),
            ..Self::default()
        }
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = Some(urgency);
        self
    }

    /// Milliseconds before the daemon hides the notification.
    pub fn with_expire_time(mut self, ms: u32) -> Self {
        self.expire_time_ms = Some(ms);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }

    /// Adds a button. Buttons are numbered from 1 in the order they are added.
    pub fn with_action(mut self, label: impl Into<String>) -> Self {
        self.actions.push(label.into());
        self
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn app_name(&self) -> Option<&str> {
        self.app_name.as_deref()
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn urgency(&self) -> Option<Urgency> {
        self.urgency
    }

    pub fn expire_time_ms(&self) -> Option<u32> {
        self.expire_time_ms
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn actions(&self) -> &[String] {
        &self.actions
    }

    /// Fills unset fields from `defaults`, keeping anything already chosen.
    pub(crate) fn or_defaults(mut self, defaults: &Notification) -> Self {
        self.app_name = self.app_name.or_else(|| defaults.app_name.clone());
        self.icon = self.icon.or_else(|| defaults.icon.clone());
        self.urgency = self.urgency.or(defaults.urgency);
        self.expire_time_ms = self.expire_time_ms.or(defaults.expire_time_ms);
        self
    }

    /// Maps a reported action key back to a 1-based button index.
    ///
    /// Anything that is not one of this notification's buttons counts as
    /// "dismissed without a button" and yields 0.
    pub(crate) fn action_index(&self, key: &str) -> usize {
        key.trim()
            .parse::<usize>()
            .ok()
            .filter(|index| (1..=self.actions.len()).contains(index))
            .unwrap_or(0)
    }
}
