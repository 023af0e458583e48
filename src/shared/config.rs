use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::Deserialize;

use crate::backend::Backend;
use crate::infra::notification::Urgency;

/// Top-level configuration for dialogbridge.
#[derive(Debug, Default, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Backend to use regardless of detection ("kdialog", "zenity" or "none").
    #[serde(default)]
    pub backend: Option<Backend>,

    /// Desktop notification settings.
    #[serde(default)]
    pub notification: NotificationConfig,

    /// Progress bar settings.
    #[serde(default)]
    pub progress: ProgressConfig,

    /// Passive popup settings.
    #[serde(default)]
    pub popup: PopupConfig,
}

/// Notification configuration.
#[derive(Debug, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct NotificationConfig {
    /// Application name reported to the notification daemon (default: "dialogbridge").
    #[serde(default = "default_app_name")]
    #[schemars(default = "default_app_name")]
    pub app_name: String,

    /// Urgency level: "low", "normal" or "critical" (default: "normal").
    #[serde(default)]
    pub urgency: Urgency,

    /// Expiration timeout in milliseconds. Unset leaves it to the daemon.
    #[serde(default)]
    pub expire_time_ms: Option<u32>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            urgency: Urgency::default(),
            expire_time_ms: None,
        }
    }
}

/// Progress bar configuration.
#[derive(Debug, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProgressConfig {
    /// Close the progress dialog once it reaches its size (default: true).
    #[serde(default = "default_true")]
    #[schemars(default = "default_true")]
    pub auto_close: bool,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            auto_close: default_true(),
        }
    }
}

/// Passive popup configuration.
#[derive(Debug, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PopupConfig {
    /// Seconds a passive popup stays visible (default: 5).
    #[serde(default = "default_popup_timeout")]
    #[schemars(default = "default_popup_timeout")]
    pub timeout_secs: u32,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_popup_timeout(),
        }
    }
}

fn default_app_name() -> String {
    "dialogbridge".to_string()
}

fn default_true() -> bool {
    true
}

fn default_popup_timeout() -> u32 {
    5
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read config file (permission error, etc.)
    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// YAML parse error
    #[error("Invalid config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },
}

/// Load configuration from ~/.config/dialogbridge/config.ya?ml.
/// Returns Config::default() if no config file exists.
pub fn load_config() -> anyhow::Result<Config> {
    let Some(dir) = super::dirs::config_dir() else {
        return Ok(Config::default());
    };
    load_config_from_dir(&dir.join("dialogbridge"))
}

/// Load configuration from a specific directory.
/// Searches for config.yaml, then config.yml in the given directory.
/// Returns Config::default() if neither file exists.
pub fn load_config_from_dir(dir: &Path) -> anyhow::Result<Config> {
    for filename in &["config.yaml", "config.yml"] {
        let path = dir.join(filename);
        match std::fs::read_to_string(&path) {
            Ok(content) => return parse_config(&content, &path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => return Err(ConfigError::ReadError { path, source: e }.into()),
        }
    }

    Ok(Config::default())
}

/// Parse YAML content into Config.
fn parse_config(content: &str, path: &Path) -> anyhow::Result<Config> {
    serde_yaml::from_str(content)
        .map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
        .map_err(Into::into)
}

/// Generate JSON Schema for the Config struct.
pub fn generate_schema() -> schemars::Schema {
    schemars::schema_for!(Config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn config_default_has_expected_values() {
        let config = Config::default();

        assert_eq!(config.backend, None);
        assert_eq!(config.notification.app_name, "dialogbridge");
        assert_eq!(config.notification.urgency, Urgency::Normal);
        assert_eq!(config.notification.expire_time_ms, None);
        assert!(config.progress.auto_close);
        assert_eq!(config.popup.timeout_secs, 5);
    }

    #[test]
    fn parse_full_yaml_config() {
        let yaml = "\
backend: kdialog
notification:
  app_name: builder
  urgency: critical
  expire_time_ms: 3000
progress:
  auto_close: false
popup:
  timeout_secs: 10
";
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.backend, Some(Backend::Kdialog));
        assert_eq!(config.notification.app_name, "builder");
        assert_eq!(config.notification.urgency, Urgency::Critical);
        assert_eq!(config.notification.expire_time_ms, Some(3000));
        assert!(!config.progress.auto_close);
        assert_eq!(config.popup.timeout_secs, 10);
    }

    #[test]
    fn parse_partial_yaml_uses_defaults() {
        let yaml = "\
notification:
  urgency: low
";
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.notification.urgency, Urgency::Low);
        assert_eq!(config.notification.app_name, "dialogbridge");
        assert_eq!(config.progress, ProgressConfig::default());
        assert_eq!(config.popup, PopupConfig::default());
    }

    #[test]
    fn parse_empty_yaml_uses_all_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[rstest]
    #[case::unknown_top_level("colour: red\n")]
    #[case::unknown_nested("progress:\n  speed: 3\n")]
    #[case::bad_backend("backend: qt\n")]
    fn parse_rejects_invalid_yaml(#[case] yaml: &str) {
        let result: Result<Config, _> = serde_yaml::from_str(yaml);
        assert!(result.is_err());
    }

    #[rstest]
    #[case::yaml("config.yaml")]
    #[case::yml("config.yml")]
    fn load_config_from_dir_reads_either_extension(#[case] filename: &str) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(filename), "backend: zenity\n").unwrap();

        let config = load_config_from_dir(dir.path()).unwrap();
        assert_eq!(config.backend, Some(Backend::Zenity));
    }

    #[test]
    fn load_config_from_dir_prefers_yaml_over_yml() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.yaml"), "backend: kdialog\n").unwrap();
        fs::write(dir.path().join("config.yml"), "backend: zenity\n").unwrap();

        let config = load_config_from_dir(dir.path()).unwrap();
        assert_eq!(config.backend, Some(Backend::Kdialog));
    }

    #[test]
    fn load_config_from_dir_returns_default_when_missing() {
        let dir = TempDir::new().unwrap();
        let config = load_config_from_dir(dir.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_config_from_dir_reports_parse_errors_with_path() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.yaml"), "backend: [").unwrap();

        let err = load_config_from_dir(dir.path()).unwrap_err();
        assert!(err.to_string().contains("config.yaml"));
    }

    #[test]
    fn load_config_reads_from_xdg_config_home() {
        let dir = TempDir::new().unwrap();
        let app_dir = dir.path().join("dialogbridge");
        fs::create_dir_all(&app_dir).unwrap();
        fs::write(app_dir.join("config.yaml"), "popup:\n  timeout_secs: 2\n").unwrap();

        temp_env::with_vars(
            [("XDG_CONFIG_HOME", Some(dir.path().to_str().unwrap()))],
            || {
                let config = load_config().unwrap();
                assert_eq!(config.popup.timeout_secs, 2);
            },
        );
    }
}
