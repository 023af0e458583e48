use clap::Subcommand;

/// Configuration management commands.
#[derive(Subcommand, Clone, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Print JSON Schema for the configuration file
    Schema,

    /// Print the configuration in effect
    Show,
}

impl ConfigCommands {
    pub fn run(&self) -> anyhow::Result<()> {
        match self {
            Self::Schema => {
                let schema = dialogbridge::shared::config::generate_schema();
                let json = serde_json::to_string_pretty(&schema)?;
                println!("{json}");
                Ok(())
            }
            Self::Show => {
                let config = dialogbridge::shared::config::load_config()?;
                println!("{config:#?}");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn schema_generates_valid_json() {
        let schema = dialogbridge::shared::config::generate_schema();
        let value: serde_json::Value = serde_json::to_value(&schema).unwrap();

        assert_eq!(value["title"], "Config");
        assert_eq!(value["type"], "object");
    }

    #[test]
    fn schema_contains_config_properties() {
        let schema = dialogbridge::shared::config::generate_schema();
        let value: serde_json::Value = serde_json::to_value(&schema).unwrap();

        let props = value["properties"].as_object().unwrap();
        assert!(props.contains_key("backend"));
        assert!(props.contains_key("notification"));
        assert!(props.contains_key("progress"));
        assert!(props.contains_key("popup"));

        let defs = value["$defs"].as_object().unwrap();
        let notification_props = defs["NotificationConfig"]["properties"].as_object().unwrap();
        assert!(notification_props.contains_key("app_name"));
        assert!(notification_props.contains_key("urgency"));
        assert!(notification_props.contains_key("expire_time_ms"));
    }
}
