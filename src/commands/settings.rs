use crate::cli::SettingsCommand;
use crate::commands::open_store;
use crate::config::Config;
use crate::error::Result;
use crate::storage::LocalStore;
use colored::Colorize;
use serde_json::Value;

/// Parse a setting value as JSON, keeping it as a string otherwise
pub fn parse_setting_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Handle settings commands
pub fn handle_settings(config: &Config, command: SettingsCommand) -> Result<()> {
    let store = open_store(config)?;
    match command {
        SettingsCommand::Get { key } => match store.get_setting(&key)? {
            Some(value) => println!("{}", value),
            None => println!("{}", format!("{} is not set", key).yellow()),
        },
        SettingsCommand::Set { key, value } => {
            let value = parse_setting_value(&value);
            store.set_setting(&key, value.clone())?;
            println!("{} = {}", key.cyan(), value);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_setting_value() {
        assert_eq!(parse_setting_value("true"), Value::Bool(true));
        assert_eq!(parse_setting_value("42"), serde_json::json!(42));
        assert_eq!(parse_setting_value("hi"), Value::String("hi".to_string()));
        assert_eq!(
            parse_setting_value("{\"voice\":false}"),
            serde_json::json!({"voice": false})
        );
    }
}
