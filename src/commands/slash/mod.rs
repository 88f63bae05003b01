//! # Slash Commands (/)
//!
//! Discord native slash command definitions and option helpers.
//!
//! - **Version**: 3.0.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 3.0.0: Debate command set (/setup, /register, /analyze, /analyze_me, /debate_status)
//! - 1.0.0: Reorganized from monolithic slash_commands.rs

pub mod analyze;
pub mod setup;
pub mod status;

use anyhow::Result;
use log::info;
use serenity::builder::CreateApplicationCommand;
use serenity::http::Http;
use serenity::model::application::command::Command;
use serenity::model::application::interaction::application_command::CommandDataOption;
use serenity::model::id::GuildId;

/// Creates all slash command definitions
pub fn create_slash_commands() -> Vec<CreateApplicationCommand> {
    let mut commands = Vec::new();

    // Setup commands
    commands.extend(setup::create_commands());

    // Analysis commands
    commands.extend(analyze::create_commands());

    // Status command
    commands.extend(status::create_commands());

    commands
}

/// Registers all slash commands globally
pub async fn register_global_commands(http: &Http) -> Result<()> {
    let slash_commands = create_slash_commands();
    let count = slash_commands.len();

    Command::set_global_application_commands(http, |commands| {
        for command in slash_commands {
            commands.add_application_command(command);
        }
        commands
    })
    .await?;

    info!("Global slash commands registered successfully ({count} commands)");
    Ok(())
}

/// Registers all slash commands for a specific guild (faster for testing)
pub async fn register_guild_commands(http: &Http, guild_id: GuildId) -> Result<()> {
    let slash_commands = create_slash_commands();
    let count = slash_commands.len();

    guild_id
        .set_application_commands(http, |commands| {
            for command in slash_commands {
                commands.add_application_command(command);
            }
            commands
        })
        .await?;

    info!("Guild slash commands registered for guild {guild_id} ({count} commands)");
    Ok(())
}

/// Utility function to get string option from slash command
pub fn get_string_option(options: &[CommandDataOption], name: &str) -> Option<String> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_str())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Utility function to get channel option from slash command
pub fn get_channel_option(options: &[CommandDataOption], name: &str) -> Option<u64> {
    snowflake_option(options, name)
}

/// Utility function to get user option from slash command
pub fn get_user_option(options: &[CommandDataOption], name: &str) -> Option<u64> {
    snowflake_option(options, name)
}

fn snowflake_option(options: &[CommandDataOption], name: &str) -> Option<u64> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_str())
        .and_then(|s| s.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn option(name: &str, value: serde_json::Value) -> CommandDataOption {
        serde_json::from_value(json!({
            "name": name,
            "type": 3,
            "value": value,
        }))
        .unwrap()
    }

    #[test]
    fn test_create_slash_commands() {
        let commands = create_slash_commands();
        let command_names: Vec<String> = commands
            .iter()
            .map(|cmd| cmd.0.get("name").unwrap().as_str().unwrap().to_string())
            .collect();

        assert_eq!(
            command_names,
            vec!["setup", "register", "analyze", "analyze_me", "debate_status"]
        );
    }

    #[test]
    fn test_string_option_blank_is_none() {
        let options = vec![option("optimist_assistant", json!("   ")), option("x", json!(" a "))];
        assert_eq!(get_string_option(&options, "optimist_assistant"), None);
        assert_eq!(get_string_option(&options, "x"), Some("a".to_string()));
        assert_eq!(get_string_option(&options, "missing"), None);
    }

    #[test]
    fn test_snowflake_options_parse() {
        let options = vec![
            option("player1", json!("123456789012345678")),
            option("general", json!("not-a-number")),
        ];
        assert_eq!(get_user_option(&options, "player1"), Some(123456789012345678));
        assert_eq!(get_channel_option(&options, "general"), None);
    }
}
