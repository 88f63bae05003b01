//! # Setup Commands
//!
//! `/setup` configures two-player group mode; `/register` creates a
//! single-user session for the invoking user.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Optional assistant overrides, falling back to configured defaults
//! - 1.0.0: Initial implementation

use serenity::builder::{CreateApplicationCommand, CreateApplicationCommandOption};
use serenity::model::application::command::CommandOptionType;
use serenity::model::channel::ChannelType;

pub const OPTIMIST_ASSISTANT_OPTION: &str = "optimist_assistant";
pub const PESSIMIST_ASSISTANT_OPTION: &str = "pessimist_assistant";

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![create_setup_command(), create_register_command()]
}

fn create_setup_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("setup")
        .description("Configure two-player debate mode for this server")
        .dm_permission(false)
        .create_option(|option| {
            option
                .name("player1")
                .description("First player")
                .kind(CommandOptionType::User)
                .required(true)
        })
        .create_option(|option| {
            option
                .name("player2")
                .description("Second player")
                .kind(CommandOptionType::User)
                .required(true)
        })
        .create_option(|option| text_channel(option, "general", "Channel whose messages are analyzed"))
        .create_option(|option| text_channel(option, "player1_room", "Where player 1's debate is posted"))
        .create_option(|option| text_channel(option, "player2_room", "Where player 2's debate is posted"))
        .add_option(assistant_option(OPTIMIST_ASSISTANT_OPTION, "Optimist assistant id"))
        .add_option(assistant_option(PESSIMIST_ASSISTANT_OPTION, "Pessimist assistant id"));
    command
}

fn create_register_command() -> CreateApplicationCommand {
    let mut command = CreateApplicationCommand::default();
    command
        .name("register")
        .description("Create your own optimist and pessimist debate threads")
        .add_option(assistant_option(OPTIMIST_ASSISTANT_OPTION, "Optimist assistant id"))
        .add_option(assistant_option(PESSIMIST_ASSISTANT_OPTION, "Pessimist assistant id"));
    command
}

fn text_channel<'a>(
    option: &'a mut CreateApplicationCommandOption,
    name: &str,
    description: &str,
) -> &'a mut CreateApplicationCommandOption {
    option
        .name(name)
        .description(description)
        .kind(CommandOptionType::Channel)
        .channel_types(&[ChannelType::Text])
        .required(true)
}

fn assistant_option(name: &str, description: &str) -> CreateApplicationCommandOption {
    let mut option = CreateApplicationCommandOption::default();
    option
        .name(name)
        .description(description)
        .kind(CommandOptionType::String)
        .required(false);
    option
}
