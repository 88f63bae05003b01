//! # Debate Status Command
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.2.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation

use serenity::builder::CreateApplicationCommand;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    let mut command = CreateApplicationCommand::default();
    command
        .name("debate_status")
        .description("Show cooldown, running state and setup for debates");
    vec![command]
}
