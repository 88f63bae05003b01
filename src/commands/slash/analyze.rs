//! # Analyze Commands
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Add /analyze_me for single-user mode
//! - 1.0.0: Initial implementation

use serenity::builder::CreateApplicationCommand;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    let mut analyze = CreateApplicationCommand::default();
    analyze
        .name("analyze")
        .description("Run the optimist vs pessimist debate for both configured players")
        .dm_permission(false);

    let mut analyze_me = CreateApplicationCommand::default();
    analyze_me
        .name("analyze_me")
        .description("Debate your recent messages from across the server")
        .dm_permission(false);

    vec![analyze, analyze_me]
}
