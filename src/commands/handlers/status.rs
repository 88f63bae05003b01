//! Debate status command handler
//!
//! Handles: debate_status
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.2.0
//!
//! ## Changelog
//! - 1.0.0: Initial implementation

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::commands::context::{respond, CommandContext};
use crate::commands::handler::SlashCommandHandler;
use crate::features::analysis::CoordinatorStatus;

pub struct StatusHandler;

#[async_trait]
impl SlashCommandHandler for StatusHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["debate_status"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let scope = command
            .guild_id
            .map(|g| g.to_string())
            .unwrap_or_default();
        let status = ctx.coordinator.status(&scope, &command.user.id.to_string());
        debug!("Status for {} in {scope}: {status:?}", command.user.id);

        let uptime = ctx.start_time.elapsed().as_secs();
        let message = format!("{}\nUptime: {}m {}s", status_message(&status), uptime / 60, uptime % 60);
        respond(serenity_ctx, command, &message, true).await
    }
}

pub fn status_message(status: &CoordinatorStatus) -> String {
    let run = if status.running {
        "🔴 A debate is running".to_string()
    } else if status.cooldown_remaining.is_zero() {
        "🟢 Ready to analyze".to_string()
    } else {
        format!(
            "⏳ Cooldown: {}s remaining",
            status.cooldown_remaining.as_secs().max(1)
        )
    };
    let group = if status.group_configured {
        format!(
            "✅ Group mode configured ({} buffered general messages)",
            status.buffered_messages
        )
    } else {
        "➖ Group mode not configured (`/setup`)".to_string()
    };
    let user = if status.user_configured {
        "✅ You have debate threads"
    } else {
        "➖ You have no debate threads (`/register`)"
    };

    format!("**Debate status**\n{run}\n{group}\n{user}")
}
