use crate::commands::context::{respond, CommandContext};
use crate::commands::handlers::create_all_handlers;
use crate::commands::registry::CommandRegistry;
use crate::features::buffer::BufferedMessage;
use anyhow::Result;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::channel::Message;
use serenity::prelude::Context;
use std::sync::Arc;
use uuid::Uuid;

/// Entry point for the optimist connection's inbound events
#[derive(Clone)]
pub struct CommandHandler {
    registry: CommandRegistry,
    context: Arc<CommandContext>,
}

impl CommandHandler {
    pub fn new(context: CommandContext) -> Self {
        Self {
            registry: CommandRegistry::with_handlers(create_all_handlers()),
            context: Arc::new(context),
        }
    }

    pub fn context(&self) -> &CommandContext {
        &self.context
    }

    /// Buffer a guild message for later analysis
    ///
    /// Bot authors, DMs and empty content are ignored.
    pub fn handle_message(&self, msg: &Message) {
        if msg.author.bot || msg.content.trim().is_empty() {
            return;
        }
        let Some(guild_id) = msg.guild_id else {
            return;
        };

        let timestamp = DateTime::from_timestamp(msg.timestamp.unix_timestamp(), 0)
            .unwrap_or_else(Utc::now);
        let message = BufferedMessage::new(
            msg.content.clone(),
            msg.author.name.clone(),
            msg.author.id.to_string(),
            timestamp,
        );

        debug!(
            "Buffered message from {} in {}/{} ({} chars)",
            msg.author.name,
            guild_id,
            msg.channel_id,
            msg.content.len()
        );
        self.context
            .coordinator
            .observe(&guild_id.to_string(), &msg.channel_id.to_string(), message);
    }

    pub async fn handle_slash_command(&self, ctx: &Context, command: &ApplicationCommandInteraction) -> Result<()> {
        let request_id = Uuid::new_v4();
        let guild_id = command
            .guild_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "DM".to_string());

        info!(
            "[{request_id}] 📥 Slash command received | Command: {} | User: {} | Channel: {} | Guild: {}",
            command.data.name, command.user.id, command.channel_id, guild_id
        );

        match self.registry.get(&command.data.name) {
            Some(handler) => handler.handle(Arc::clone(&self.context), ctx, command).await,
            None => {
                warn!("[{request_id}] Unknown slash command: {}", command.data.name);
                respond(ctx, command, "Unknown command.", true).await
            }
        }
    }
}
