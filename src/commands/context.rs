//! Shared context for command handlers
//!
//! - **Version**: 2.0.0
//! - **Since**: 3.38.0
//!
//! ## Changelog
//! - 2.0.0: Debate coordinator and default assistant ids replace the chat services
//! - 1.0.0: Initial implementation with core shared state

use anyhow::{anyhow, Result};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::core::{truncate_for_message, Config};
use crate::features::analysis::DebateCoordinator;

/// Shared context for all command handlers
#[derive(Clone)]
pub struct CommandContext {
    pub coordinator: Arc<DebateCoordinator>,
    pub default_optimist_assistant: Option<String>,
    pub default_pessimist_assistant: Option<String>,
    pub start_time: std::time::Instant,
}

impl CommandContext {
    pub fn new(
        coordinator: Arc<DebateCoordinator>,
        default_optimist_assistant: Option<String>,
        default_pessimist_assistant: Option<String>,
    ) -> Self {
        Self {
            coordinator,
            default_optimist_assistant,
            default_pessimist_assistant,
            start_time: std::time::Instant::now(),
        }
    }

    pub fn from_config(config: &Config, coordinator: Arc<DebateCoordinator>) -> Self {
        Self::new(
            coordinator,
            config.optimist_assistant_id.clone(),
            config.pessimist_assistant_id.clone(),
        )
    }

    /// Pick assistant ids from command options, falling back to configured defaults
    pub fn resolve_assistants(
        &self,
        optimist: Option<String>,
        pessimist: Option<String>,
    ) -> Result<(String, String)> {
        let optimist = optimist
            .or_else(|| self.default_optimist_assistant.clone())
            .ok_or_else(|| anyhow!("No optimist assistant id given and OPTIMIST_ASSISTANT_ID is not set"))?;
        let pessimist = pessimist
            .or_else(|| self.default_pessimist_assistant.clone())
            .ok_or_else(|| anyhow!("No pessimist assistant id given and PESSIMIST_ASSISTANT_ID is not set"))?;
        Ok((optimist, pessimist))
    }
}

/// Immediate reply to a slash command
pub async fn respond(
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
    content: &str,
    ephemeral: bool,
) -> Result<()> {
    let content = truncate_for_message(content);
    command
        .create_interaction_response(&serenity_ctx.http, |r| {
            r.kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|message| message.content(&content).ephemeral(ephemeral))
        })
        .await?;
    Ok(())
}

/// Acknowledge now, answer later with [`edit_response`]
pub async fn defer(serenity_ctx: &Context, command: &ApplicationCommandInteraction) -> Result<()> {
    command
        .create_interaction_response(&serenity_ctx.http, |r| {
            r.kind(InteractionResponseType::DeferredChannelMessageWithSource)
        })
        .await?;
    Ok(())
}

pub async fn edit_response(
    serenity_ctx: &Context,
    command: &ApplicationCommandInteraction,
    content: &str,
) -> Result<()> {
    let content = truncate_for_message(content);
    command
        .edit_original_interaction_response(&serenity_ctx.http, |r| r.content(&content))
        .await?;
    Ok(())
}
