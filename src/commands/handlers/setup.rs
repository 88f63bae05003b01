//! Setup command handler
//!
//! Handles: setup, register
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Group topology setup for two-player mode
//! - 1.0.0: Single-user registration

use anyhow::Result;
use async_trait::async_trait;
use log::{error, info};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::sync::Arc;
use uuid::Uuid;

use crate::commands::context::{defer, edit_response, respond, CommandContext};
use crate::commands::handler::SlashCommandHandler;
use crate::commands::slash::setup::{OPTIMIST_ASSISTANT_OPTION, PESSIMIST_ASSISTANT_OPTION};
use crate::commands::slash::{get_channel_option, get_string_option, get_user_option};
use crate::features::analysis::GroupSetup;
use crate::features::sessions::{GroupTopology, SessionSetup};

/// Handler for /setup and /register
pub struct SetupHandler;

#[async_trait]
impl SlashCommandHandler for SetupHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["setup", "register"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let request_id = Uuid::new_v4();

        match command.data.name.as_str() {
            "setup" => self.handle_setup(&ctx, serenity_ctx, command, request_id).await,
            "register" => self.handle_register(&ctx, serenity_ctx, command, request_id).await,
            _ => Ok(()),
        }
    }
}

impl SetupHandler {
    async fn handle_setup(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
        request_id: Uuid,
    ) -> Result<()> {
        let Some(guild_id) = command.guild_id else {
            return respond(serenity_ctx, command, "❌ `/setup` only works in a server.", true).await;
        };
        let options = &command.data.options;

        let id = |value: Option<u64>| value.map(|v| v.to_string()).unwrap_or_default();
        let topology = match GroupTopology::new(
            id(get_user_option(options, "player1")),
            id(get_user_option(options, "player2")),
            id(get_channel_option(options, "general")),
            id(get_channel_option(options, "player1_room")),
            id(get_channel_option(options, "player2_room")),
        ) {
            Ok(topology) => topology,
            Err(e) => {
                return respond(serenity_ctx, command, &format!("❌ Setup failed: {e}"), true).await;
            }
        };

        let assistants = ctx.resolve_assistants(
            get_string_option(options, OPTIMIST_ASSISTANT_OPTION),
            get_string_option(options, PESSIMIST_ASSISTANT_OPTION),
        );
        let (optimist, pessimist) = match assistants {
            Ok(ids) => ids,
            Err(e) => {
                return respond(serenity_ctx, command, &format!("❌ {e}"), true).await;
            }
        };

        info!(
            "[{request_id}] /setup in guild {guild_id} by {}: players {} and {}",
            command.user.id,
            topology.player1_id(),
            topology.player2_id()
        );
        defer(serenity_ctx, command).await?;

        let reply = match ctx
            .coordinator
            .setup_group(&guild_id.to_string(), topology, &optimist, &pessimist)
            .await
        {
            Ok(setup) => group_setup_message(&setup),
            Err(e) => {
                error!("[{request_id}] Group setup failed: {e}");
                format!("❌ Setup failed: {e}")
            }
        };
        edit_response(serenity_ctx, command, &reply).await
    }

    async fn handle_register(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
        request_id: Uuid,
    ) -> Result<()> {
        let options = &command.data.options;
        let assistants = ctx.resolve_assistants(
            get_string_option(options, OPTIMIST_ASSISTANT_OPTION),
            get_string_option(options, PESSIMIST_ASSISTANT_OPTION),
        );
        let (optimist, pessimist) = match assistants {
            Ok(ids) => ids,
            Err(e) => {
                return respond(serenity_ctx, command, &format!("❌ {e}"), true).await;
            }
        };

        let user_id = command.user.id.to_string();
        info!("[{request_id}] /register by {} ({user_id})", command.user.name);
        defer(serenity_ctx, command).await?;

        let reply = match ctx.coordinator.setup_user(&user_id, &optimist, &pessimist).await {
            Ok(setup) => user_setup_message(&setup),
            Err(e) => {
                error!("[{request_id}] Registration failed for {user_id}: {e}");
                format!("❌ Setup failed: {e}")
            }
        };
        edit_response(serenity_ctx, command, &reply).await
    }
}

pub fn user_setup_message(setup: &SessionSetup) -> String {
    let session = setup.session();
    let headline = if setup.was_created() {
        "✅ Debate threads created!"
    } else {
        "✅ You already have threads set up!"
    };
    format!(
        "{headline}\nOptimist thread: `{}`\nPessimist thread: `{}`\n\nUse `/analyze_me` to start a debate.",
        session.optimist_thread, session.pessimist_thread
    )
}

pub fn group_setup_message(setup: &GroupSetup) -> String {
    let topology = &setup.topology;
    let mut lines = vec![
        "✅ Setup complete!".to_string(),
        format!("General: <#{}>", topology.general_channel_id()),
    ];
    for ((player_id, room_id), player) in topology.players().into_iter().zip(&setup.players) {
        let state = if player.was_created() { "new threads" } else { "already configured" };
        lines.push(format!("<@{player_id}> → <#{room_id}> ({state})"));
    }
    lines.push(String::new());
    lines.push("Use `/analyze` to run the debate.".to_string());
    lines.join("\n")
}
