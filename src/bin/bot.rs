use anyhow::Result;
use dotenvy::dotenv;
use log::{error, info, warn};
use serenity::async_trait;
use serenity::http::Http;
use serenity::model::application::interaction::{Interaction, InteractionResponseType};
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::model::id::GuildId;
use serenity::prelude::*;
use std::sync::Arc;

use duet::commands::{register_global_commands, register_guild_commands, CommandContext, CommandHandler};
use duet::core::Config;
use duet::features::{BackboardClient, DebateCoordinator, DeliveryAdapter};

/// Optimist connection: slash commands and message buffering
struct OptimistHandler {
    command_handler: Arc<CommandHandler>,
    guild_id: Option<GuildId>,
}

#[async_trait]
impl EventHandler for OptimistHandler {
    async fn message(&self, _ctx: Context, msg: Message) {
        self.command_handler.handle_message(&msg);
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("🌞 Optimist {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());

        let registered = match self.guild_id {
            Some(guild_id) => register_guild_commands(&ctx.http, guild_id).await,
            None => register_global_commands(&ctx.http).await,
        };
        if let Err(e) = registered {
            error!("Failed to register slash commands: {e}");
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::ApplicationCommand(command) = interaction else {
            return;
        };

        if let Err(e) = self.command_handler.handle_slash_command(&ctx, &command).await {
            error!("Error handling slash command '{}': {}", command.data.name, e);

            let error_message =
                "❌ Sorry, I encountered an error processing your command. Please try again.";

            #[allow(clippy::redundant_pattern_matching)]
            if let Err(_) = command
                .edit_original_interaction_response(&ctx.http, |response| {
                    response.content(error_message)
                })
                .await
            {
                let _ = command
                    .create_interaction_response(&ctx.http, |response| {
                        response
                            .kind(InteractionResponseType::ChannelMessageWithSource)
                            .interaction_response_data(|message| message.content(error_message))
                    })
                    .await;
            }
        }
    }
}

/// Pessimist connection: posting identity only
struct PessimistHandler;

#[async_trait]
impl EventHandler for PessimistHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("🌧️ Pessimist {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting optimist/pessimist debate bots...");

    let provider = Arc::new(BackboardClient::from_config(&config)?);
    let delivery = Arc::new(DeliveryAdapter::new(
        Arc::new(Http::new(&config.optimist_discord_token)),
        Arc::new(Http::new(&config.pessimist_discord_token)),
    ));
    let coordinator = Arc::new(DebateCoordinator::from_config(&config, provider, delivery));

    let settings = coordinator.settings();
    info!(
        "Debate settings: {} turns, {}s per turn, {}s per analysis, {}s cooldown, {} prompts",
        settings.turns,
        settings.turn_timeout.as_secs(),
        settings.analysis_timeout.as_secs(),
        config.cooldown_secs,
        config.prompt_style
    );
    if config.optimist_assistant_id.is_none() || config.pessimist_assistant_id.is_none() {
        warn!("Default assistant ids are not set; /setup and /register will require them as options");
    }

    let guild_id = config
        .discord_guild_id
        .as_ref()
        .and_then(|id| id.parse::<u64>().ok())
        .map(GuildId);

    let command_handler = CommandHandler::new(CommandContext::from_config(&config, coordinator));
    let optimist = OptimistHandler {
        command_handler: Arc::new(command_handler),
        guild_id,
    };

    let optimist_intents =
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT;

    let mut optimist_client = Client::builder(&config.optimist_discord_token, optimist_intents)
        .event_handler(optimist)
        .await
        .map_err(|e| {
            error!("Failed to create optimist Discord client: {e}");
            anyhow::anyhow!("Optimist client creation failed: {}", e)
        })?;

    let mut pessimist_client = Client::builder(&config.pessimist_discord_token, GatewayIntents::GUILDS)
        .event_handler(PessimistHandler)
        .await
        .map_err(|e| {
            error!("Failed to create pessimist Discord client: {e}");
            anyhow::anyhow!("Pessimist client creation failed: {}", e)
        })?;

    info!("Both bots configured. Connecting to Discord gateway...");

    tokio::spawn(async move {
        if let Err(why) = pessimist_client.start().await {
            error!("Pessimist gateway connection failed: {why:?}");
        }
    });

    if let Err(why) = optimist_client.start().await {
        error!("Optimist gateway connection failed: {why:?}");
        return Err(anyhow::anyhow!(
            "Failed to establish gateway connection: {}",
            why
        ));
    }

    Ok(())
}
