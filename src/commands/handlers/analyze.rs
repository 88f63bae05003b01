//! Analyze command handler
//!
//! Handles: analyze, analyze_me
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Single-user /analyze_me
//! - 1.0.0: Group /analyze

use anyhow::Result;
use async_trait::async_trait;
use log::info;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::commands::context::{defer, edit_response, respond, CommandContext};
use crate::commands::handler::SlashCommandHandler;
use crate::features::analysis::AnalyzeOutcome;

/// Which command produced an outcome; the wording differs per mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzeMode {
    Group,
    SingleUser,
}

/// Handler for /analyze and /analyze_me
pub struct AnalyzeHandler;

#[async_trait]
impl SlashCommandHandler for AnalyzeHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["analyze", "analyze_me"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let request_id = Uuid::new_v4();
        let Some(guild_id) = command.guild_id else {
            return respond(serenity_ctx, command, "❌ Debates only run in a server.", true).await;
        };
        let scope = guild_id.to_string();

        let mode = if command.data.name == "analyze" {
            AnalyzeMode::Group
        } else {
            AnalyzeMode::SingleUser
        };
        info!(
            "[{request_id}] /{} requested by {} in channel {}",
            command.data.name, command.user.name, command.channel_id
        );

        defer(serenity_ctx, command).await?;
        let started = Instant::now();

        let outcome = match mode {
            AnalyzeMode::Group => ctx.coordinator.analyze_group(&scope).await,
            AnalyzeMode::SingleUser => {
                ctx.coordinator
                    .analyze_user(
                        &scope,
                        &command.channel_id.to_string(),
                        &command.user.id.to_string(),
                    )
                    .await
            }
        };

        info!(
            "[{request_id}] /{} finished in {:.1}s: {}",
            command.data.name,
            started.elapsed().as_secs_f32(),
            outcome_label(&outcome)
        );
        edit_response(serenity_ctx, command, &outcome_message(&outcome, mode)).await
    }
}

fn outcome_label(outcome: &AnalyzeOutcome) -> &'static str {
    match outcome {
        AnalyzeOutcome::Completed(_) => "completed",
        AnalyzeOutcome::Busy => "busy",
        AnalyzeOutcome::OnCooldown(_) => "on cooldown",
        AnalyzeOutcome::NotConfigured => "not configured",
        AnalyzeOutcome::NoSessionFound(_) => "no session",
        AnalyzeOutcome::NoMessagesFound => "no messages",
        AnalyzeOutcome::TimedOut(_) => "timed out",
    }
}

/// Whole seconds, rounded up so a live cooldown never reads as zero
fn whole_seconds(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}

/// The fixed reply for each analyze outcome
pub fn outcome_message(outcome: &AnalyzeOutcome, mode: AnalyzeMode) -> String {
    match (outcome, mode) {
        (AnalyzeOutcome::Completed(_), AnalyzeMode::Group) => {
            "✅ Analysis complete! Check the player rooms for results.".to_string()
        }
        (AnalyzeOutcome::Completed(reports), AnalyzeMode::SingleUser) => {
            let lines = reports.first().map_or(0, |r| r.result.transcript.len());
            format!("✅ Analysis complete! {lines} debate lines and advice from both sides above.")
        }
        (AnalyzeOutcome::Busy, _) => "⏳ An analysis is already running. Please wait.".to_string(),
        (AnalyzeOutcome::OnCooldown(remaining), _) => format!(
            "⏳ Analysis on cooldown. Try again in {} seconds.",
            whole_seconds(*remaining)
        ),
        (AnalyzeOutcome::NotConfigured, _) => "❌ No setup found. Use `/setup` first!".to_string(),
        (AnalyzeOutcome::NoSessionFound(_), AnalyzeMode::Group) => {
            "❌ Player sessions not found. Re-run `/setup`!".to_string()
        }
        (AnalyzeOutcome::NoSessionFound(_), AnalyzeMode::SingleUser) => {
            "❌ No debate threads found. Use `/register` first!".to_string()
        }
        (AnalyzeOutcome::NoMessagesFound, AnalyzeMode::Group) => {
            "❌ No messages in general channel to analyze.".to_string()
        }
        (AnalyzeOutcome::NoMessagesFound, AnalyzeMode::SingleUser) => {
            "❌ No messages found to analyze. Chat a bit in the server first.".to_string()
        }
        (AnalyzeOutcome::TimedOut(limit), _) => format!(
            "❌ Analysis timed out after {}s. Please try again.",
            limit.as_secs()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_message_rounds_up() {
        let message = outcome_message(
            &AnalyzeOutcome::OnCooldown(Duration::from_millis(41_200)),
            AnalyzeMode::Group,
        );
        assert_eq!(message, "⏳ Analysis on cooldown. Try again in 42 seconds.");
    }

    #[test]
    fn test_busy_message_same_in_both_modes() {
        assert_eq!(
            outcome_message(&AnalyzeOutcome::Busy, AnalyzeMode::Group),
            outcome_message(&AnalyzeOutcome::Busy, AnalyzeMode::SingleUser)
        );
    }

    #[test]
    fn test_missing_session_points_to_right_command() {
        let outcome = AnalyzeOutcome::NoSessionFound("7".to_string());
        assert!(outcome_message(&outcome, AnalyzeMode::Group).contains("/setup"));
        assert!(outcome_message(&outcome, AnalyzeMode::SingleUser).contains("/register"));
    }

    #[test]
    fn test_timeout_message() {
        let outcome = AnalyzeOutcome::TimedOut(Duration::from_secs(300));
        assert_eq!(
            outcome_message(&outcome, AnalyzeMode::SingleUser),
            "❌ Analysis timed out after 300s. Please try again."
        );
    }

    #[test]
    fn test_whole_seconds() {
        assert_eq!(whole_seconds(Duration::ZERO), 0);
        assert_eq!(whole_seconds(Duration::from_secs(60)), 60);
        assert_eq!(whole_seconds(Duration::from_millis(1)), 1);
    }
}
