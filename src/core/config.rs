//! Environment-driven configuration
//!
//! - **Version**: 1.2.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.2.0: Zero counts for word budget, token limit and advice items fall back to defaults
//! - 1.1.0: Debate tuning knobs (turns, timeouts, word budget, prompt style)
//! - 1.0.0: Two bot tokens and Backboard credentials

use anyhow::{anyhow, Result};
use log::warn;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::features::debate::EngineSettings;
use crate::features::prompts::{DebateRules, PromptStyle};

pub const DEFAULT_BACKBOARD_BASE_URL: &str = "https://app.backboard.io/api";
pub const DEFAULT_BACKBOARD_MODEL: &str = "gpt-4o";
pub const DEFAULT_BACKBOARD_PROVIDER: &str = "openai";

#[derive(Debug, Clone)]
pub struct Config {
    pub optimist_discord_token: String,
    pub pessimist_discord_token: String,
    pub discord_guild_id: Option<String>,
    pub backboard_api_key: String,
    pub backboard_base_url: String,
    pub backboard_model: String,
    pub backboard_llm_provider: String,
    /// Fallback assistant ids for /setup and /register when none are given
    pub optimist_assistant_id: Option<String>,
    pub pessimist_assistant_id: Option<String>,
    pub log_level: String,
    pub debate_turns: usize,
    pub turn_timeout_secs: u64,
    pub analysis_timeout_secs: u64,
    pub cooldown_secs: u64,
    pub max_words: usize,
    pub token_limit: usize,
    pub advice_items: usize,
    pub prompt_style: PromptStyle,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            optimist_discord_token: required("OPTIMIST_DISCORD_TOKEN")?,
            pessimist_discord_token: required("PESSIMIST_DISCORD_TOKEN")?,
            discord_guild_id: optional("DISCORD_GUILD_ID"),
            backboard_api_key: required("BACKBOARD_API_KEY")?,
            backboard_base_url: optional("BACKBOARD_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BACKBOARD_BASE_URL.to_string()),
            backboard_model: optional("BACKBOARD_MODEL")
                .unwrap_or_else(|| DEFAULT_BACKBOARD_MODEL.to_string()),
            backboard_llm_provider: optional("BACKBOARD_LLM_PROVIDER")
                .unwrap_or_else(|| DEFAULT_BACKBOARD_PROVIDER.to_string()),
            optimist_assistant_id: optional("OPTIMIST_ASSISTANT_ID"),
            pessimist_assistant_id: optional("PESSIMIST_ASSISTANT_ID"),
            log_level: optional("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            debate_turns: parsed_or("DEBATE_TURNS", 6),
            turn_timeout_secs: parsed_or("TURN_TIMEOUT_SECONDS", 30),
            analysis_timeout_secs: parsed_or("ANALYSIS_TIMEOUT_SECONDS", 300),
            cooldown_secs: parsed_or("ANALYZE_COOLDOWN_SECONDS", 60),
            max_words: positive_or("DEBATE_MAX_WORDS", 18),
            token_limit: positive_or("DEBATE_TOKEN_LIMIT", 20),
            advice_items: positive_or("ADVICE_ITEMS", 3),
            prompt_style: parsed_or("PROMPT_STYLE", PromptStyle::Strict),
        })
    }

    pub fn debate_rules(&self) -> DebateRules {
        DebateRules {
            max_words: self.max_words,
            token_limit: self.token_limit,
            advice_items: self.advice_items,
            ..DebateRules::default()
        }
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            turns: self.debate_turns,
            turn_timeout: Duration::from_secs(self.turn_timeout_secs),
            analysis_timeout: Duration::from_secs(self.analysis_timeout_secs),
        }
    }

    pub fn cooldown_window(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}

fn required(key: &str) -> Result<String> {
    optional(key).ok_or_else(|| anyhow!("{key} must be set in the environment or .env"))
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_or<T: FromStr>(key: &str, default: T) -> T {
    match optional(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring malformed {key}={raw:?}, using default");
            default
        }),
        None => default,
    }
}

/// Like [`parsed_or`], but zero counts as malformed
fn positive_or(key: &str, default: usize) -> usize {
    match parsed_or(key, default) {
        0 => {
            warn!("Ignoring {key}=0, must be at least 1; using {default}");
            default
        }
        value => value,
    }
}
