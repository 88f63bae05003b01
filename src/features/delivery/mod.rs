//! # Feature: Delivery
//!
//! Posts debate output to Discord as the persona that produced it. Each persona
//! has its own bot identity, and channels are resolved through that identity's
//! connection. Delivery failures are logged and never reach the engine.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Chunk long posts at 1900 bytes, keeping order
//! - 1.0.0: Two-identity channel posting

use async_trait::async_trait;
use log::{debug, error, warn};
use serenity::http::Http;
use serenity::model::channel::Channel;
use serenity::model::id::ChannelId;
use std::sync::Arc;

use crate::core::chunk_for_message;
use crate::features::debate::{DebateLine, DebateSink};
use crate::features::personas::Persona;

/// Posting side of the transport, keyed by persona identity
#[async_trait]
pub trait MessagePoster: Send + Sync {
    /// Post `text` into `channel_id` as `persona`; failures are swallowed
    async fn post(&self, persona: Persona, channel_id: &str, text: &str);
}

/// Both Discord identities' HTTP handles
#[derive(Clone)]
pub struct DeliveryAdapter {
    optimist: Arc<Http>,
    pessimist: Arc<Http>,
}

impl DeliveryAdapter {
    pub fn new(optimist: Arc<Http>, pessimist: Arc<Http>) -> Self {
        Self {
            optimist,
            pessimist,
        }
    }

    fn http(&self, persona: Persona) -> &Http {
        match persona {
            Persona::Optimist => &self.optimist,
            Persona::Pessimist => &self.pessimist,
        }
    }

    /// Resolve a guild text channel the identity can see
    async fn resolve(&self, persona: Persona, channel_id: &str) -> Option<ChannelId> {
        let id = match channel_id.parse::<u64>() {
            Ok(id) => id,
            Err(_) => {
                warn!("{persona} cannot post: '{channel_id}' is not a channel id");
                return None;
            }
        };

        match self.http(persona).get_channel(id).await {
            Ok(Channel::Guild(channel)) => Some(channel.id),
            Ok(_) => {
                warn!("{persona} cannot post: channel {id} is not a guild channel");
                None
            }
            Err(e) => {
                warn!("{persona} could not resolve channel {id}: {e}");
                None
            }
        }
    }
}

#[async_trait]
impl MessagePoster for DeliveryAdapter {
    async fn post(&self, persona: Persona, channel_id: &str, text: &str) {
        let Some(channel) = self.resolve(persona, channel_id).await else {
            return;
        };

        let http = self.http(persona);
        for chunk in chunk_for_message(text) {
            if chunk.trim().is_empty() {
                continue;
            }
            if let Err(e) = channel.say(http, &chunk).await {
                error!("{persona} failed to post to channel {channel}: {e}");
                return;
            }
        }
        debug!("{persona} posted {} bytes to channel {channel}", text.len());
    }
}

/// Renders a debate run into one channel, each line under its speaker's identity
pub struct ChannelSink<'a> {
    poster: &'a dyn MessagePoster,
    channel_id: String,
}

impl<'a> ChannelSink<'a> {
    pub fn new(poster: &'a dyn MessagePoster, channel_id: impl Into<String>) -> Self {
        Self {
            poster,
            channel_id: channel_id.into(),
        }
    }

    pub fn channel_id(&self) -> &str {
        &self.channel_id
    }
}

#[async_trait]
impl DebateSink for ChannelSink<'_> {
    async fn line(&self, line: &DebateLine) {
        self.poster
            .post(line.speaker, &self.channel_id, &format_line(line))
            .await;
    }

    async fn notice(&self, persona: Persona, text: &str) {
        self.poster.post(persona, &self.channel_id, text).await;
    }

    async fn advice(&self, persona: Persona, text: &str) {
        self.poster
            .post(persona, &self.channel_id, &format_advice(text))
            .await;
    }
}

pub fn format_line(line: &DebateLine) -> String {
    format!("```{}```", line.text)
}

/// Bold every non-empty line so markdown survives chunk boundaries
pub fn format_advice(text: &str) -> String {
    text.lines()
        .map(|l| {
            let l = l.trim_end();
            if l.is_empty() {
                String::new()
            } else {
                format!("**{l}**")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
