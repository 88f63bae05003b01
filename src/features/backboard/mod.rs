//! # Feature: Backboard Threads
//!
//! The conversation-thread collaborator. Every persona talks to its own
//! persistent, append-only Backboard thread; the debate core only ever creates
//! threads and appends messages, optionally asking for a completion.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Best-effort cancellation hook for abandoned turns
//! - 1.0.0: Initial ThreadProvider trait and reqwest client

pub mod client;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::core::ProviderError;

pub use client::BackboardClient;

/// Opaque handle to a Backboard conversation thread
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThreadId(String);

impl ThreadId {
    pub fn new(id: impl Into<String>) -> Self {
        ThreadId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Operations the debate core needs from the LLM-hosting service
#[async_trait]
pub trait ThreadProvider: Send + Sync {
    /// Create a new thread bound to an assistant
    async fn create_thread(&self, assistant_id: &str) -> Result<ThreadId, ProviderError>;

    /// Append `text` to a thread
    ///
    /// With `trigger_completion` false nothing is generated and the returned
    /// text is empty; this is used for seeding and opponent forwarding.
    async fn send(
        &self,
        thread: &ThreadId,
        text: &str,
        timeout: Duration,
        trigger_completion: bool,
    ) -> Result<String, ProviderError>;

    /// Abandon whatever is outstanding on `thread`
    async fn cancel(&self, _thread: &ThreadId) -> Result<(), ProviderError> {
        Ok(())
    }
}
