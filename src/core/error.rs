//! Error taxonomy shared by the debate core
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Whole-run deadline error
//! - 1.0.0: Typed provider, setup and per-turn failures

use std::time::Duration;
use thiserror::Error;

/// Failure modes of the conversation-thread collaborator
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request exceeded timeout of {}s", .0.as_secs_f32())]
    Timeout(Duration),
    #[error("Backboard API error {status}: {body}")]
    Api { status: u16, body: String },
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ProviderError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProviderError::Timeout(_))
    }
}

/// Failures surfaced by setup operations
#[derive(Debug, Error)]
pub enum SetupError {
    /// A topology identifier was empty
    #[error("invalid topology: {0} must not be empty")]
    InvalidTopology(&'static str),
    /// Thread creation failed; never retried by the registry
    #[error("thread creation failed: {0}")]
    Provider(#[from] ProviderError),
}

/// Why a single turn or advice call did not yield model output
///
/// Always converted into placeholder content, never propagated out of a run.
#[derive(Debug, Error)]
pub enum TurnFailure {
    #[error("turn timed out")]
    Timeout,
    #[error(transparent)]
    Provider(ProviderError),
}

impl From<ProviderError> for TurnFailure {
    fn from(err: ProviderError) -> Self {
        if err.is_timeout() {
            TurnFailure::Timeout
        } else {
            TurnFailure::Provider(err)
        }
    }
}

/// A debate run hit its global deadline; partial output is discarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("debate exceeded the analysis timeout of {}s", .0.as_secs())]
pub struct DebateTimedOut(pub Duration);
