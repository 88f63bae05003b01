//! # Core Module
//!
//! Core configuration, error taxonomy, and Discord chunking helpers.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Add typed error module
//! - 1.0.0: Initial creation with config and response modules

pub mod config;
pub mod error;
pub mod response;

// Re-export commonly used items
pub use config::Config;
pub use error::{DebateTimedOut, ProviderError, SetupError, TurnFailure};
pub use response::{chunk_for_message, chunk_text, truncate_for_message, CHUNK_LIMIT, MESSAGE_LIMIT};
