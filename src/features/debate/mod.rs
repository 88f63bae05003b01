//! # Feature: Debate
//!
//! Runs a fixed-length optimist/pessimist debate over a user's recent
//! messages on two long-lived conversation threads, then collects one advice
//! block from each persona.
//!
//! - **Version**: 2.0.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Turn alternation engine with per-turn and global deadlines
//! - 1.1.0: Placeholder lines for failed turns
//! - 1.0.0: Initial implementation

pub mod line;
pub mod orchestrator;

pub use line::{extract_line, finalize, truncate_tokens, DebateLine, Placeholder};
pub use orchestrator::{
    DebateEngine, DebatePhase, DebateResult, DebateSink, DebateSubject, EngineSettings,
};
