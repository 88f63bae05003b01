//! Debate line extraction and finalization
//!
//! Turns a raw completion (or the failure that replaced it) into exactly one
//! prefixed, length-bounded transcript line.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.0.0: Prefix scan, first-line fallback, placeholders and token budget

use serde::{Deserialize, Serialize};

use crate::core::TurnFailure;
use crate::features::personas::Persona;

pub const ELLIPSIS: &str = "...";

/// One accepted line of a debate run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebateLine {
    pub speaker: Persona,
    pub text: String,
    pub turn_index: usize,
}

/// Deterministic stand-ins for turns without usable output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    NoResponse,
    Timeout,
    Error,
}

impl Placeholder {
    pub fn line(self, persona: Persona) -> String {
        let tag = match self {
            Placeholder::NoResponse => "[No response]",
            Placeholder::Timeout => "[Timeout]",
            Placeholder::Error => "[Error]",
        };
        format!("{} {tag}", persona.prefix())
    }
}

/// Pick the line to keep from a raw completion
///
/// In order: the first line starting with the persona's prefix (case-sensitive),
/// else the first non-empty line with the prefix prepended, else the
/// `[No response]` placeholder.
pub fn extract_line(response: &str, persona: Persona) -> String {
    let prefix = persona.prefix();
    let mut lines = response.lines().map(str::trim);

    if let Some(line) = lines.clone().find(|line| line.starts_with(prefix)) {
        return line.to_string();
    }
    if let Some(line) = lines.find(|line| !line.is_empty()) {
        return format!("{prefix} {line}");
    }
    Placeholder::NoResponse.line(persona)
}

/// Keep at most `limit` whitespace tokens, marking the cut with an ellipsis
pub fn truncate_tokens(line: &str, limit: usize) -> String {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() <= limit {
        return line.to_string();
    }
    format!("{}{ELLIPSIS}", tokens[..limit].join(" "))
}

/// Fold a turn's outcome into its final transcript text
pub fn finalize(outcome: Result<String, TurnFailure>, persona: Persona, token_limit: usize) -> String {
    match outcome {
        Ok(response) => truncate_tokens(&extract_line(&response, persona), token_limit),
        Err(TurnFailure::Timeout) => Placeholder::Timeout.line(persona),
        Err(TurnFailure::Provider(_)) => Placeholder::Error.line(persona),
    }
}
