//! # Feature: Debate Prompts
//!
//! Pure template functions producing the text sent to each persona's thread.
//! Two tone variants share one contract: one line per turn with the persona's
//! prefix, a word budget, and a fixed-size numbered advice block.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Casual tone variant and configurable advice item count
//! - 1.0.0: Setup, turn, advice and context templates

use std::fmt;
use std::str::FromStr;

use crate::features::buffer::BufferedMessage;
use crate::features::personas::Persona;

/// Sentinel history used before the first accepted line
pub const NO_DEBATE_YET: &str = "No debate yet.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptStyle {
    /// PG, respectful framing
    #[default]
    Strict,
    /// Informal, banter-friendly framing
    Casual,
}

impl FromStr for PromptStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(PromptStyle::Strict),
            "casual" => Ok(PromptStyle::Casual),
            other => Err(format!("unknown prompt style '{other}'")),
        }
    }
}

impl fmt::Display for PromptStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromptStyle::Strict => f.write_str("strict"),
            PromptStyle::Casual => f.write_str("casual"),
        }
    }
}

/// Output-format contract shared by prompts and the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebateRules {
    /// Payload words requested per line
    pub max_words: usize,
    /// Whitespace tokens kept per line, prefix included
    pub token_limit: usize,
    /// Numbered items requested in each advice block
    pub advice_items: usize,
    /// Most recent subject messages included in the seed
    pub context_limit: usize,
}

impl Default for DebateRules {
    fn default() -> Self {
        DebateRules {
            max_words: 18,
            token_limit: 20,
            advice_items: 3,
            context_limit: 25,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PromptSet {
    pub style: PromptStyle,
    pub rules: DebateRules,
}

impl PromptSet {
    pub fn new(style: PromptStyle, rules: DebateRules) -> Self {
        Self { style, rules }
    }

    /// One-time role framing appended to a persona's thread before turns begin
    pub fn setup_prompt(&self, persona: Persona, username: &str) -> String {
        let (focus, verb) = match persona {
            Persona::Optimist => (
                "Find positive patterns, growth opportunities, and strengths",
                "counter constructively",
            ),
            Persona::Pessimist => (
                "Identify risks, red flags, and areas for improvement",
                "challenge constructively",
            ),
        };
        let label = persona.label();
        let opponent = persona.opponent().label();
        let prefix = persona.prefix();
        let max_words = self.rules.max_words;

        match self.style {
            PromptStyle::Strict => format!(
                "You are the {label} in a debate about {username}'s Discord messages.\n\n\
                Your role:\n\
                - {focus}\n\
                - Respond in EXACTLY one line starting with \"{prefix}\"\n\
                - Maximum {max_words} words per response\n\
                - Keep it PG and respectful\n\
                - No sexual content or manipulation\n\n\
                You will alternate turns with the {opponent}. Read their points and {verb}."
            ),
            PromptStyle::Casual => format!(
                "You're the {label}, roasting-and-toasting {username}'s Discord messages with the {opponent}.\n\n\
                Ground rules:\n\
                - {focus}\n\
                - ONE line only, starting with \"{prefix}\"\n\
                - {max_words} words max, punchy and meme-friendly\n\
                - Tease the vibe, never the person; nothing hateful or explicit\n\n\
                Trade turns with the {opponent}. Clap back at their last point."
            ),
        }
    }

    /// Numbered transcript of the subject's most recent messages
    pub fn subject_context(&self, messages: &[BufferedMessage], username: &str) -> String {
        if messages.is_empty() {
            return format!("{username} has no recent messages to analyze.");
        }

        let skip = messages.len().saturating_sub(self.rules.context_limit);
        let mut formatted = format!("Recent messages from {username}:\n");
        for (i, msg) in messages[skip..].iter().enumerate() {
            formatted.push_str(&format!("{}. {}\n", i + 1, msg.content));
        }
        formatted
    }

    pub fn turn_prompt(&self, persona: Persona, turn: usize, history: &str) -> String {
        let prefix = persona.prefix();
        let max_words = self.rules.max_words;
        let closing = match self.style {
            PromptStyle::Strict => "Be direct and specific. Reference the user's actual messages.",
            PromptStyle::Casual => "Keep it spicy but fair. Quote the user's actual messages.",
        };

        format!(
            "Turn {turn}.\n\n\
            Previous debate:\n\
            {history}\n\n\
            Respond with EXACTLY one line:\n\
            {prefix} [your point in maximum {max_words} words]\n\n\
            {closing}"
        )
    }

    pub fn advice_prompt(&self, persona: Persona, history: &str) -> String {
        let label = persona.label();
        let items = self.rules.advice_items;
        let slots: String = (1..=items)
            .map(|n| format!("{n}) [{} piece of advice]\n", ordinal(n)))
            .collect();
        let closing = match self.style {
            PromptStyle::Strict => {
                "Each piece should be specific, actionable, and based on the debate. Keep it PG and respectful."
            }
            PromptStyle::Casual => {
                "Each piece should be specific and actionable, funny is fine, mean is not."
            }
        };
        let noun = if items == 1 { "piece" } else { "pieces" };

        format!(
            "The debate is complete:\n\n\
            {history}\n\n\
            Now provide exactly {items} {noun} of advice in this format:\n\n\
            {label} Advice:\n\
            {slots}\n\
            {closing}"
        )
    }

    /// Block used when a persona's advice call fails
    pub fn fallback_advice(&self, persona: Persona) -> String {
        const FILLER: [&str; 3] = ["Unable to generate", "Please try again", "Error occurred"];
        let mut block = format!("{} Advice:", persona.label());
        for n in 1..=self.rules.advice_items.max(1) {
            block.push_str(&format!("\n{n}) {}", FILLER[(n - 1) % FILLER.len()]));
        }
        block
    }
}

fn ordinal(n: usize) -> String {
    match n {
        1 => "first".to_string(),
        2 => "second".to_string(),
        3 => "third".to_string(),
        4 => "fourth".to_string(),
        5 => "fifth".to_string(),
        _ => format!("#{n}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn messages(n: usize) -> Vec<BufferedMessage> {
        (1..=n)
            .map(|i| BufferedMessage::new(format!("msg {i}"), "alice", "1", Utc::now()))
            .collect()
    }

    #[test]
    fn test_setup_prompt_mentions_prefix_and_budget() {
        let prompts = PromptSet::default();
        let prompt = prompts.setup_prompt(Persona::Pessimist, "alice");
        assert!(prompt.contains("\"Pessimist:\""));
        assert!(prompt.contains("Maximum 18 words"));
        assert!(prompt.contains("alternate turns with the Optimist"));
    }

    #[test]
    fn test_casual_style_changes_tone_not_contract() {
        let prompts = PromptSet::new(PromptStyle::Casual, DebateRules::default());
        let prompt = prompts.setup_prompt(Persona::Optimist, "bob");
        assert!(prompt.contains("ONE line only"));
        assert!(prompt.contains("\"Optimist:\""));
        assert!(prompt.contains("18 words max"));
    }

    #[test]
    fn test_subject_context_keeps_most_recent() {
        let prompts = PromptSet::default();
        let context = prompts.subject_context(&messages(30), "alice");
        assert!(context.starts_with("Recent messages from alice:"));
        assert!(context.contains("1. msg 6\n"));
        assert!(context.contains("25. msg 30\n"));
        assert!(!context.contains("msg 5\n"));
    }

    #[test]
    fn test_subject_context_empty() {
        let prompts = PromptSet::default();
        assert_eq!(
            prompts.subject_context(&[], "alice"),
            "alice has no recent messages to analyze."
        );
    }

    #[test]
    fn test_turn_prompt_includes_history() {
        let prompts = PromptSet::default();
        let prompt = prompts.turn_prompt(Persona::Optimist, 0, NO_DEBATE_YET);
        assert!(prompt.starts_with("Turn 0."));
        assert!(prompt.contains("No debate yet."));
        assert!(prompt.contains("Optimist: [your point in maximum 18 words]"));
    }

    #[test]
    fn test_advice_prompt_item_count_configurable() {
        let rules = DebateRules {
            advice_items: 1,
            ..DebateRules::default()
        };
        let prompts = PromptSet::new(PromptStyle::Strict, rules);
        let prompt = prompts.advice_prompt(Persona::Pessimist, "Pessimist: hmm");
        assert!(prompt.contains("exactly 1 piece of advice"));
        assert!(prompt.contains("Pessimist Advice:\n1) [first piece of advice]\n"));
        assert!(!prompt.contains("2) ["));
    }

    #[test]
    fn test_fallback_advice_block() {
        let prompts = PromptSet::default();
        assert_eq!(
            prompts.fallback_advice(Persona::Optimist),
            "Optimist Advice:\n1) Unable to generate\n2) Please try again\n3) Error occurred"
        );
    }

    #[test]
    fn test_prompt_style_parse() {
        assert_eq!("Casual".parse::<PromptStyle>(), Ok(PromptStyle::Casual));
        assert!("loud".parse::<PromptStyle>().is_err());
    }
}
