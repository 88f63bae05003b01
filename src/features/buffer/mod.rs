//! # Feature: Message Buffer
//!
//! Bounded per-(guild, channel) FIFO of recently observed chat messages, the raw
//! material a debate analyzes. Backed by DashMap so both gateway connections can
//! push without extra locking.
//!
//! - **Version**: 1.2.0
//! - **Since**: 1.0.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.2.0: Guild-wide author reads for single-user analysis
//! - 1.1.0: Author filtering for per-player analysis
//! - 1.0.0: Initial release with 25-message ring buffers

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::collections::VecDeque;

pub const DEFAULT_CAPACITY: usize = 25;

/// Composite key: (guild_id, channel_id)
type BufferKey = (String, String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferedMessage {
    pub content: String,
    pub author_name: String,
    pub author_id: String,
    pub timestamp: DateTime<Utc>,
}

impl BufferedMessage {
    pub fn new(
        content: impl Into<String>,
        author_name: impl Into<String>,
        author_id: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            content: content.into(),
            author_name: author_name.into(),
            author_id: author_id.into(),
            timestamp,
        }
    }
}

#[derive(Debug)]
pub struct MessageBuffer {
    buffers: DashMap<BufferKey, VecDeque<BufferedMessage>>,
    capacity: usize,
}

impl MessageBuffer {
    pub fn new(capacity: usize) -> Self {
        MessageBuffer {
            buffers: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    fn make_key(scope: &str, channel: &str) -> BufferKey {
        (scope.to_string(), channel.to_string())
    }

    /// Append a message, evicting the oldest entry once at capacity
    pub fn push(&self, scope: &str, channel: &str, message: BufferedMessage) {
        let mut entry = self
            .buffers
            .entry(Self::make_key(scope, channel))
            .or_insert_with(|| VecDeque::with_capacity(self.capacity));

        if entry.len() >= self.capacity {
            entry.pop_front();
        }
        entry.push_back(message);
    }

    /// All buffered messages, oldest first
    pub fn read_all(&self, scope: &str, channel: &str) -> Vec<BufferedMessage> {
        self.buffers
            .get(&Self::make_key(scope, channel))
            .map(|entry| entry.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Messages from one author, preserving buffer order
    pub fn read_by_author(&self, scope: &str, channel: &str, author_id: &str) -> Vec<BufferedMessage> {
        self.buffers
            .get(&Self::make_key(scope, channel))
            .map(|entry| {
                entry
                    .iter()
                    .filter(|m| m.author_id == author_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Messages from one author across every channel of a guild
    ///
    /// Merged oldest first by timestamp and capped at the newest `capacity` entries.
    pub fn read_by_author_in_scope(&self, scope: &str, author_id: &str) -> Vec<BufferedMessage> {
        let mut messages: Vec<BufferedMessage> = self
            .buffers
            .iter()
            .filter(|entry| entry.key().0 == scope)
            .flat_map(|entry| {
                entry
                    .value()
                    .iter()
                    .filter(|m| m.author_id == author_id)
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .collect();

        messages.sort_by_key(|m| m.timestamp);
        let overflow = messages.len().saturating_sub(self.capacity);
        messages.drain(..overflow);
        messages
    }

    pub fn len(&self, scope: &str, channel: &str) -> usize {
        self.buffers
            .get(&Self::make_key(scope, channel))
            .map(|entry| entry.len())
            .unwrap_or(0)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for MessageBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(n: usize, author: &str) -> BufferedMessage {
        BufferedMessage::new(format!("message {n}"), author, author, Utc::now())
    }

    #[test]
    fn test_overflow_evicts_oldest() {
        let buffer = MessageBuffer::default();
        for n in 1..=26 {
            buffer.push("guild", "general", msg(n, "alice"));
        }

        let contents: Vec<String> = buffer
            .read_all("guild", "general")
            .into_iter()
            .map(|m| m.content)
            .collect();
        let expected: Vec<String> = (2..=26).map(|n| format!("message {n}")).collect();
        assert_eq!(contents, expected);
    }

    #[test]
    fn test_read_by_author_preserves_order() {
        let buffer = MessageBuffer::new(10);
        buffer.push("guild", "general", msg(1, "alice"));
        buffer.push("guild", "general", msg(2, "bob"));
        buffer.push("guild", "general", msg(3, "alice"));
        buffer.push("guild", "general", msg(4, "bob"));

        let alice: Vec<String> = buffer
            .read_by_author("guild", "general", "alice")
            .into_iter()
            .map(|m| m.content)
            .collect();
        assert_eq!(alice, vec!["message 1", "message 3"]);
    }

    #[test]
    fn test_read_by_author_in_scope_merges_channels_by_time() {
        let buffer = MessageBuffer::new(3);
        let at = |secs: i64| DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap();
        let post = |channel: &str, content: &str, author: &str, secs: i64| {
            buffer.push("guild", channel, BufferedMessage::new(content, author, author, at(secs)));
        };

        post("general", "first", "alice", 1);
        post("random", "second", "alice", 2);
        post("general", "from bob", "bob", 3);
        post("random", "third", "alice", 4);
        post("general", "fourth", "alice", 5);
        buffer.push("other", "general", BufferedMessage::new("elsewhere", "alice", "alice", at(6)));

        let contents: Vec<String> = buffer
            .read_by_author_in_scope("guild", "alice")
            .into_iter()
            .map(|m| m.content)
            .collect();
        assert_eq!(contents, vec!["second", "third", "fourth"]);
        assert!(buffer.read_by_author_in_scope("guild", "carol").is_empty());
    }

    #[test]
    fn test_channels_are_independent() {
        let buffer = MessageBuffer::new(2);
        buffer.push("guild", "a", msg(1, "alice"));
        buffer.push("guild", "b", msg(2, "alice"));
        buffer.push("other", "a", msg(3, "alice"));

        assert_eq!(buffer.len("guild", "a"), 1);
        assert_eq!(buffer.len("guild", "b"), 1);
        assert_eq!(buffer.len("other", "a"), 1);
        assert!(buffer.read_all("guild", "missing").is_empty());
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let buffer = MessageBuffer::new(0);
        buffer.push("g", "c", msg(1, "alice"));
        buffer.push("g", "c", msg(2, "alice"));
        assert_eq!(buffer.capacity(), 1);
        assert_eq!(buffer.read_all("g", "c")[0].content, "message 2");
    }
}
