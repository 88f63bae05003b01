//! Response chunking for Discord message limits
//!
//! - **Version**: 2.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 2.0.0: Lossless line packing; oversized lines become their own chunk
//! - 1.0.0: Initial chunking utilities

/// Discord message content limit
pub const MESSAGE_LIMIT: usize = 2000;

/// Chunk size used for debate output, leaving headroom under `MESSAGE_LIMIT`
pub const CHUNK_LIMIT: usize = 1900;

/// Split text into ordered chunks of at most `max_length` bytes
///
/// Lines are packed greedily and keep their `\n` separators, so concatenating
/// the chunks reproduces `text` exactly. A single line longer than
/// `max_length` is emitted as its own oversized chunk and is not split.
pub fn chunk_text(text: &str, max_length: usize) -> Vec<String> {
    if text.len() <= max_length {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in text.split_inclusive('\n') {
        if !current.is_empty() && current.len() + line.len() > max_length {
            chunks.push(std::mem::take(&mut current));
        }
        current.push_str(line);
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Chunk text for debate delivery (1900 byte limit)
pub fn chunk_for_message(text: &str) -> Vec<String> {
    chunk_text(text, CHUNK_LIMIT)
}

/// Truncate text to fit the message limit, adding ellipsis if needed
pub fn truncate_for_message(text: &str) -> String {
    if text.len() <= MESSAGE_LIMIT {
        text.to_string()
    } else {
        let mut end = MESSAGE_LIMIT - 3;
        while !text.is_char_boundary(end) && end > 0 {
            end -= 1;
        }
        format!("{}...", &text[..end])
    }
}
