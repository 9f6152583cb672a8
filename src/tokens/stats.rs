//! Plain text statistics reported alongside every token count.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStats {
    /// Unicode scalar values.
    pub character_count: u64,
    pub character_count_no_space: u64,
    /// Whitespace-delimited words, empty segments dropped.
    pub word_count: u64,
    /// Segments split on `\n`, including a trailing empty one.
    pub line_count: u64,
}

impl TextStats {
    pub fn of(text: &str) -> Self {
        let mut character_count = 0u64;
        let mut whitespace = 0u64;
        for c in text.chars() {
            character_count += 1;
            if c.is_whitespace() {
                whitespace += 1;
            }
        }
        Self {
            character_count,
            character_count_no_space: character_count - whitespace,
            word_count: text.split_whitespace().count() as u64,
            line_count: text.split('\n').count() as u64,
        }
    }
}
