//! Token count result shared by the heuristic and exact counting paths.

use super::stats::TextStats;
use crate::catalog::Model;
use serde::{Deserialize, Serialize};

/// Estimated output tokens as a fraction of input tokens.
pub const OUTPUT_TO_INPUT_RATIO: f64 = 0.5;

/// Estimated thinking tokens as a fraction of input tokens. No provider
/// reports thinking tokens ahead of time, so both paths use this.
pub const THINKING_TO_INPUT_RATIO: f64 = 0.05;

/// Which path produced the input-token figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountingMethod {
    Exact,
    Estimated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCountResult {
    pub input_tokens: u64,
    pub output_tokens: u64,
    /// Zero for models without thinking capability.
    pub thinking_tokens: u64,
    pub total_tokens: u64,
    pub character_count: u64,
    pub character_count_no_space: u64,
    pub word_count: u64,
    pub line_count: u64,
    /// `false` when the output figure came from the caller.
    pub is_output_estimated: bool,
    pub method: CountingMethod,
}

impl TokenCountResult {
    /// Derive output, thinking and total from an input-token figure.
    pub(crate) fn assemble(
        input_tokens: u64,
        stats: TextStats,
        model: &Model,
        output_override: Option<u64>,
        method: CountingMethod,
    ) -> Self {
        let (output_tokens, is_output_estimated) = match output_override {
            Some(n) => (n, false),
            None => (proportion(input_tokens, OUTPUT_TO_INPUT_RATIO), true),
        };
        let thinking_tokens = if model.features.supports_thinking {
            proportion(input_tokens, THINKING_TO_INPUT_RATIO)
        } else {
            0
        };
        Self {
            input_tokens,
            output_tokens,
            thinking_tokens,
            total_tokens: saturating_total(input_tokens, output_tokens, thinking_tokens),
            character_count: stats.character_count,
            character_count_no_space: stats.character_count_no_space,
            word_count: stats.word_count,
            line_count: stats.line_count,
            is_output_estimated,
            method,
        }
    }

    pub fn stats(&self) -> TextStats {
        TextStats {
            character_count: self.character_count,
            character_count_no_space: self.character_count_no_space,
            word_count: self.word_count,
            line_count: self.line_count,
        }
    }

    pub(crate) fn recompute_total(&mut self) {
        self.total_tokens =
            saturating_total(self.input_tokens, self.output_tokens, self.thinking_tokens);
    }
}

/// Sum clamped at `u64::MAX`; overrides may be arbitrarily large.
pub(crate) fn saturating_total(input: u64, output: u64, thinking: u64) -> u64 {
    input.saturating_add(output).saturating_add(thinking)
}

fn proportion(tokens: u64, ratio: f64) -> u64 {
    (tokens as f64 * ratio).round() as u64
}
