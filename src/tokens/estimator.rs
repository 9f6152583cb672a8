//! Character- and script-aware token estimation.
//!
//! The estimator never calls a remote service and never fails. It divides the
//! character count by a chars-per-token ratio chosen from the model's encoding
//! tag, blends that ratio toward 2.0 for CJK-heavy text, and adds small
//! corrections for punctuation, digit runs and whitespace runs.

use super::result::{saturating_total, CountingMethod, TokenCountResult};
use super::stats::TextStats;
use crate::catalog::Model;
use once_cell::sync::Lazy;
use regex::Regex;

/// Ratio used for unknown or absent encoding tags.
pub const DEFAULT_CHARS_PER_TOKEN: f64 = 4.0;

/// Chars-per-token assumed for Hiragana, Katakana and CJK ideographs.
pub const CJK_CHARS_PER_TOKEN: f64 = 2.0;

/// Extra input tokens charged per declared function call.
pub const FUNCTION_CALL_OVERHEAD: u64 = 50;

const PUNCTUATION_WEIGHT: f64 = 0.1;
const DIGIT_RUN_WEIGHT: f64 = 0.2;
const WHITESPACE_RUN_WEIGHT: f64 = 0.1;

static PUNCTUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[.,;:!?\-'"(){}\[\]]"#).unwrap());
static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Chars-per-token ratio for a known encoding tag.
pub fn encoding_ratio(encoding: Option<&str>) -> f64 {
    match encoding {
        Some("cl100k_base") => 3.5,
        Some("o200k_base") => 3.8,
        Some("p50k_base") | Some("r50k_base") | Some("gpt2") => 4.0,
        _ => DEFAULT_CHARS_PER_TOKEN,
    }
}

fn is_cjk(c: char) -> bool {
    matches!(c, '\u{3040}'..='\u{309F}' | '\u{30A0}'..='\u{30FF}' | '\u{4E00}'..='\u{9FAF}')
}

/// Share of characters in the Hiragana, Katakana or CJK ideograph ranges.
pub fn cjk_fraction(text: &str) -> f64 {
    let mut total = 0usize;
    let mut cjk = 0usize;
    for c in text.chars() {
        total += 1;
        if is_cjk(c) {
            cjk += 1;
        }
    }
    if total == 0 {
        0.0
    } else {
        cjk as f64 / total as f64
    }
}

pub fn adjusted_ratio(base_ratio: f64, text: &str) -> f64 {
    let f = cjk_fraction(text);
    base_ratio * (1.0 - f) + CJK_CHARS_PER_TOKEN * f
}

/// Extra callers may add to an estimate (system prompt, tool declarations).
#[derive(Debug, Clone, Default)]
pub struct EstimateOverhead<'a> {
    pub system_prompt: Option<&'a str>,
    pub function_calls: u64,
}

/// Stateless heuristic estimator; safe to share across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicEstimator;

impl HeuristicEstimator {
    pub fn new() -> Self {
        Self
    }

    /// Estimated input tokens for `text` under an encoding tag.
    pub fn input_tokens(&self, text: &str, encoding: Option<&str>) -> u64 {
        let characters = text.chars().count();
        if characters == 0 {
            return 0;
        }
        let ratio = adjusted_ratio(encoding_ratio(encoding), text);
        let bonus = PUNCTUATION.find_iter(text).count() as f64 * PUNCTUATION_WEIGHT
            + DIGIT_RUN.find_iter(text).count() as f64 * DIGIT_RUN_WEIGHT
            + WHITESPACE_RUN.find_iter(text).count() as f64 * WHITESPACE_RUN_WEIGHT;
        (characters as f64 / ratio + bonus).ceil() as u64
    }

    pub fn estimate(
        &self,
        text: &str,
        model: &Model,
        output_override: Option<u64>,
    ) -> TokenCountResult {
        let input = self.input_tokens(text, model.encoding.as_deref());
        TokenCountResult::assemble(
            input,
            TextStats::of(text),
            model,
            output_override,
            CountingMethod::Estimated,
        )
    }

    /// Estimate without a catalog model; no thinking tokens are assumed.
    pub fn estimate_by_encoding(
        &self,
        text: &str,
        encoding: &str,
        output_override: Option<u64>,
    ) -> TokenCountResult {
        let input = self.input_tokens(text, Some(encoding));
        let (output_tokens, is_output_estimated) = match output_override {
            Some(n) => (n, false),
            None => (
                (input as f64 * super::result::OUTPUT_TO_INPUT_RATIO).round() as u64,
                true,
            ),
        };
        let stats = TextStats::of(text);
        TokenCountResult {
            input_tokens: input,
            output_tokens,
            thinking_tokens: 0,
            total_tokens: saturating_total(input, output_tokens, 0),
            character_count: stats.character_count,
            character_count_no_space: stats.character_count_no_space,
            word_count: stats.word_count,
            line_count: stats.line_count,
            is_output_estimated,
            method: CountingMethod::Estimated,
        }
    }

    /// Estimate including a system prompt and per-function-call overhead.
    /// Output and thinking figures stay derived from the text alone.
    pub fn estimate_with_overhead(
        &self,
        text: &str,
        model: &Model,
        output_override: Option<u64>,
        overhead: &EstimateOverhead<'_>,
    ) -> TokenCountResult {
        let mut result = self.estimate(text, model, output_override);
        if let Some(prompt) = overhead.system_prompt {
            result.input_tokens = result
                .input_tokens
                .saturating_add(self.input_tokens(prompt, model.encoding.as_deref()));
        }
        if overhead.function_calls > 0 && model.features.supports_function_calling {
            result.input_tokens = result
                .input_tokens
                .saturating_add(overhead.function_calls.saturating_mul(FUNCTION_CALL_OVERHEAD));
        }
        result.recompute_total();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn model(id: &str) -> &'static Model {
        Catalog::builtin().find_model(id).unwrap()
    }

    #[test]
    fn test_encoding_ratios() {
        assert_eq!(encoding_ratio(Some("cl100k_base")), 3.5);
        assert_eq!(encoding_ratio(Some("o200k_base")), 3.8);
        assert_eq!(encoding_ratio(Some("r50k_base")), 4.0);
        assert_eq!(encoding_ratio(Some("mystery")), 4.0);
        assert_eq!(encoding_ratio(None), 4.0);
    }

    #[test]
    fn test_ascii_thousand_chars_at_ratio_four() {
        let text = "a".repeat(1000);
        assert_eq!(HeuristicEstimator::new().input_tokens(&text, None), 250);
    }

    #[test]
    fn test_cjk_thousand_chars_use_ratio_two() {
        let text = "漢".repeat(1000);
        assert_eq!(cjk_fraction(&text), 1.0);
        assert_eq!(adjusted_ratio(3.8, &text), 2.0);
        assert_eq!(HeuristicEstimator::new().input_tokens(&text, Some("o200k_base")), 500);
    }

    #[test]
    fn test_mixed_script_blends_ratio() {
        let text = "ひらがなabcd";
        assert_eq!(cjk_fraction(text), 0.5);
        assert!((adjusted_ratio(4.0, text) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_bonus_terms() {
        // 12 chars / 4.0 = 3.0; 1 punctuation (0.1), 2 digit runs (0.4),
        // 3 whitespace runs (0.3) -> 3.8 -> 4
        let text = "ab 12  cd 3.";
        assert_eq!(HeuristicEstimator::new().input_tokens(text, None), 4);
    }

    #[test]
    fn test_empty_text_is_zero() {
        let r = HeuristicEstimator::new().estimate("", model("gpt-4o"), None);
        assert_eq!(r.input_tokens, 0);
        assert_eq!(r.output_tokens, 0);
        assert_eq!(r.total_tokens, 0);
        assert_eq!(r.method, CountingMethod::Estimated);
    }

    #[test]
    fn test_estimate_uses_model_encoding() {
        let text = "x".repeat(350);
        let r = HeuristicEstimator::new().estimate(&text, model("gpt-4.1"), None);
        assert_eq!(r.input_tokens, 100);
        assert_eq!(r.output_tokens, 50);
        assert!(r.is_output_estimated);
        assert_eq!(r.thinking_tokens, 0);
        assert_eq!(r.character_count, 350);
    }

    #[test]
    fn test_gemini_models_fall_back_to_default_ratio() {
        let text = "y".repeat(400);
        let r = HeuristicEstimator::new().estimate(&text, model("gemini-2.5-flash"), Some(7));
        assert_eq!(r.input_tokens, 100);
        assert_eq!(r.output_tokens, 7);
        assert!(!r.is_output_estimated);
        assert_eq!(r.thinking_tokens, 5);
        assert_eq!(r.total_tokens, 112);
    }

    #[test]
    fn test_estimate_by_encoding() {
        let text = "z".repeat(350);
        let r = HeuristicEstimator::new().estimate_by_encoding(&text, "cl100k_base", None);
        assert_eq!(r.input_tokens, 100);
        assert_eq!(r.output_tokens, 50);
        assert_eq!(r.thinking_tokens, 0);
        assert_eq!(r.total_tokens, 150);
    }

    #[test]
    fn test_overhead_adds_system_prompt_and_function_calls() {
        let estimator = HeuristicEstimator::new();
        let text = "x".repeat(350);
        let prompt = "p".repeat(35);
        let overhead = EstimateOverhead {
            system_prompt: Some(&prompt),
            function_calls: 2,
        };
        let r = estimator.estimate_with_overhead(&text, model("gpt-4.1"), None, &overhead);
        assert_eq!(r.input_tokens, 100 + 10 + 100);
        assert_eq!(r.output_tokens, 50);
        assert_eq!(r.total_tokens, 260);

        // Embedding models declare no function calling.
        let r = estimator.estimate_with_overhead(
            &text,
            model("text-embedding-3-small"),
            None,
            &EstimateOverhead {
                system_prompt: None,
                function_calls: 3,
            },
        );
        assert_eq!(r.input_tokens, 100);
    }

    #[test]
    fn test_large_overrides_and_overhead_saturate() {
        let estimator = HeuristicEstimator::new();
        let text = "x".repeat(350);

        let r = estimator.estimate_by_encoding(&text, "cl100k_base", Some(u64::MAX));
        assert_eq!(r.input_tokens, 100);
        assert_eq!(r.output_tokens, u64::MAX);
        assert_eq!(r.total_tokens, u64::MAX);

        let r = estimator.estimate_with_overhead(
            &text,
            model("gpt-4.1"),
            Some(u64::MAX - 10),
            &EstimateOverhead {
                system_prompt: None,
                function_calls: u64::MAX / 2,
            },
        );
        assert_eq!(r.input_tokens, u64::MAX);
        assert_eq!(r.output_tokens, u64::MAX - 10);
        assert_eq!(r.total_tokens, u64::MAX);
    }
}
