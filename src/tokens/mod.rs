//! Token 计数模块：启发式估算与按提供商划分的计数策略。
//!
//! # Token Counting Module
//!
//! Token counts drive every cost estimate. Providers without a public
//! counting endpoint are estimated locally; providers with one can count
//! exactly when the caller supplies a credential (see [`crate::remote`]).
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`TokenCounter`] | Per-provider counting capability (estimate, optional exact) |
//! | [`HeuristicCounter`] | Estimation-only counter |
//! | [`HeuristicEstimator`] | Encoding- and script-aware character heuristic |
//! | [`TokenCountResult`] | Input/output/thinking tokens plus text statistics |
//! | [`TextStats`] | Character, word and line counts |
//!
//! ## Example
//!
//! ```rust
//! use ai_token_estimator::catalog::Catalog;
//! use ai_token_estimator::tokens::HeuristicEstimator;
//!
//! let model = Catalog::builtin().find_model("gpt-4o").unwrap();
//! let result = HeuristicEstimator::new().estimate("Hello, how are you?", model, None);
//! assert!(result.input_tokens > 0);
//! assert!(result.is_output_estimated);
//! ```
//!
//! ## Estimation Accuracy
//!
//! | Method | Accuracy | Speed | Use Case |
//! |--------|----------|-------|----------|
//! | Heuristic | ~85% | Fast | Previews, providers without a counting API |
//! | Exact (remote) | Exact input | One HTTP call | Budgeting with a credential |

mod counter;
mod estimator;
mod result;
mod stats;

pub use counter::{HeuristicCounter, TokenCounter};
pub use estimator::{
    adjusted_ratio, cjk_fraction, encoding_ratio, EstimateOverhead, HeuristicEstimator,
    CJK_CHARS_PER_TOKEN, DEFAULT_CHARS_PER_TOKEN, FUNCTION_CALL_OVERHEAD,
};
pub use result::{
    CountingMethod, TokenCountResult, OUTPUT_TO_INPUT_RATIO, THINKING_TO_INPUT_RATIO,
};
pub use stats::TextStats;
