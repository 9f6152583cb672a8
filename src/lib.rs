//! # ai-token-estimator
//!
//! 面向多厂商 AI 模型的 token 估算与成本计算引擎。
//!
//! Token estimation and cost engine for AI models across providers. Given a
//! text and a model id it reports how many input, output and thinking tokens
//! the request would consume and what that costs in USD and a second
//! currency.
//!
//! ## Overview
//!
//! - **Catalog**: static, validated model metadata with per-million-token prices
//! - **Estimation**: encoding- and script-aware character heuristic, no network
//! - **Exact counting**: provider token-counting service when a credential is supplied
//! - **Cost**: pure, deterministic per-component cost breakdown
//! - **Registry**: resolves the model's provider and dispatches to its counter
//!
//! ## Quick Start
//!
//! ```rust
//! use ai_token_estimator::{EstimateRequest, OutputSpec, ProviderRegistry};
//!
//! # tokio_test::block_on(async {
//! let registry = ProviderRegistry::builtin()?;
//! let request = EstimateRequest::new("Summarize this article.", "gemini-2.5-flash")
//!     .with_output(OutputSpec::Tokens(200));
//! let report = registry.estimate(&request).await?;
//! assert_eq!(report.tokens.output_tokens, 200);
//! assert!(report.cost.total_cost_usd > 0.0);
//! # Ok::<(), ai_token_estimator::Error>(())
//! # }).unwrap();
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`catalog`] | Providers, models, prices and lookups |
//! | [`tokens`] | Heuristic estimation and the per-provider counting trait |
//! | [`remote`] | Exact counting through provider services |
//! | [`cost`] | Cost breakdown from token counts |
//! | [`registry`] | Provider resolution and dispatch |
//! | [`config`] | Exchange rate, endpoints and timeouts |
//! | [`transport`] | Shared HTTP client |

pub mod catalog;
pub mod config;
pub mod cost;
pub mod registry;
pub mod remote;
pub mod tokens;
pub mod transport;

// Re-export main types for convenience
pub use catalog::{Catalog, Model, ModelCategory, ModelStatus, Pricing, Provider};
pub use config::EstimatorConfig;
pub use cost::{calculate_cost, CostBreakdown};
pub use registry::{CostReport, EstimateRequest, OutputSpec, ProviderRegistry};
pub use tokens::{CountingMethod, HeuristicEstimator, TokenCountResult, TokenCounter};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
