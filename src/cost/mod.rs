//! 成本计算模块：将 token 数量换算为美元与第二币种的费用明细。
//!
//! # Cost Calculation
//!
//! Pure functions turning token counts into a per-component cost breakdown.
//! Prices are USD per million tokens; the second currency is derived through
//! a caller-supplied exchange rate ([`DEFAULT_EXCHANGE_RATE`] when no live
//! rate is available). No I/O, no clock, no randomness: identical inputs
//! give bit-identical output.
//!
//! ```rust
//! use ai_token_estimator::catalog::Catalog;
//! use ai_token_estimator::cost::calculate_cost;
//!
//! let model = Catalog::builtin().find_model("gemini-1.5-pro").unwrap();
//! let cost = calculate_cost(1_000_000, 500_000, 0, model, 150.0);
//! assert_eq!(cost.total_cost_usd, 3.75);
//! assert_eq!(cost.total_cost_jpy, 562.5);
//! ```

mod calculator;

pub use crate::config::DEFAULT_EXCHANGE_RATE;
pub use calculator::{
    calculate_cost, calculate_cost_with_context, calculate_result_cost, flex_pricing,
    BillingContext, CostBreakdown,
};
