//! Model pricing and cost calculation.

use serde::{Deserialize, Serialize};

use crate::catalog::{Model, Pricing};
use crate::tokens::TokenCountResult;

const TOKENS_PER_MILLION: f64 = 1_000_000.0;

/// Cost per component in USD and in the second currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub input_cost_usd: f64,
    pub output_cost_usd: f64,
    pub thinking_cost_usd: f64,
    pub total_cost_usd: f64,
    pub input_cost_jpy: f64,
    pub output_cost_jpy: f64,
    pub thinking_cost_jpy: f64,
    pub total_cost_jpy: f64,
}

/// Selects a context-length or audio price tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BillingContext {
    /// Prompt size compared against the model's high-context threshold.
    pub token_count: u64,
    pub is_audio: bool,
}

/// Base calculation: plain `input`/`output` prices, thinking billed at the
/// output rate only for thinking-capable models.
pub fn calculate_cost(
    input_tokens: u64,
    output_tokens: u64,
    thinking_tokens: u64,
    model: &Model,
    exchange_rate: f64,
) -> CostBreakdown {
    calculate_cost_with_context(
        input_tokens,
        output_tokens,
        thinking_tokens,
        model,
        exchange_rate,
        None,
    )
}

/// Like [`calculate_cost`], with an optional tier selector. Audio prices win
/// over the high-context tier; a price the model does not define falls back
/// to the plain text price.
pub fn calculate_cost_with_context(
    input_tokens: u64,
    output_tokens: u64,
    thinking_tokens: u64,
    model: &Model,
    exchange_rate: f64,
    billing: Option<&BillingContext>,
) -> CostBreakdown {
    let (input_price, output_price) = effective_prices(&model.pricing, billing);

    let input_cost_usd = millions(input_tokens) * input_price;
    let output_cost_usd = millions(output_tokens) * output_price;
    let thinking_cost_usd = if model.features.supports_thinking {
        millions(thinking_tokens) * output_price
    } else {
        0.0
    };
    let total_cost_usd = input_cost_usd + output_cost_usd + thinking_cost_usd;

    CostBreakdown {
        input_cost_usd,
        output_cost_usd,
        thinking_cost_usd,
        total_cost_usd,
        input_cost_jpy: input_cost_usd * exchange_rate,
        output_cost_jpy: output_cost_usd * exchange_rate,
        thinking_cost_jpy: thinking_cost_usd * exchange_rate,
        total_cost_jpy: total_cost_usd * exchange_rate,
    }
}

/// Cost of a counting result.
pub fn calculate_result_cost(
    result: &TokenCountResult,
    model: &Model,
    exchange_rate: f64,
) -> CostBreakdown {
    calculate_cost(
        result.input_tokens,
        result.output_tokens,
        result.thinking_tokens,
        model,
        exchange_rate,
    )
}

/// Half-price flex processing, for models that offer it. Cached input is
/// halved too; audio and context tiers do not apply.
pub fn flex_pricing(model: &Model) -> Option<Pricing> {
    if !model.features.flex_processing {
        return None;
    }
    let p = &model.pricing;
    Some(Pricing {
        cached_input: p.cached_input.map(|c| c * 0.5),
        ..Pricing::new(p.input * 0.5, p.output * 0.5)
    })
}

fn millions(tokens: u64) -> f64 {
    tokens as f64 / TOKENS_PER_MILLION
}

fn effective_prices(pricing: &Pricing, billing: Option<&BillingContext>) -> (f64, f64) {
    let Some(ctx) = billing else {
        return (pricing.input, pricing.output);
    };
    if ctx.is_audio {
        return (
            pricing.input_audio.unwrap_or(pricing.input),
            pricing.output_audio.unwrap_or(pricing.output),
        );
    }
    match pricing.high_context {
        Some(ref tier) if ctx.token_count > tier.threshold => (tier.input, tier.output),
        _ => (pricing.input, pricing.output),
    }
}
