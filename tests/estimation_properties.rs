//! Behavioural properties of estimation, cost and dispatch

use ai_token_estimator::catalog::{Catalog, ModelCategory, DEFAULT_MODEL_ID};
use ai_token_estimator::cost::calculate_cost;
use ai_token_estimator::tokens::HeuristicEstimator;
use ai_token_estimator::{CountingMethod, EstimateRequest, Error, OutputSpec, ProviderRegistry};

fn registry() -> ProviderRegistry {
    ProviderRegistry::new(Catalog::builtin().clone())
}

#[test]
fn test_every_builtin_model_resolves_to_its_provider() {
    let registry = registry();
    for provider in registry.list_providers() {
        for model in &provider.models {
            assert_eq!(registry.resolve_provider(&model.id).unwrap().id, provider.id);
        }
    }
}

#[test]
fn test_default_model_is_gemini_flash() {
    let registry = registry();
    assert_eq!(registry.default_model(None).unwrap().id, DEFAULT_MODEL_ID);
    assert_eq!(registry.default_model(Some("google")).unwrap().id, "gemini-2.5-pro");
    assert!(registry.default_model(Some("nobody")).is_none());
}

#[test]
fn test_estimate_monotonic_in_length() {
    let estimator = HeuristicEstimator::new();
    let model = Catalog::builtin().find_model("gpt-4o").unwrap();
    let mut previous = 0;
    for n in (0..2000).step_by(37) {
        let text = "lorem ipsum, dolor 42 sit amet. ".repeat(n / 32 + 1);
        let text: String = text.chars().take(n).collect();
        let current = estimator.estimate(&text, model, None).input_tokens;
        assert!(current >= previous, "{n}: {current} < {previous}");
        previous = current;
    }
}

#[test]
fn test_empty_text_counts_nothing() {
    let estimator = HeuristicEstimator::new();
    for model in Catalog::builtin().all_models() {
        let r = estimator.estimate("", model, None);
        assert_eq!(r.input_tokens, 0);
        assert_eq!(r.output_tokens, 0);
        assert_eq!(r.thinking_tokens, 0);
        assert_eq!(r.total_tokens, 0);
        assert_eq!(r.character_count, 0);
        assert_eq!(r.word_count, 0);
    }
}

#[test]
fn test_totals_add_up_for_all_models() {
    let estimator = HeuristicEstimator::new();
    let text = "混合テキスト with English, numbers 12345 and punctuation!?\nSecond line.";
    for model in Catalog::builtin().all_models() {
        for output in [None, Some(0), Some(77)] {
            let r = estimator.estimate(text, model, output);
            assert_eq!(r.total_tokens, r.input_tokens + r.output_tokens + r.thinking_tokens);
            assert_eq!(r.is_output_estimated, output.is_none());
            if !model.features.supports_thinking {
                assert_eq!(r.thinking_tokens, 0, "{}", model.id);
            }
        }
    }
}

#[test]
fn test_thinking_billed_only_for_capable_models() {
    let catalog = Catalog::builtin();
    let thinking = catalog.find_model("gemini-2.5-flash").unwrap();
    assert!(thinking.features.supports_thinking);

    let cost = calculate_cost(1000, 500, 50, thinking, 150.0);
    assert!(cost.thinking_cost_usd > 0.0);
    assert_eq!(
        cost.total_cost_usd,
        cost.input_cost_usd + cost.output_cost_usd + cost.thinking_cost_usd
    );

    let embedding = catalog.find_model("gemini-embedding-001").unwrap();
    assert_eq!(embedding.category, ModelCategory::Embedding);
    let cost = calculate_cost(1000, 0, 1000, embedding, 150.0);
    assert_eq!(cost.thinking_cost_usd, 0.0);
}

#[test]
fn test_unknown_model_is_not_found() {
    let err = tokio_test::block_on(
        registry().estimate(&EstimateRequest::new("hi", "gemini-xyz-does-not-exist")),
    )
    .unwrap_err();
    assert!(matches!(err, Error::ModelNotFound { .. }));
    assert!(err.to_string().contains("gemini-xyz-does-not-exist"));
}

#[tokio::test]
async fn test_concurrent_counts_are_independent() {
    let registry = registry();
    let texts: Vec<String> = (1..=32).map(|n| "abcd".repeat(n * 10)).collect();

    let futures = texts
        .iter()
        .map(|t| registry.count_tokens(t, "gpt-4.1-mini", None, None));
    let results = futures::future::join_all(futures).await;

    for (n, result) in (1..=32u64).zip(results) {
        let result = result.unwrap();
        assert_eq!(result.method, CountingMethod::Estimated);
        assert_eq!(result.input_tokens, ((n * 40) as f64 / 3.5).ceil() as u64);
    }
}

#[tokio::test]
async fn test_estimate_report_prices_match_cost_function() {
    let registry = registry();
    let request = EstimateRequest::new("Translate this sentence into French.", "o3")
        .with_output(OutputSpec::Tokens(120))
        .with_exchange_rate(148.5);
    let report = registry.estimate(&request).await.unwrap();

    let model = registry.find_model("o3").unwrap();
    let expected = calculate_cost(
        report.tokens.input_tokens,
        120,
        report.tokens.thinking_tokens,
        model,
        148.5,
    );
    assert_eq!(report.cost, expected);
    assert_eq!(report.model_id, "o3");
    assert_eq!(report.provider_id, "openai");
}

#[tokio::test]
async fn test_maximal_output_override_does_not_overflow() {
    let request = EstimateRequest::new("hello world", "gpt-4o")
        .with_output(OutputSpec::parse_tokens("18446744073709551615").unwrap());
    let report = registry().estimate(&request).await.unwrap();

    assert_eq!(report.tokens.output_tokens, u64::MAX);
    assert_eq!(report.tokens.total_tokens, u64::MAX);
    assert!(report.cost.total_cost_usd.is_finite());
}
