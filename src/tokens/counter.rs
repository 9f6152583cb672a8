//! Per-provider token counting strategies.

use super::estimator::HeuristicEstimator;
use super::result::TokenCountResult;
use crate::catalog::Model;
use crate::error::Error;
use crate::Result;
use async_trait::async_trait;

/// Counting capability implemented once per provider.
///
/// Every counter can estimate locally. Counters backed by a remote counting
/// service also override [`TokenCounter::supports_exact`] and
/// [`TokenCounter::exact_count`]; the registry picks the path per call.
#[async_trait]
pub trait TokenCounter: Send + Sync {
    fn provider_id(&self) -> &str;

    fn estimate(
        &self,
        text: &str,
        model: &Model,
        output_override: Option<u64>,
    ) -> TokenCountResult {
        HeuristicEstimator::new().estimate(text, model, output_override)
    }

    fn supports_exact(&self) -> bool {
        false
    }

    /// Authoritative input count. Fails with [`Error::CountingUnavailable`]
    /// when no credential is supplied or the provider has no counting
    /// service; never substitutes an estimate.
    async fn exact_count(
        &self,
        _text: &str,
        _model: &Model,
        _output_override: Option<u64>,
        _credential: Option<&str>,
    ) -> Result<TokenCountResult> {
        Err(Error::counting_unavailable(
            self.provider_id(),
            "provider exposes no token-counting service",
        ))
    }
}

/// Estimation-only counter for providers without a counting service.
#[derive(Debug, Clone)]
pub struct HeuristicCounter {
    provider_id: String,
}

impl HeuristicCounter {
    pub fn new(provider_id: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
        }
    }
}

#[async_trait]
impl TokenCounter for HeuristicCounter {
    fn provider_id(&self) -> &str {
        &self.provider_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::tokens::CountingMethod;

    #[test]
    fn test_heuristic_counter_estimates() {
        let counter = HeuristicCounter::new("openai");
        let model = Catalog::builtin().find_model("gpt-4.1").unwrap();
        let r = counter.estimate(&"x".repeat(35), model, None);
        assert_eq!(r.input_tokens, 10);
        assert_eq!(r.method, CountingMethod::Estimated);
        assert!(!counter.supports_exact());
    }

    #[tokio::test]
    async fn test_heuristic_counter_has_no_exact_path() {
        let counter = HeuristicCounter::new("openai");
        let model = Catalog::builtin().find_model("gpt-4.1").unwrap();
        let err = counter
            .exact_count("hello", model, None, Some("sk-test"))
            .await
            .unwrap_err();
        match err {
            Error::CountingUnavailable { provider_id, .. } => assert_eq!(provider_id, "openai"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
