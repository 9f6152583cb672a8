//! 远程精确计数：委托提供商的 token 计数接口。
//!
//! Exact counting through a provider's token-counting service.
//!
//! Only the input figure comes from the remote call. Output and thinking
//! tokens are derived with the same proportions as the heuristic path, since
//! no service reports them ahead of generation. One outbound call is made per
//! invocation and failures are returned as-is, without retry.

mod gemini;

pub use gemini::GeminiExactCounter;

use async_trait::async_trait;
use std::sync::Arc;

use crate::catalog::Model;
use crate::error::Error;
use crate::tokens::{CountingMethod, TextStats, TokenCountResult, TokenCounter};
use crate::Result;

/// A remote service returning an authoritative input-token count.
#[async_trait]
pub trait ExactCounter: Send + Sync {
    async fn count_input_tokens(&self, text: &str, model_id: &str, credential: &str) -> Result<u64>;
}

/// Token counter for providers with a counting service: estimates locally,
/// counts remotely when asked with a credential.
pub struct RemoteCounter {
    provider_id: String,
    exact: Arc<dyn ExactCounter>,
}

impl RemoteCounter {
    pub fn new(provider_id: impl Into<String>, exact: Arc<dyn ExactCounter>) -> Self {
        Self {
            provider_id: provider_id.into(),
            exact,
        }
    }
}

#[async_trait]
impl TokenCounter for RemoteCounter {
    fn provider_id(&self) -> &str {
        &self.provider_id
    }

    fn supports_exact(&self) -> bool {
        true
    }

    async fn exact_count(
        &self,
        text: &str,
        model: &Model,
        output_override: Option<u64>,
        credential: Option<&str>,
    ) -> Result<TokenCountResult> {
        let credential = match credential.map(str::trim) {
            Some(c) if !c.is_empty() => c,
            _ => {
                return Err(Error::counting_unavailable(
                    &self.provider_id,
                    "no credential supplied",
                ))
            }
        };

        tracing::debug!(provider = %self.provider_id, model = %model.id, "counting tokens remotely");
        let input_tokens = match self.exact.count_input_tokens(text, &model.id, credential).await {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(provider = %self.provider_id, model = %model.id, error = %e, "remote token count failed");
                return Err(e);
            }
        };

        Ok(TokenCountResult::assemble(
            input_tokens,
            TextStats::of(text),
            model,
            output_override,
            CountingMethod::Exact,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedCounter {
        tokens: u64,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ExactCounter for FixedCounter {
        async fn count_input_tokens(&self, _text: &str, _model_id: &str, _credential: &str) -> Result<u64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.tokens)
        }
    }

    struct FailingCounter;

    #[async_trait]
    impl ExactCounter for FailingCounter {
        async fn count_input_tokens(&self, _text: &str, _model_id: &str, _credential: &str) -> Result<u64> {
            Err(Error::remote_count_failed(Some(503), "unavailable"))
        }
    }

    #[tokio::test]
    async fn test_exact_count_derives_output_and_thinking() {
        let exact = Arc::new(FixedCounter {
            tokens: 1000,
            calls: AtomicUsize::new(0),
        });
        let counter = RemoteCounter::new("google", exact.clone());
        let model = Catalog::builtin().find_model("gemini-2.5-pro").unwrap();

        let r = counter
            .exact_count("some text", model, None, Some("key"))
            .await
            .unwrap();
        assert_eq!(r.input_tokens, 1000);
        assert_eq!(r.output_tokens, 500);
        assert_eq!(r.thinking_tokens, 50);
        assert_eq!(r.total_tokens, 1550);
        assert_eq!(r.method, CountingMethod::Exact);
        assert_eq!(r.word_count, 2);
        assert_eq!(exact.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_or_blank_credential_is_unavailable() {
        let exact = Arc::new(FixedCounter {
            tokens: 1,
            calls: AtomicUsize::new(0),
        });
        let counter = RemoteCounter::new("google", exact.clone());
        let model = Catalog::builtin().find_model("gemini-2.5-flash").unwrap();

        for credential in [None, Some(""), Some("   ")] {
            let err = counter.exact_count("hi", model, None, credential).await.unwrap_err();
            assert!(matches!(err, Error::CountingUnavailable { .. }));
        }
        assert_eq!(exact.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_remote_failure_is_not_replaced_by_estimate() {
        let counter = RemoteCounter::new("google", Arc::new(FailingCounter));
        let model = Catalog::builtin().find_model("gemini-2.5-flash").unwrap();
        let err = counter
            .exact_count("hi", model, Some(3), Some("key"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::RemoteCountFailed { status: Some(503), .. }));
    }
}
