//! 提供商注册表 — 根据模型 id 解析提供商并分发计数策略
//!
//! Provider registry and dispatcher. Resolves a model id to its owning
//! provider, picks that provider's [`TokenCounter`], and offers the single
//! counting entry point callers use.
//!
//! Dispatch rule: exact counting runs only when the provider supports it and
//! the caller supplies a non-blank credential; every other call is estimated
//! locally. Remote failures are returned to the caller, never replaced by an
//! estimate.

mod request;

pub use request::{CostReport, EstimateRequest, OutputSpec};

use std::collections::HashMap;
use std::sync::Arc;

use crate::catalog::{Catalog, ExactCounting, Model, Provider};
use crate::config::{validate_exchange_rate, EstimatorConfig};
use crate::cost::{calculate_result_cost, CostBreakdown};
use crate::error::Error;
use crate::remote::{GeminiExactCounter, RemoteCounter};
use crate::tokens::{HeuristicCounter, TokenCountResult, TokenCounter};
use crate::Result;

/// Catalog plus one counting strategy per provider. Holds no mutable state,
/// so a shared reference can serve concurrent calls.
pub struct ProviderRegistry {
    catalog: Arc<Catalog>,
    counters: HashMap<String, Arc<dyn TokenCounter>>,
}

impl ProviderRegistry {
    /// Registry with estimation-only counters for every provider.
    pub fn new(catalog: Catalog) -> Self {
        let counters = catalog
            .list_providers()
            .iter()
            .map(|p| {
                let counter: Arc<dyn TokenCounter> = Arc::new(HeuristicCounter::new(p.id.clone()));
                (p.id.clone(), counter)
            })
            .collect();
        Self {
            catalog: Arc::new(catalog),
            counters,
        }
    }

    /// Registry wired from configuration: custom catalog if configured, and
    /// remote counters for providers that declare a counting service.
    pub fn from_config(config: &EstimatorConfig) -> Result<Self> {
        config.validate()?;
        let catalog = match config.catalog_path {
            Some(ref path) => Catalog::from_path(path)?,
            None => Catalog::builtin().clone(),
        };

        let mut remote: Vec<(String, ExactCounting)> = Vec::new();
        for provider in catalog.list_providers() {
            if let Some(kind) = provider.exact_counting {
                remote.push((provider.id.clone(), kind));
            }
        }

        let mut registry = Self::new(catalog);
        for (provider_id, kind) in remote {
            let counter: Arc<dyn TokenCounter> = match kind {
                ExactCounting::Gemini => Arc::new(RemoteCounter::new(
                    provider_id.clone(),
                    Arc::new(GeminiExactCounter::new(config)?),
                )),
            };
            registry.counters.insert(provider_id, counter);
        }
        Ok(registry)
    }

    /// Builtin catalog with default configuration.
    pub fn builtin() -> Result<Self> {
        Self::from_config(&EstimatorConfig::default())
    }

    /// Replace the counter registered for `counter.provider_id()`.
    pub fn with_counter(mut self, counter: Arc<dyn TokenCounter>) -> Self {
        self.counters
            .insert(counter.provider_id().to_string(), counter);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn list_providers(&self) -> &[Provider] {
        self.catalog.list_providers()
    }

    pub fn find_model(&self, model_id: &str) -> Option<&Model> {
        self.catalog.find_model(model_id)
    }

    pub fn default_model(&self, provider_id: Option<&str>) -> Option<&Model> {
        self.catalog.default_model(provider_id)
    }

    pub fn resolve_provider(&self, model_id: &str) -> Result<&Provider> {
        self.catalog
            .find_provider(model_id)
            .ok_or_else(|| Error::model_not_found(model_id))
    }

    fn resolve(&self, model_id: &str) -> Result<(&Provider, &Model)> {
        let provider = self.resolve_provider(model_id)?;
        let model = provider
            .model(model_id)
            .ok_or_else(|| Error::model_not_found(model_id))?;
        Ok((provider, model))
    }

    fn counter_for(&self, provider_id: &str) -> Arc<dyn TokenCounter> {
        match self.counters.get(provider_id) {
            Some(counter) => counter.clone(),
            None => Arc::new(HeuristicCounter::new(provider_id)),
        }
    }

    /// Count tokens for `text` under `model_id`.
    pub async fn count_tokens(
        &self,
        text: &str,
        model_id: &str,
        output_override: Option<u64>,
        credential: Option<&str>,
    ) -> Result<TokenCountResult> {
        let (provider, model) = self.resolve(model_id)?;
        let counter = self.counter_for(&provider.id);
        let has_credential = credential.map_or(false, |c| !c.trim().is_empty());

        if counter.supports_exact() && has_credential {
            tracing::debug!(provider = %provider.id, model = %model.id, "dispatching to exact counter");
            counter
                .exact_count(text, model, output_override, credential)
                .await
        } else {
            tracing::debug!(provider = %provider.id, model = %model.id, "dispatching to estimator");
            Ok(counter.estimate(text, model, output_override))
        }
    }

    pub fn calculate_cost(
        &self,
        result: &TokenCountResult,
        model_id: &str,
        exchange_rate: f64,
    ) -> Result<CostBreakdown> {
        let model = self
            .find_model(model_id)
            .ok_or_else(|| Error::model_not_found(model_id))?;
        Ok(calculate_result_cost(result, model, exchange_rate))
    }

    /// Full flow: resolve the output figure, count the input, price it.
    pub async fn estimate(&self, request: &EstimateRequest) -> Result<CostReport> {
        let (provider, model) = self.resolve(&request.model_id)?;
        validate_exchange_rate(request.exchange_rate)?;
        let credential = request.credential.as_deref();

        let output_override = match request.output {
            OutputSpec::Auto => None,
            OutputSpec::Tokens(n) => Some(n),
            OutputSpec::Text(ref sample) if sample.trim().is_empty() => None,
            OutputSpec::Text(ref sample) => Some(
                self.count_tokens(sample, &model.id, None, credential)
                    .await?
                    .input_tokens,
            ),
        };

        let tokens = self
            .count_tokens(&request.text, &model.id, output_override, credential)
            .await?;
        let cost = calculate_result_cost(&tokens, model, request.exchange_rate);

        Ok(CostReport {
            model_id: model.id.clone(),
            provider_id: provider.id.clone(),
            tokens,
            cost,
            exchange_rate: request.exchange_rate,
        })
    }
}
