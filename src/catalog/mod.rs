//! 模型目录：提供商、模型、价格与能力元数据的只读注册表。
//!
//! # Model Catalog
//!
//! Static registry of AI models grouped by provider. Each model carries its
//! pricing (USD per million tokens) and descriptive capability flags. The
//! builtin catalog is embedded YAML parsed once per process; custom catalogs
//! can be loaded from YAML or JSON files with the same validation.
//!
//! | Accessor | Description |
//! |----------|-------------|
//! | [`Catalog::list_providers`] | Providers in declaration order |
//! | [`Catalog::find_model`] | Model by globally unique id |
//! | [`Catalog::find_provider`] | Owning provider of a model |
//! | [`Catalog::default_model`] | Preferred model, per provider or global |
//!
//! ```rust
//! use ai_token_estimator::catalog::Catalog;
//!
//! let catalog = Catalog::builtin();
//! let model = catalog.default_model(None).unwrap();
//! assert_eq!(model.id, "gemini-2.5-flash");
//! assert_eq!(catalog.find_provider(&model.id).unwrap().id, "google");
//! ```

mod loader;
mod types;

pub use types::{
    ContextTier, ExactCounting, Features, Model, ModelCategory, ModelStatus, Pricing, Provider,
};

use crate::Result;
use once_cell::sync::Lazy;
use std::path::Path;

/// Globally preferred model when no provider is specified.
pub const DEFAULT_MODEL_ID: &str = "gemini-2.5-flash";

const BUILTIN_CATALOG: &str = include_str!("builtin.yaml");

static BUILTIN: Lazy<Catalog> = Lazy::new(|| {
    loader::parse_yaml(BUILTIN_CATALOG).expect("embedded catalog must be valid")
});

/// Immutable provider/model registry.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    providers: Vec<Provider>,
}

impl Catalog {
    /// The catalog shipped with the crate.
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        loader::parse_yaml(content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        loader::parse_json(content)
    }

    /// Load from a `.yaml`, `.yml` or `.json` file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        loader::load_path(path.as_ref())
    }

    pub fn list_providers(&self) -> &[Provider] {
        &self.providers
    }

    pub fn provider(&self, provider_id: &str) -> Option<&Provider> {
        self.providers.iter().find(|p| p.id == provider_id)
    }

    pub fn all_models(&self) -> impl Iterator<Item = &Model> {
        self.providers.iter().flat_map(|p| p.models.iter())
    }

    pub fn find_model(&self, model_id: &str) -> Option<&Model> {
        self.all_models().find(|m| m.id == model_id)
    }

    pub fn find_provider(&self, model_id: &str) -> Option<&Provider> {
        self.providers.iter().find(|p| p.owns(model_id))
    }

    /// With a provider id: the provider's first stable model, else its first
    /// model. Without one: [`DEFAULT_MODEL_ID`], falling back to the first
    /// provider's default when a custom catalog lacks it.
    pub fn default_model(&self, provider_id: Option<&str>) -> Option<&Model> {
        match provider_id {
            Some(id) => self.provider(id).and_then(Provider::default_model),
            None => self
                .find_model(DEFAULT_MODEL_ID)
                .or_else(|| self.providers.first().and_then(Provider::default_model)),
        }
    }

    fn scoped(&self, provider_id: Option<&str>) -> Vec<&Model> {
        self.providers
            .iter()
            .filter(|p| provider_id.map_or(true, |id| p.id == id))
            .flat_map(|p| p.models.iter())
            .collect()
    }

    pub fn models_by_category(
        &self,
        category: ModelCategory,
        provider_id: Option<&str>,
    ) -> Vec<&Model> {
        self.scoped(provider_id)
            .into_iter()
            .filter(|m| m.category == category)
            .collect()
    }

    pub fn models_by_status(&self, status: ModelStatus, provider_id: Option<&str>) -> Vec<&Model> {
        self.scoped(provider_id)
            .into_iter()
            .filter(|m| m.status == status)
            .collect()
    }

    pub fn models_by_encoding(&self, encoding: &str) -> Vec<&Model> {
        self.all_models()
            .filter(|m| m.encoding.as_deref() == Some(encoding))
            .collect()
    }

    /// Distinct categories in first-seen order.
    pub fn available_categories(&self, provider_id: Option<&str>) -> Vec<ModelCategory> {
        let mut seen = Vec::new();
        for model in self.scoped(provider_id) {
            if !seen.contains(&model.category) {
                seen.push(model.category);
            }
        }
        seen
    }
}
