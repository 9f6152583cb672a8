//! Catalog record types: providers, models, pricing and feature flags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed model category enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelCategory {
    Chat,
    Multimodal,
    Reasoning,
    Audio,
    Tts,
    Embedding,
    Legacy,
}

impl ModelCategory {
    pub const ALL: [ModelCategory; 7] = [
        ModelCategory::Chat,
        ModelCategory::Multimodal,
        ModelCategory::Reasoning,
        ModelCategory::Audio,
        ModelCategory::Tts,
        ModelCategory::Embedding,
        ModelCategory::Legacy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Multimodal => "multimodal",
            Self::Reasoning => "reasoning",
            Self::Audio => "audio",
            Self::Tts => "tts",
            Self::Embedding => "embedding",
            Self::Legacy => "legacy",
        }
    }
}

impl fmt::Display for ModelCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelStatus {
    Stable,
    Preview,
    Experimental,
    Deprecated,
}

impl ModelStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Preview => "preview",
            Self::Experimental => "experimental",
            Self::Deprecated => "deprecated",
        }
    }
}

impl fmt::Display for ModelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Remote token-counting service a provider exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExactCounting {
    /// Gemini `models/{model}:countTokens`.
    Gemini,
}

/// Input/output prices that apply above a token-count threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextTier {
    /// Prompt size in tokens above which this tier applies.
    pub threshold: u64,
    pub input: f64,
    pub output: f64,
}

/// Prices in USD per million tokens.
///
/// Optional fields are `None` when the variant does not apply to the model,
/// which is different from a price of zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    pub input: f64,
    pub output: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_input: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_context: Option<ContextTier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_audio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_audio: Option<f64>,
}

impl Pricing {
    pub fn new(input: f64, output: f64) -> Self {
        Self {
            input,
            output,
            cached_input: None,
            high_context: None,
            input_audio: None,
            output_audio: None,
        }
    }

    /// Every price carried by this record, with a label for diagnostics.
    pub(crate) fn labelled_prices(&self) -> Vec<(&'static str, f64)> {
        let mut prices = vec![("input", self.input), ("output", self.output)];
        if let Some(p) = self.cached_input {
            prices.push(("cached_input", p));
        }
        if let Some(ref tier) = self.high_context {
            prices.push(("high_context.input", tier.input));
            prices.push(("high_context.output", tier.output));
        }
        if let Some(p) = self.input_audio {
            prices.push(("input_audio", p));
        }
        if let Some(p) = self.output_audio {
            prices.push(("output_audio", p));
        }
        prices
    }
}

/// Descriptive capability flags. Only `supports_thinking` affects billing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Features {
    pub supports_thinking: bool,
    pub supports_audio: bool,
    pub supports_video: bool,
    pub supports_grounding: bool,
    pub supports_vision: bool,
    pub supports_function_calling: bool,
    pub supports_realtime: bool,
    pub supports_caching: bool,
    /// Eligible for discounted flex processing.
    pub flex_processing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_window: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub category: ModelCategory,
    pub status: ModelStatus,
    pub pricing: Pricing,
    #[serde(default)]
    pub features: Features,
    /// Heuristic encoding tag (e.g. `o200k_base`); absent for providers
    /// with a remote exact counter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub description: String,
    /// Whether exact counting needs a caller-supplied credential.
    #[serde(default)]
    pub requires_credential: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exact_counting: Option<ExactCounting>,
    pub models: Vec<Model>,
}

impl Provider {
    pub fn model(&self, model_id: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.id == model_id)
    }

    pub fn owns(&self, model_id: &str) -> bool {
        self.model(model_id).is_some()
    }

    /// First stable model, or the first model when none is stable.
    pub fn default_model(&self) -> Option<&Model> {
        self.models
            .iter()
            .find(|m| m.status == ModelStatus::Stable)
            .or_else(|| self.models.first())
    }
}
