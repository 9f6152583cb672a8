//! Combined estimate request/report types.

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_EXCHANGE_RATE;
use crate::cost::CostBreakdown;
use crate::error::Error;
use crate::tokens::TokenCountResult;
use crate::Result;

/// How the output-token figure is obtained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "value")]
pub enum OutputSpec {
    /// Half of the input tokens.
    #[default]
    Auto,
    /// Caller-supplied count.
    Tokens(u64),
    /// Sample output text, counted through the same entry point.
    Text(String),
}

impl OutputSpec {
    /// Parse a raw user-entered token count. Blank input means [`OutputSpec::Auto`].
    pub fn parse_tokens(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(OutputSpec::Auto);
        }
        trimmed
            .parse::<u64>()
            .map(OutputSpec::Tokens)
            .map_err(|_| Error::InvalidOutputOverride {
                value: raw.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateRequest {
    pub text: String,
    pub model_id: String,
    #[serde(default)]
    pub output: OutputSpec,
    #[serde(default, skip_serializing)]
    pub credential: Option<String>,
    #[serde(default = "default_exchange_rate")]
    pub exchange_rate: f64,
}

fn default_exchange_rate() -> f64 {
    DEFAULT_EXCHANGE_RATE
}

impl EstimateRequest {
    pub fn new(text: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model_id: model_id.into(),
            output: OutputSpec::Auto,
            credential: None,
            exchange_rate: DEFAULT_EXCHANGE_RATE,
        }
    }

    pub fn with_output(mut self, output: OutputSpec) -> Self {
        self.output = output;
        self
    }

    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    pub fn with_exchange_rate(mut self, rate: f64) -> Self {
        self.exchange_rate = rate;
        self
    }
}

/// Token counts and cost for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostReport {
    pub model_id: String,
    pub provider_id: String,
    pub tokens: TokenCountResult,
    pub cost: CostBreakdown,
    pub exchange_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tokens() {
        assert_eq!(OutputSpec::parse_tokens("").unwrap(), OutputSpec::Auto);
        assert_eq!(OutputSpec::parse_tokens("   ").unwrap(), OutputSpec::Auto);
        assert_eq!(OutputSpec::parse_tokens(" 250 ").unwrap(), OutputSpec::Tokens(250));
        assert_eq!(OutputSpec::parse_tokens("0").unwrap(), OutputSpec::Tokens(0));
    }

    #[test]
    fn test_parse_tokens_rejects_invalid() {
        for raw in ["-5", "abc", "12abc", "1.5"] {
            match OutputSpec::parse_tokens(raw) {
                Err(Error::InvalidOutputOverride { value }) => assert_eq!(value, raw),
                other => panic!("{raw}: unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_request_deserializes_with_defaults() {
        let req: EstimateRequest =
            serde_json::from_str(r#"{"text":"hi","model_id":"gpt-4o"}"#).unwrap();
        assert_eq!(req.output, OutputSpec::Auto);
        assert_eq!(req.exchange_rate, DEFAULT_EXCHANGE_RATE);
        assert!(req.credential.is_none());

        let req: EstimateRequest = serde_json::from_str(
            r#"{"text":"hi","model_id":"gpt-4o","output":{"mode":"tokens","value":12}}"#,
        )
        .unwrap();
        assert_eq!(req.output, OutputSpec::Tokens(12));
    }

    #[test]
    fn test_credential_is_never_serialized() {
        let req = EstimateRequest::new("hi", "gemini-2.5-flash").with_credential("secret");
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("secret"));
    }
}
