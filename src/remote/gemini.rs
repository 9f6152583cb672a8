//! Gemini token counting (`models/{model}:countTokens`).
//!
//! The API key travels in the `x-goog-api-key` header. A successful response
//! carries `totalTokens`; error responses use the Google error envelope
//! `{"error": {"code", "message", "status"}}`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::ExactCounter;
use crate::config::EstimatorConfig;
use crate::error::Error;
use crate::transport::{HttpReply, HttpTransport};
use crate::Result;

#[derive(Debug, Clone, Serialize)]
struct CountTokensRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Clone, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Clone, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct CountTokensResponse {
    #[serde(rename = "totalTokens")]
    total_tokens: u64,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

fn normalize_model_id(model: &str) -> &str {
    let trimmed = model.trim().trim_matches('/');
    match trimmed.rfind("models/") {
        Some(pos) => &trimmed[pos + "models/".len()..],
        None => trimmed,
    }
}

pub struct GeminiExactCounter {
    transport: HttpTransport,
    base_url: String,
}

impl GeminiExactCounter {
    pub fn new(config: &EstimatorConfig) -> Result<Self> {
        Ok(Self {
            transport: HttpTransport::new(config)?,
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self, model_id: &str) -> String {
        format!(
            "{}/models/{}:countTokens",
            self.base_url,
            normalize_model_id(model_id)
        )
    }

    fn interpret(reply: HttpReply) -> Result<u64> {
        if !reply.is_success() {
            let message = match serde_json::from_str::<ErrorEnvelope>(&reply.body) {
                Ok(env) => match env.error.status {
                    Some(status) => format!("{}: {}", status, env.error.message),
                    None => env.error.message,
                },
                Err(_) if reply.body.trim().is_empty() => "empty error response".to_string(),
                Err(_) => reply.body.trim().to_string(),
            };
            return Err(Error::remote_count_failed(Some(reply.status), message));
        }
        serde_json::from_str::<CountTokensResponse>(&reply.body)
            .map(|r| r.total_tokens)
            .map_err(|e| {
                Error::remote_count_failed(
                    Some(reply.status),
                    format!("failed to parse countTokens response: {}", e),
                )
            })
    }
}

#[async_trait]
impl ExactCounter for GeminiExactCounter {
    async fn count_input_tokens(&self, text: &str, model_id: &str, credential: &str) -> Result<u64> {
        let url = self.endpoint(model_id);
        let body = serde_json::to_value(CountTokensRequest {
            contents: vec![Content {
                parts: vec![Part { text }],
            }],
        })?;

        let reply = self
            .transport
            .post_json(&url, &[("x-goog-api-key", credential)], &body)
            .await
            .map_err(|e| match e {
                Error::Transport(t) => Error::remote_count_failed(None, t.to_string()),
                other => other,
            })?;

        Self::interpret(reply)
    }
}
