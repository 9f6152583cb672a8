//! Mock HTTP server setup for integration tests

use ai_token_estimator::{EstimatorConfig, ProviderRegistry};
use mockito::{Matcher, Mock, Server, ServerGuard};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Test fixture that manages a mock countTokens server
pub struct MockServerFixture {
    pub server: Arc<Mutex<ServerGuard>>,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self {
            server: Arc::new(Mutex::new(server)),
            base_url,
        }
    }

    /// Configuration pointing the Gemini counter at the mock server
    pub fn config(&self) -> EstimatorConfig {
        EstimatorConfig::default()
            .with_gemini_base_url(self.base_url.clone())
            .with_http_timeout_secs(5)
    }

    /// Registry with the builtin catalog and the mock server as counting endpoint
    pub fn registry(&self) -> ProviderRegistry {
        ProviderRegistry::from_config(&self.config()).expect("registry")
    }

    /// Path of the countTokens endpoint for a model
    pub fn count_path(model: &str) -> String {
        format!("/models/{model}:countTokens")
    }

    /// Successful countTokens response, checked against key and request text
    pub async fn mock_count_tokens(&self, model: &str, key: &str, text: &str, total: u64) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock("POST", Self::count_path(model).as_str())
            .match_header("x-goog-api-key", key)
            .match_body(Matcher::PartialJson(serde_json::json!({
                "contents": [{ "parts": [{ "text": text }] }]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(r#"{{"totalTokens": {total}}}"#))
            .create_async()
            .await
    }

    /// Google-style error envelope
    pub async fn mock_error_response(
        &self,
        model: &str,
        status: u16,
        error_status: &str,
        message: &str,
    ) -> Mock {
        let mut server = self.server.lock().await;
        let body = serde_json::json!({
            "error": { "code": status, "message": message, "status": error_status }
        });
        server
            .mock("POST", Self::count_path(model).as_str())
            .with_status(status as usize)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await
    }

    /// Any request to the endpoint; combine with `expect(0)` to assert silence
    pub async fn mock_any(&self, model: &str) -> Mock {
        let mut server = self.server.lock().await;
        server
            .mock("POST", Self::count_path(model).as_str())
            .with_status(200)
            .with_body(r#"{"totalTokens": 1}"#)
            .expect(0)
            .create_async()
            .await
    }
}
