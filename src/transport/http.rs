use crate::config::EstimatorConfig;
use crate::Result;
use reqwest::Proxy;
use serde_json::Value;
use std::time::Duration;

/// Raw reply from a JSON endpoint; status interpretation is left to callers.
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &EstimatorConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .pool_max_idle_per_host(8)
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        if let Some(ref proxy_url) = config.proxy_url {
            if let Ok(proxy) = Proxy::all(proxy_url) {
                builder = builder.proxy(proxy);
            }
        }

        let client = builder
            .build()
            .map_err(|e| crate::Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self { client })
    }

    pub async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        body: &Value,
    ) -> Result<HttpReply> {
        let mut request = self.client.post(url).json(body);
        for (k, v) in headers {
            request = request.header(*k, *v);
        }

        let response = request
            .send()
            .await
            .map_err(|e| crate::Error::Transport(TransportError::Http(e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| crate::Error::Transport(TransportError::Http(e)))?;

        Ok(HttpReply { status, body })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}
