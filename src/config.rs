//! Runtime configuration: exchange rate, remote counting endpoint and HTTP
//! knobs. Defaults are production-friendly and every field can be
//! overridden from the environment or a YAML file.

use crate::error::{Error, ErrorContext};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// 1 USD in JPY when no live rate is available.
pub const DEFAULT_EXCHANGE_RATE: f64 = 150.0;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Second-currency units per USD.
    pub exchange_rate: f64,
    pub gemini_base_url: String,
    pub http_timeout_secs: u64,
    pub proxy_url: Option<String>,
    /// Custom catalog file replacing the builtin one.
    pub catalog_path: Option<PathBuf>,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            exchange_rate: DEFAULT_EXCHANGE_RATE,
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            proxy_url: None,
            catalog_path: None,
        }
    }
}

impl EstimatorConfig {
    /// Defaults overlaid with environment variables. Unparsable values are
    /// ignored.
    ///
    /// - `AI_TOKEN_EXCHANGE_RATE`
    /// - `AI_GEMINI_BASE_URL`
    /// - `AI_HTTP_TIMEOUT_SECS` (falls back to `AI_TIMEOUT_SECS`)
    /// - `AI_PROXY_URL`
    /// - `AI_TOKEN_CATALOG`
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Read a YAML file; missing keys keep their defaults.
    pub fn from_yaml_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Some(rate) = env::var("AI_TOKEN_EXCHANGE_RATE")
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|r| r.is_finite() && *r >= 0.0)
        {
            self.exchange_rate = rate;
        }
        if let Ok(url) = env::var("AI_GEMINI_BASE_URL") {
            if !url.trim().is_empty() {
                self.gemini_base_url = url;
            }
        }
        if let Some(secs) = env::var("AI_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .or_else(|| env::var("AI_TIMEOUT_SECS").ok().and_then(|s| s.parse::<u64>().ok()))
        {
            self.http_timeout_secs = secs;
        }
        if let Ok(proxy) = env::var("AI_PROXY_URL") {
            self.proxy_url = Some(proxy);
        }
        if let Ok(path) = env::var("AI_TOKEN_CATALOG") {
            self.catalog_path = Some(PathBuf::from(path));
        }
        self
    }

    pub fn with_exchange_rate(mut self, rate: f64) -> Self {
        self.exchange_rate = rate;
        self
    }

    pub fn with_gemini_base_url(mut self, url: impl Into<String>) -> Self {
        self.gemini_base_url = url.into();
        self
    }

    pub fn with_http_timeout_secs(mut self, secs: u64) -> Self {
        self.http_timeout_secs = secs;
        self
    }

    pub fn with_catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = Some(path.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_exchange_rate(self.exchange_rate)?;
        if let Err(e) = url::Url::parse(&self.gemini_base_url) {
            return Err(Error::configuration_with_context(
                "invalid Gemini base URL",
                ErrorContext::new()
                    .with_field_path("gemini_base_url")
                    .with_details(format!("{}: {}", self.gemini_base_url, e))
                    .with_source("config"),
            ));
        }
        if let Some(ref proxy) = self.proxy_url {
            if let Err(e) = url::Url::parse(proxy) {
                return Err(Error::configuration_with_context(
                    "invalid proxy URL",
                    ErrorContext::new()
                        .with_field_path("proxy_url")
                        .with_details(format!("{}: {}", proxy, e))
                        .with_source("config"),
                ));
            }
        }
        Ok(())
    }
}

/// Rates must be finite and non-negative.
pub(crate) fn validate_exchange_rate(rate: f64) -> Result<()> {
    if !rate.is_finite() || rate < 0.0 {
        return Err(Error::configuration_with_context(
            "exchange rate must be a non-negative number",
            ErrorContext::new()
                .with_field_path("exchange_rate")
                .with_details(rate.to_string())
                .with_source("config"),
        ));
    }
    Ok(())
}
