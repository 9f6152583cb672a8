use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "providers[1].models[3].id")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., the offending value)
    pub details: Option<String>,
    /// Source of the error (e.g., "catalog_loader", "config")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for token counting and cost estimation.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Model not found: {model_id}")]
    ModelNotFound { model_id: String },

    /// Exact counting was requested but cannot run (no credential, or the
    /// provider has no counting endpoint). Callers fall back to estimation.
    #[error("Exact token counting unavailable for provider '{provider_id}': {reason}")]
    CountingUnavailable { provider_id: String, reason: String },

    #[error("Remote token counting failed{}: {message}", format_status(.status))]
    RemoteCountFailed {
        status: Option<u16>,
        message: String,
    },

    #[error("Invalid output token override: '{value}' (expected a non-negative integer)")]
    InvalidOutputOverride { value: String },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Network transport error: {0}")]
    Transport(#[from] crate::transport::TransportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

fn format_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (HTTP {})", code),
        None => String::new(),
    }
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn model_not_found(model_id: impl Into<String>) -> Self {
        Error::ModelNotFound {
            model_id: model_id.into(),
        }
    }

    pub fn counting_unavailable(provider_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::CountingUnavailable {
            provider_id: provider_id.into(),
            reason: reason.into(),
        }
    }

    pub fn remote_count_failed(status: Option<u16>, message: impl Into<String>) -> Self {
        Error::RemoteCountFailed {
            status,
            message: message.into(),
        }
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Whether the caller may reasonably fall back to the heuristic estimator.
    pub fn is_fallbackable(&self) -> bool {
        matches!(
            self,
            Error::CountingUnavailable { .. } | Error::RemoteCountFailed { .. }
        )
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Configuration { context, .. } => Some(context),
            _ => None,
        }
    }
}
