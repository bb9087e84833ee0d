//! LLM provider trait and configuration.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AssessmentError, DatawardError, Result};

/// Default language-model service host.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default model name.
pub const DEFAULT_MODEL: &str = "llama3";

/// Default request timeout. Model inference on local hardware is slow.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Which endpoint of the service to call, and therefore which envelope to expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiStyle {
    /// `POST /api/generate`; the answer arrives as `{"response": "<json>"}`.
    #[default]
    Generate,
    /// `POST /api/chat`; the answer arrives as `{"message": {"content": "<json>"}}`.
    Chat,
}

impl ApiStyle {
    fn path(&self) -> &'static str {
        match self {
            ApiStyle::Generate => "/api/generate",
            ApiStyle::Chat => "/api/chat",
        }
    }
}

/// Configuration for LLM providers.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    /// Service base URL, without the endpoint path.
    pub base_url: String,
    /// Model to use (e.g., "llama3").
    pub model: String,
    /// Upper bound for one request, connection included.
    pub timeout: Duration,
    /// Temperature for generation (0.0-1.0).
    pub temperature: f64,
    /// Endpoint style.
    pub api: ApiStyle,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            temperature: 0.2,
            api: ApiStyle::Generate,
        }
    }
}

impl LlmConfig {
    /// Build a configuration from the process environment.
    ///
    /// Reads `DATAWARD_LLM_HOST` (falling back to `OLLAMA_HOST`),
    /// `DATAWARD_LLM_MODEL` and `DATAWARD_LLM_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(host) = lookup("DATAWARD_LLM_HOST").or_else(|| lookup("OLLAMA_HOST")) {
            config = config.with_base_url(host);
        }
        if let Some(model) = lookup("DATAWARD_LLM_MODEL") {
            config.model = model;
        }
        if let Some(secs) = lookup("DATAWARD_LLM_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                DatawardError::Config(format!(
                    "DATAWARD_LLM_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                    secs
                ))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Set the base URL. A missing scheme defaults to `http://`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        let base_url = base_url.trim().trim_end_matches('/');
        self.base_url = if base_url.contains("://") {
            base_url.to_string()
        } else {
            format!("http://{}", base_url)
        };
        self
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the endpoint style.
    pub fn with_api(mut self, api: ApiStyle) -> Self {
        self.api = api;
        self
    }

    /// Full URL of the configured endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, self.api.path())
    }
}

/// Raw reply of the service: HTTP status and undecoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceReply {
    pub status: u16,
    pub body: String,
}

impl ServiceReply {
    /// A 200 reply with the given body.
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for LLM providers.
///
/// A provider performs exactly one request per call and reports only
/// transport failures itself. Status and payload checks belong to
/// [`AssessmentClient`](super::AssessmentClient).
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send the prompt, asking for a JSON answer, and return the raw reply.
    ///
    /// Fails with [`AssessmentError::ServiceUnavailable`] when the service
    /// cannot be reached or does not answer within the timeout.
    async fn complete(&self, prompt: &str) -> std::result::Result<ServiceReply, AssessmentError>;

    /// Get the configuration for this provider.
    fn config(&self) -> &LlmConfig;

    /// Get the name of this provider (for logging/debugging).
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = LlmConfig::default();
        assert_eq!(config.endpoint(), "http://localhost:11434/api/generate");
        assert_eq!(config.model, "llama3");
        assert_eq!(config.timeout, Duration::from_secs(300));
    }

    #[test]
    fn test_from_lookup() {
        let config = LlmConfig::from_lookup(lookup(&[
            ("OLLAMA_HOST", "ollama:11434/"),
            ("DATAWARD_LLM_MODEL", "mistral"),
            ("DATAWARD_LLM_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "http://ollama:11434");
        assert_eq!(config.model, "mistral");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_dataward_host_takes_precedence() {
        let config = LlmConfig::from_lookup(lookup(&[
            ("OLLAMA_HOST", "http://other:1"),
            ("DATAWARD_LLM_HOST", "https://llm.internal"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "https://llm.internal");
    }

    #[test]
    fn test_invalid_timeout() {
        let err = LlmConfig::from_lookup(lookup(&[("DATAWARD_LLM_TIMEOUT_SECS", "soon")]));
        assert!(matches!(err, Err(DatawardError::Config(_))));
    }

    #[test]
    fn test_chat_endpoint() {
        let config = LlmConfig::default().with_api(ApiStyle::Chat);
        assert_eq!(config.endpoint(), "http://localhost:11434/api/chat");
    }

    #[test]
    fn test_reply_success() {
        assert!(ServiceReply::ok("{}").is_success());
        assert!(!ServiceReply { status: 500, body: String::new() }.is_success());
    }
}
