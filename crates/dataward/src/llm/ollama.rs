//! Ollama-compatible HTTP provider.
//!
//! Talks to any service exposing Ollama's `/api/generate` or `/api/chat`
//! endpoints. Install Ollama from: https://ollama.ai

use std::net::IpAddr;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use crate::error::{AssessmentError, DatawardError, Result};

use super::prompts;
use super::provider::{ApiStyle, LlmConfig, LlmProvider, ServiceReply};

/// Ollama LLM provider.
pub struct OllamaProvider {
    client: Client,
    endpoint: String,
    config: LlmConfig,
}

impl OllamaProvider {
    /// Create a provider with default settings (`llama3` on localhost).
    pub fn new() -> Result<Self> {
        Self::with_config(LlmConfig::default())
    }

    /// Create with a specific model.
    pub fn with_model(model: impl Into<String>) -> Result<Self> {
        Self::with_config(LlmConfig::default().with_model(model))
    }

    /// Create with custom configuration.
    pub fn with_config(config: LlmConfig) -> Result<Self> {
        let mut builder = Client::builder().timeout(config.timeout);
        // Loopback services are never reached through a proxy
        if is_loopback(&config.base_url) {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| DatawardError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint(),
            config,
        })
    }

    /// Build the request body for the configured endpoint.
    fn request_body(&self, prompt: &str) -> serde_json::Value {
        let options = json!({ "temperature": self.config.temperature });

        match self.config.api {
            ApiStyle::Generate => json!({
                "model": self.config.model,
                "prompt": prompt,
                "format": "json",
                "stream": false,
                "options": options
            }),
            ApiStyle::Chat => json!({
                "model": self.config.model,
                "format": "json",
                "stream": false,
                "options": options,
                "messages": [
                    {
                        "role": "system",
                        "content": prompts::system_prompt()
                    },
                    {
                        "role": "user",
                        "content": prompt
                    }
                ]
            }),
        }
    }
}

fn is_loopback(base_url: &str) -> bool {
    let Ok(url) = reqwest::Url::parse(base_url) else {
        return false;
    };
    match url.host_str() {
        Some(host) if host.eq_ignore_ascii_case("localhost") => true,
        Some(host) => host
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse::<IpAddr>()
            .is_ok_and(|ip| ip.is_loopback()),
        None => false,
    }
}

fn transport_error(e: reqwest::Error, endpoint: &str) -> AssessmentError {
    if e.is_timeout() {
        AssessmentError::ServiceUnavailable {
            message: format!("request to {} timed out", endpoint),
            timed_out: true,
        }
    } else if e.is_connect() {
        AssessmentError::ServiceUnavailable {
            message: format!("failed to connect to {}. Is the service running?", endpoint),
            timed_out: false,
        }
    } else {
        AssessmentError::ServiceUnavailable {
            message: format!("request to {} failed: {}", endpoint, e),
            timed_out: false,
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn complete(&self, prompt: &str) -> std::result::Result<ServiceReply, AssessmentError> {
        let started = Instant::now();

        let response = self
            .client
            .post(&self.endpoint)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| transport_error(e, &self.endpoint))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| transport_error(e, &self.endpoint))?;

        debug!(
            endpoint = %self.endpoint,
            model = %self.config.model,
            status,
            bytes = body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "LLM service replied"
        );

        Ok(ServiceReply { status, body })
    }

    fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
