//! Language-model assessment of dataset profiles.
//!
//! This module turns a [`Profile`](crate::Profile) into a prompt, sends it to
//! a language-model service and validates the answer into an [`Assessment`].
//!
//! # Supported Providers
//!
//! - **Ollama** - `/api/generate` or `/api/chat` on any Ollama-compatible host
//! - **Mock** - scripted replies for tests and offline runs
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use dataward::llm::{AssessmentClient, LlmConfig, OllamaProvider};
//!
//! # async fn example(prompt: &str) -> dataward::Result<()> {
//! let provider = OllamaProvider::with_config(LlmConfig::from_env()?)?;
//! let client = AssessmentClient::new(Arc::new(provider));
//! let assessment = client.assess(prompt).await?;
//! println!("Score: {}/10", assessment.quality_score);
//! # Ok(())
//! # }
//! ```

mod assessment;
mod mock;
mod ollama;
mod prompts;
mod provider;

pub use assessment::{
    Assessment, AssessmentClient, MAX_QUALITY_SCORE, MAX_SUMMARY_CHARS, MIN_QUALITY_SCORE,
    parse_reply, unwrap_envelope,
};
pub use mock::MockProvider;
pub use ollama::OllamaProvider;
pub use prompts::{
    Prompt, PromptBuilder, PromptSummary, PromptTemplate, TEMPLATE_VERSION,
    quality_assessment_prompt, system_prompt,
};
pub use provider::{
    ApiStyle, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT, LlmConfig, LlmProvider,
    ServiceReply,
};
