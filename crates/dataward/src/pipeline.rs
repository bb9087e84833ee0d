//! Profiling and assessment pipeline.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::Result;
use crate::input::DataTable;
use crate::llm::{AssessmentClient, LlmProvider, PromptBuilder, PromptTemplate};
use crate::profile::{Profile, Profiler};
use crate::report::{AssessmentOutcome, DatasetRef, Report};

/// How the pipeline retries a failed assessment.
///
/// Only retryable failures (unreachable service, 5xx and 429 statuses) are
/// retried. Malformed or schema-violating answers are final.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one.
    pub max_retries: u32,
    /// Fixed delay between attempts.
    pub backoff: Duration,
}

impl RetryPolicy {
    /// A single attempt, no retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            backoff: Duration::ZERO,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 1,
            backoff: Duration::from_secs(2),
        }
    }
}

/// Configuration for the pipeline.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Prompt template settings.
    pub prompt: PromptTemplate,
    /// Retry policy for the assessment stage.
    pub retry: RetryPolicy,
}

/// Runs profiling and, when a language model is configured, assessment.
///
/// The pipeline keeps no per-run state and can be shared between concurrent runs.
pub struct Pipeline {
    config: PipelineConfig,
    profiler: Profiler,
    prompts: PromptBuilder,
    client: Option<AssessmentClient>,
}

impl Pipeline {
    /// Create a pipeline with default configuration and no language model.
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    /// Create a pipeline with custom configuration.
    pub fn with_config(config: PipelineConfig) -> Self {
        let prompts = PromptBuilder::with_template(config.prompt.clone());
        Self {
            config,
            profiler: Profiler::new(),
            prompts,
            client: None,
        }
    }

    /// Add an LLM provider for the assessment stage.
    pub fn with_llm(self, provider: impl LlmProvider + 'static) -> Self {
        self.with_shared_llm(Arc::new(provider))
    }

    /// Add an LLM provider that is shared with other owners.
    pub fn with_shared_llm(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.client = Some(AssessmentClient::new(provider));
        self
    }

    /// Whether an assessment stage is configured.
    pub fn has_llm(&self) -> bool {
        self.client.is_some()
    }

    /// Run only the profiling stage.
    pub fn profile_only(&self, table: &DataTable) -> Result<Profile> {
        self.profiler.profile(table)
    }

    /// Profile the table and assess the profile.
    ///
    /// Profiling errors abort the run. Assessment errors never do: the report
    /// is returned with the failure recorded in its assessment outcome.
    pub async fn run(&self, dataset: DatasetRef, table: &DataTable) -> Result<Report> {
        info!(dataset = %dataset.id, rows = table.row_count(), "starting analysis");

        let profile = self.profiler.profile(table)?;
        let mut report = Report::profile_only(dataset, profile);

        if let Some(client) = &self.client {
            let prompt = self.prompts.build(&report.profile);
            report.template_version = Some(prompt.template_version.to_string());
            report.assessment = self.assess(client, &prompt.text).await;
        }

        match &report.assessment {
            AssessmentOutcome::Attached { assessment } => info!(
                dataset = %report.dataset.id,
                score = assessment.quality_score,
                "analysis complete"
            ),
            AssessmentOutcome::Failed { kind, attempts, .. } => warn!(
                dataset = %report.dataset.id,
                ?kind,
                attempts,
                "analysis complete without assessment"
            ),
            AssessmentOutcome::NotAttempted => {
                info!(dataset = %report.dataset.id, "analysis complete (profile only)")
            }
        }

        Ok(report)
    }

    /// Assess with retries, folding the result into an outcome.
    async fn assess(&self, client: &AssessmentClient, prompt: &str) -> AssessmentOutcome {
        let retry = &self.config.retry;
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            match client.assess(prompt).await {
                Ok(assessment) => return AssessmentOutcome::Attached { assessment },
                Err(e) if e.is_retryable() && attempts <= retry.max_retries => {
                    warn!(
                        provider = client.provider().name(),
                        model = %client.provider().config().model,
                        attempt = attempts,
                        error = %e,
                        "assessment failed, retrying"
                    );
                    if !retry.backoff.is_zero() {
                        tokio::time::sleep(retry.backoff).await;
                    }
                }
                Err(e) => return AssessmentOutcome::failed(&e, attempts),
            }
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
