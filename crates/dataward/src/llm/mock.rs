//! Mock LLM provider for testing and offline runs.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::json;

use crate::error::AssessmentError;

use super::assessment::Assessment;
use super::provider::{LlmConfig, LlmProvider, ServiceReply};

type Reply = std::result::Result<ServiceReply, AssessmentError>;

/// Mock LLM provider that returns scripted replies.
///
/// Scripted replies are consumed in order. Once the script is exhausted the
/// fallback reply is returned for every further call.
pub struct MockProvider {
    config: LlmConfig,
    script: Mutex<VecDeque<Reply>>,
    fallback: Reply,
    calls: AtomicUsize,
}

impl MockProvider {
    /// A mock answering every prompt with a fixed, valid assessment.
    pub fn new() -> Self {
        Self::with_assessment(&Assessment {
            quality_score: 7,
            summary: "Mock assessment: the dataset was profiled without a language model."
                .to_string(),
            recommendations: vec!["Review columns with missing values.".to_string()],
        })
    }

    /// A mock answering with the given assessment inside a generate envelope.
    pub fn with_assessment(assessment: &Assessment) -> Self {
        let inner = json!({
            "quality_score": assessment.quality_score,
            "summary": assessment.summary,
            "recommendations": assessment.recommendations,
        })
        .to_string();
        Self::replying(200, json!({ "response": inner, "done": true }).to_string())
    }

    /// A mock returning the given status and raw body.
    pub fn replying(status: u16, body: impl Into<String>) -> Self {
        Self::from_reply(Ok(ServiceReply {
            status,
            body: body.into(),
        }))
    }

    /// A mock answering with an error status.
    pub fn failing_status(status: u16) -> Self {
        Self::replying(status, format!("mock error {}", status))
    }

    /// A mock whose service cannot be reached.
    pub fn unavailable() -> Self {
        Self::from_reply(Err(AssessmentError::ServiceUnavailable {
            message: "mock service is unreachable".to_string(),
            timed_out: false,
        }))
    }

    /// A mock whose requests time out.
    pub fn timing_out() -> Self {
        Self::from_reply(Err(AssessmentError::ServiceUnavailable {
            message: "mock request timed out".to_string(),
            timed_out: true,
        }))
    }

    /// A mock returning `replies` in order, then repeating the last one.
    pub fn sequence(replies: Vec<Reply>) -> Self {
        let mut script: VecDeque<Reply> = replies.into();
        let fallback = script.pop_back().unwrap_or_else(|| {
            Err(AssessmentError::ServiceUnavailable {
                message: "empty mock script".to_string(),
                timed_out: false,
            })
        });
        let mut mock = Self::from_reply(fallback);
        mock.script = Mutex::new(script);
        mock
    }

    fn from_reply(fallback: Reply) -> Self {
        Self {
            config: LlmConfig::default().with_model("mock"),
            script: Mutex::new(VecDeque::new()),
            fallback,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `complete` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    async fn complete(&self, _prompt: &str) -> Reply {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let scripted = match self.script.lock() {
            Ok(mut script) => script.pop_front(),
            Err(poisoned) => poisoned.into_inner().pop_front(),
        };
        scripted.unwrap_or_else(|| self.fallback.clone())
    }

    fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "mock"
    }
}
