//! Assessment values and the client that obtains them.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::AssessmentError;

use super::provider::{LlmProvider, ServiceReply};

/// Lowest accepted quality score.
pub const MIN_QUALITY_SCORE: u8 = 1;
/// Highest accepted quality score.
pub const MAX_QUALITY_SCORE: u8 = 10;
/// Longest accepted summary, in characters.
pub const MAX_SUMMARY_CHARS: usize = 2000;

/// A validated qualitative judgment of a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    /// Overall quality, 1 (worst) to 10 (best).
    pub quality_score: u8,
    /// Short description of the main problems.
    pub summary: String,
    /// Ordered improvement advice. May be empty.
    pub recommendations: Vec<String>,
}

/// The answer object exactly as the model is told to produce it.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawAssessment {
    quality_score: i64,
    summary: String,
    recommendations: Vec<String>,
}

type Validation<T> = std::result::Result<T, AssessmentError>;

fn schema_error(message: impl Into<String>) -> AssessmentError {
    AssessmentError::SchemaValidation(message.into())
}

impl Assessment {
    /// Create an assessment, enforcing the schema limits.
    ///
    /// Text is trimmed. Scores outside 1-10 are rejected, never clamped.
    pub fn new(
        quality_score: i64,
        summary: impl Into<String>,
        recommendations: Vec<String>,
    ) -> Validation<Self> {
        if !(i64::from(MIN_QUALITY_SCORE)..=i64::from(MAX_QUALITY_SCORE)).contains(&quality_score)
        {
            return Err(schema_error(format!(
                "quality_score must be between {} and {}, got {}",
                MIN_QUALITY_SCORE, MAX_QUALITY_SCORE, quality_score
            )));
        }

        let summary = summary.into().trim().to_string();
        if summary.is_empty() {
            return Err(schema_error("summary must not be empty"));
        }
        let summary_chars = summary.chars().count();
        if summary_chars > MAX_SUMMARY_CHARS {
            return Err(schema_error(format!(
                "summary is {} characters, the limit is {}",
                summary_chars, MAX_SUMMARY_CHARS
            )));
        }

        let recommendations = recommendations
            .into_iter()
            .enumerate()
            .map(|(i, rec)| {
                let rec = rec.trim().to_string();
                if rec.is_empty() {
                    Err(schema_error(format!("recommendation {} is empty", i + 1)))
                } else {
                    Ok(rec)
                }
            })
            .collect::<Validation<Vec<_>>>()?;

        Ok(Self {
            // Range checked above
            quality_score: quality_score as u8,
            summary,
            recommendations,
        })
    }

    /// Validate a parsed JSON payload against the assessment schema.
    ///
    /// The payload must be an object with exactly the keys `quality_score`
    /// (integer), `summary` (string) and `recommendations` (list of strings).
    pub fn from_json(payload: Value) -> Validation<Self> {
        let raw: RawAssessment =
            serde_json::from_value(payload).map_err(|e| schema_error(e.to_string()))?;
        Self::new(raw.quality_score, raw.summary, raw.recommendations)
    }
}

/// Locate the inner answer inside a service reply body and parse it.
///
/// Recognized shapes:
/// - `{"response": "<json text>"}` (generate endpoint)
/// - `{"message": {"content": "<json text>"}}` (chat endpoint)
/// - a bare JSON object, taken as the answer itself
pub fn unwrap_envelope(body: &str) -> Validation<Value> {
    let outer: Value = serde_json::from_str(body.trim()).map_err(|e| {
        AssessmentError::MalformedResponse(format!("response body is not JSON: {}", e))
    })?;

    let Value::Object(map) = &outer else {
        return Err(AssessmentError::MalformedResponse(
            "response body is not a JSON object".to_string(),
        ));
    };

    let inner = if let Some(response) = map.get("response") {
        response.as_str().ok_or_else(|| {
            AssessmentError::MalformedResponse("'response' field is not a string".to_string())
        })?
    } else if let Some(message) = map.get("message") {
        message
            .get("content")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                AssessmentError::MalformedResponse(
                    "'message.content' field is missing or not a string".to_string(),
                )
            })?
    } else {
        return Ok(outer);
    };

    parse_inner_payload(inner)
}

/// Parse the model's answer text, tolerating a markdown code fence around it.
///
/// Fences are only stripped when they enclose the whole answer; backticks
/// inside JSON string values are left alone.
fn parse_inner_payload(text: &str) -> Validation<Value> {
    let text = text.trim();
    if let Ok(value) = serde_json::from_str(text) {
        return Ok(value);
    }

    let json_str = strip_code_fence(text).unwrap_or(text);

    if json_str.is_empty() {
        return Err(AssessmentError::MalformedResponse(
            "model returned an empty answer".to_string(),
        ));
    }

    serde_json::from_str(json_str).map_err(|e| {
        AssessmentError::MalformedResponse(format!("model answer is not valid JSON: {}", e))
    })
}

/// The body of a fenced block (```` ``` ```` or ```` ```json ````) spanning the whole text.
fn strip_code_fence(text: &str) -> Option<&str> {
    let inner = text.strip_prefix("```")?.strip_suffix("```")?;
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    Some(inner.trim())
}

/// Classify a raw reply: status, then envelope and JSON, then schema.
pub fn parse_reply(reply: &ServiceReply) -> Validation<Assessment> {
    if !reply.is_success() {
        return Err(AssessmentError::service(reply.status, &reply.body));
    }
    let payload = unwrap_envelope(&reply.body)?;
    Assessment::from_json(payload)
}

/// Obtains validated assessments from a language-model provider.
///
/// Each call makes a single attempt. Retrying is left to the caller.
#[derive(Clone)]
pub struct AssessmentClient {
    provider: Arc<dyn LlmProvider>,
}

impl AssessmentClient {
    /// Create a client over a provider.
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// The underlying provider.
    pub fn provider(&self) -> &dyn LlmProvider {
        self.provider.as_ref()
    }

    /// Send the prompt and validate the answer.
    pub async fn assess(&self, prompt: &str) -> Validation<Assessment> {
        let reply = self.provider.complete(prompt).await?;
        let result = parse_reply(&reply);

        let model = self.provider.config().model.as_str();
        match &result {
            Ok(assessment) => debug!(
                provider = self.provider.name(),
                model,
                score = assessment.quality_score,
                recommendations = assessment.recommendations.len(),
                "assessment accepted"
            ),
            Err(e) => debug!(
                provider = self.provider.name(),
                model,
                error = %e,
                "assessment rejected"
            ),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use serde_json::json;

    fn envelope(inner: &str) -> String {
        json!({ "model": "llama3", "response": inner, "done": true }).to_string()
    }

    #[test]
    fn test_score_boundaries() {
        assert!(Assessment::new(1, "ok", vec![]).is_ok());
        assert!(Assessment::new(10, "ok", vec![]).is_ok());

        for score in [0, 11, -1] {
            let err = Assessment::new(score, "ok", vec![]).unwrap_err();
            assert_eq!(err.kind(), FailureKind::SchemaValidation);
        }
    }

    #[test]
    fn test_summary_limits() {
        assert!(Assessment::new(5, "   ", vec![]).is_err());
        assert!(Assessment::new(5, "x".repeat(MAX_SUMMARY_CHARS), vec![]).is_ok());
        assert!(Assessment::new(5, "x".repeat(MAX_SUMMARY_CHARS + 1), vec![]).is_err());
    }

    #[test]
    fn test_recommendations_validation() {
        assert!(Assessment::new(5, "ok", vec!["".to_string()]).is_err());
        assert!(Assessment::new(5, "ok", vec!["  ".to_string()]).is_err());

        let a = Assessment::new(5, " ok ", vec![" check nulls ".to_string()]).unwrap();
        assert_eq!(a.summary, "ok");
        assert_eq!(a.recommendations, vec!["check nulls"]);
    }

    #[test]
    fn test_parse_generate_envelope() {
        let body = envelope(r#"{"quality_score":7,"summary":"ok","recommendations":["check nulls"]}"#);
        let assessment = parse_reply(&ServiceReply::ok(body)).unwrap();

        assert_eq!(
            assessment,
            Assessment {
                quality_score: 7,
                summary: "ok".to_string(),
                recommendations: vec!["check nulls".to_string()],
            }
        );
    }

    #[test]
    fn test_parse_chat_envelope() {
        let body = json!({
            "message": {
                "role": "assistant",
                "content": "{\"quality_score\":3,\"summary\":\"many gaps\",\"recommendations\":[]}"
            }
        })
        .to_string();
        let assessment = parse_reply(&ServiceReply::ok(body)).unwrap();
        assert_eq!(assessment.quality_score, 3);
        assert!(assessment.recommendations.is_empty());
    }

    #[test]
    fn test_parse_bare_object_and_code_fence() {
        let bare = r#"{"quality_score":9,"summary":"clean","recommendations":[]}"#;
        assert_eq!(parse_reply(&ServiceReply::ok(bare)).unwrap().quality_score, 9);

        let fenced = envelope("```json\n{\"quality_score\":8,\"summary\":\"fine\",\"recommendations\":[]}\n```");
        assert_eq!(parse_reply(&ServiceReply::ok(fenced)).unwrap().quality_score, 8);
    }

    #[test]
    fn test_backticks_inside_values_are_kept() {
        let body = envelope(
            r#"{"quality_score":5,"summary":"wrap ```code``` blocks","recommendations":["use ``` fences"]}"#,
        );
        let assessment = parse_reply(&ServiceReply::ok(body)).unwrap();

        assert_eq!(assessment.quality_score, 5);
        assert_eq!(assessment.summary, "wrap ```code``` blocks");
        assert_eq!(assessment.recommendations, vec!["use ``` fences"]);
    }

    #[test]
    fn test_plain_fence_without_language_tag() {
        let fenced = envelope("```\n{\"quality_score\":4,\"summary\":\"gaps\",\"recommendations\":[]}\n```");
        assert_eq!(parse_reply(&ServiceReply::ok(fenced)).unwrap().quality_score, 4);
    }

    #[test]
    fn test_many_long_recommendations_accepted() {
        let recommendations: Vec<String> = (0..25).map(|i| format!("step {i}")).collect();
        let inner = json!({
            "quality_score": 6,
            "summary": "ok",
            "recommendations": recommendations,
        })
        .to_string();
        let assessment = parse_reply(&ServiceReply::ok(envelope(&inner))).unwrap();
        assert_eq!(assessment.recommendations.len(), 25);

        let long = "x".repeat(2_000);
        let a = Assessment::new(6, "ok", vec![long.clone()]).unwrap();
        assert_eq!(a.recommendations, vec![long]);
    }

    #[test]
    fn test_error_status() {
        let reply = ServiceReply {
            status: 500,
            body: "internal error".to_string(),
        };
        let err = parse_reply(&reply).unwrap_err();
        assert_eq!(
            err,
            AssessmentError::Service {
                status: 500,
                body: "internal error".to_string()
            }
        );
    }

    #[test]
    fn test_malformed_bodies() {
        for body in [
            "not json at all".to_string(),
            "[1, 2, 3]".to_string(),
            json!({ "response": 42 }).to_string(),
            json!({ "message": { "role": "assistant" } }).to_string(),
            envelope("I think the data is fine"),
            envelope(""),
        ] {
            let err = parse_reply(&ServiceReply::ok(body.clone())).unwrap_err();
            assert_eq!(err.kind(), FailureKind::MalformedResponse, "body: {body}");
        }
    }

    #[test]
    fn test_schema_violations() {
        for inner in [
            r#"{"quality_score":7,"summary":"ok"}"#,
            r#"{"quality_score":"7","summary":"ok","recommendations":[]}"#,
            r#"{"quality_score":7.5,"summary":"ok","recommendations":[]}"#,
            r#"{"quality_score":11,"summary":"ok","recommendations":[]}"#,
            r#"{"quality_score":7,"summary":"ok","recommendations":"none"}"#,
            r#"{"quality_score":7,"summary":"ok","recommendations":[],"extra":1}"#,
            r#"[]"#,
        ] {
            let err = parse_reply(&ServiceReply::ok(envelope(inner))).unwrap_err();
            assert_eq!(err.kind(), FailureKind::SchemaValidation, "inner: {inner}");
        }
    }
}
