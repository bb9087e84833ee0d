//! Error types for the DataWard library.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for DataWard operations.
#[derive(Debug, Error)]
pub enum DatawardError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error parsing CSV/TSV data.
    #[error("Parse error at row {row}, column {column}: {message}")]
    Parse {
        row: usize,
        column: usize,
        message: String,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file or no data to load.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// The input cannot be treated as a rectangular table.
    #[error("Profiling error: {0}")]
    Profiling(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error saving or loading a report.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// The assessment stage failed.
    #[error(transparent)]
    Assessment(#[from] AssessmentError),
}

/// Result type alias for DataWard operations.
pub type Result<T> = std::result::Result<T, DatawardError>;

/// Maximum number of characters of a service error body kept for diagnostics.
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Failures of a single assessment attempt.
///
/// The variants are ordered the way the assessment client checks for them:
/// transport first, then HTTP status, then the shape of the answer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssessmentError {
    /// The language-model service could not be reached or did not answer in time.
    #[error("LLM service unavailable: {message}")]
    ServiceUnavailable { message: String, timed_out: bool },

    /// The service answered with a non-success status.
    #[error("LLM service returned HTTP {status}: {body}")]
    Service { status: u16, body: String },

    /// The answer is not well-formed JSON, or the envelope could not be unwrapped.
    #[error("Malformed LLM response: {0}")]
    MalformedResponse(String),

    /// The answer parsed but violates the assessment contract.
    #[error("LLM response violates the assessment schema: {0}")]
    SchemaValidation(String),
}

/// Coarse classification of an [`AssessmentError`], stored in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    ServiceUnavailable,
    ServiceError,
    MalformedResponse,
    SchemaValidation,
}

impl AssessmentError {
    /// Build a `Service` error, truncating the body to a diagnostic-sized excerpt.
    pub fn service(status: u16, body: &str) -> Self {
        let body = if body.chars().count() > MAX_ERROR_BODY_CHARS {
            let mut excerpt: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
            excerpt.push_str("...");
            excerpt
        } else {
            body.to_string()
        };
        AssessmentError::Service { status, body }
    }

    /// The failure kind of this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            AssessmentError::ServiceUnavailable { .. } => FailureKind::ServiceUnavailable,
            AssessmentError::Service { .. } => FailureKind::ServiceError,
            AssessmentError::MalformedResponse(_) => FailureKind::MalformedResponse,
            AssessmentError::SchemaValidation(_) => FailureKind::SchemaValidation,
        }
    }

    /// Whether a caller-level retry may succeed.
    ///
    /// Unreachable services, server-side errors and rate limiting are retryable.
    /// A contract violation is likely to recur and is not.
    pub fn is_retryable(&self) -> bool {
        match self {
            AssessmentError::ServiceUnavailable { .. } => true,
            AssessmentError::Service { status, .. } => *status >= 500 || *status == 429,
            AssessmentError::MalformedResponse(_) | AssessmentError::SchemaValidation(_) => false,
        }
    }
}
