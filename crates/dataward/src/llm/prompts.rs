//! Prompt templates for quality assessment.

use serde::{Deserialize, Serialize};

use crate::profile::Profile;

/// Version tag of the assessment template. Bump it whenever the wording changes.
pub const TEMPLATE_VERSION: &str = "quality-v1";

/// Columns with missing values listed by name before the rest are only counted.
const MAX_LISTED_COLUMNS: usize = 50;

/// Compact, bounded-size view of a profile sent to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptSummary {
    pub num_rows: usize,
    pub num_columns: usize,
    pub num_duplicate_rows: usize,
    /// Names of columns with at least one missing value, in column order.
    pub columns_with_missing_values: Vec<String>,
    /// Columns with missing values left out of the list above.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub omitted_columns_with_missing_values: usize,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl PromptSummary {
    /// Reduce a profile to the fields the model sees.
    pub fn from_profile(profile: &Profile) -> Self {
        let missing = profile.columns_with_missing();
        let omitted = missing.len().saturating_sub(MAX_LISTED_COLUMNS);

        Self {
            num_rows: profile.row_count,
            num_columns: profile.column_count,
            num_duplicate_rows: profile.duplicate_row_count,
            columns_with_missing_values: missing
                .into_iter()
                .take(MAX_LISTED_COLUMNS)
                .map(str::to_string)
                .collect(),
            omitted_columns_with_missing_values: omitted,
        }
    }
}

/// Settings for rendering the assessment prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplate {
    /// Language the model should answer in.
    pub language: String,
}

impl PromptTemplate {
    /// Template answering in the given language.
    pub fn with_language(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }

    /// Version tag of the template wording.
    pub fn version(&self) -> &'static str {
        TEMPLATE_VERSION
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::with_language("English")
    }
}

/// A rendered prompt together with the summary it embeds.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub summary: PromptSummary,
    pub text: String,
    pub template_version: &'static str,
}

/// Renders assessment prompts from profiles. Pure and deterministic.
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    template: PromptTemplate,
}

impl PromptBuilder {
    /// Create a builder with the default template.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with a custom template.
    pub fn with_template(template: PromptTemplate) -> Self {
        Self { template }
    }

    /// The template in use.
    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }

    /// Reduce the profile and render the prompt.
    pub fn build(&self, profile: &Profile) -> Prompt {
        let summary = PromptSummary::from_profile(profile);
        let text = quality_assessment_prompt(&summary, &self.template);
        Prompt {
            summary,
            text,
            template_version: self.template.version(),
        }
    }
}

/// System prompt for chat-style endpoints.
pub fn system_prompt() -> &'static str {
    "You are a data quality assistant. You always answer with a single JSON object \
     and nothing else."
}

/// Build the data quality assessment prompt.
pub fn quality_assessment_prompt(summary: &PromptSummary, template: &PromptTemplate) -> String {
    let summary_json = serde_json::to_string_pretty(summary)
        .unwrap_or_else(|_| "Unable to serialize summary".to_string());

    format!(
        r#"You are a data quality assistant. Analyze the following brief summary of a dataset.
Your task is to rate the overall data quality on a 10-point scale, write a short summary of
the main problems (for example duplicate rows or missing values) and give a list of concrete
recommendations for improving the data.

## Data Summary
{summary_json}

## Response Format
Respond strictly with a JSON object with exactly these keys: "quality_score", "summary", "recommendations".
- "quality_score": an integer from 1 to 10, where 10 means perfect quality.
- "summary": a short description (2-3 sentences) of the main problems.
- "recommendations": a list of strings with clear, actionable advice.

Respond in {language}."#,
        language = template.language,
    )
}
