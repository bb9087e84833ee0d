//! Analysis reports and their JSON persistence.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AssessmentError, DatawardError, FailureKind, Result};
use crate::llm::Assessment;
use crate::profile::Profile;

/// Identifies the dataset a report describes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetRef {
    /// Identifier assigned by the caller.
    pub id: String,
    /// Human-readable name (e.g. the uploaded file name).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl DatasetRef {
    /// Reference a dataset by id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }

    /// Attach a display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// What happened to the assessment stage of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AssessmentOutcome {
    /// No language model was configured, or assessment was skipped.
    NotAttempted,
    /// The model answered and the answer passed validation.
    Attached { assessment: Assessment },
    /// Every attempt failed; the last failure is kept for diagnostics.
    Failed {
        kind: FailureKind,
        message: String,
        attempts: u32,
    },
}

impl AssessmentOutcome {
    /// Record the final error of a failed assessment stage.
    pub fn failed(error: &AssessmentError, attempts: u32) -> Self {
        AssessmentOutcome::Failed {
            kind: error.kind(),
            message: error.to_string(),
            attempts,
        }
    }
}

/// The persisted unit: one dataset's profile plus the assessment outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub dataset: DatasetRef,
    /// Structural and statistical profile.
    #[serde(rename = "report_data")]
    pub profile: Profile,
    /// Assessment stage outcome, under its own namespaced key.
    #[serde(rename = "llm_assessment")]
    pub assessment: AssessmentOutcome,
    /// Prompt template version used when an assessment was attempted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_version: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Report {
    /// A report carrying only the profile.
    pub fn profile_only(dataset: DatasetRef, profile: Profile) -> Self {
        Self {
            dataset,
            profile,
            assessment: AssessmentOutcome::NotAttempted,
            template_version: None,
            created_at: Utc::now(),
        }
    }

    /// The attached assessment, if the stage succeeded.
    pub fn assessment(&self) -> Option<&Assessment> {
        match &self.assessment {
            AssessmentOutcome::Attached { assessment } => Some(assessment),
            _ => None,
        }
    }

    /// Whether both stages succeeded.
    pub fn is_complete(&self) -> bool {
        self.assessment().is_some()
    }

    /// Save the report to a pretty-printed JSON file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    DatawardError::Persistence(format!(
                        "Failed to create directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let file = File::create(path).map_err(|e| {
            DatawardError::Persistence(format!(
                "Failed to create file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self).map_err(|e| {
            DatawardError::Persistence(format!("Failed to serialize report: {}", e))
        })?;
        writer.flush().map_err(|e| {
            DatawardError::Persistence(format!(
                "Failed to write file '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Load a report from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| {
            DatawardError::Persistence(format!(
                "Failed to open file '{}': {}",
                path.display(),
                e
            ))
        })?;

        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            DatawardError::Persistence(format!(
                "Failed to parse report '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use tempfile::TempDir;

    fn empty_profile() -> Profile {
        Profile {
            row_count: 0,
            column_count: 0,
            duplicate_row_count: 0,
            columns: IndexMap::new(),
        }
    }

    #[test]
    fn test_outcome_serialization() {
        let report = Report::profile_only(DatasetRef::new("42"), empty_profile());
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["llm_assessment"]["status"], "not_attempted");
        assert_eq!(json["report_data"]["row_count"], 0);
        assert_eq!(json["dataset"]["id"], "42");
        assert!(json.get("template_version").is_none());
    }

    #[test]
    fn test_failed_outcome() {
        let err = AssessmentError::ServiceUnavailable {
            message: "timed out".to_string(),
            timed_out: true,
        };
        let outcome = AssessmentOutcome::failed(&err, 2);
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["status"], "failed");
        assert_eq!(json["kind"], "service_unavailable");
        assert_eq!(json["attempts"], 2);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("report.json");

        let mut report = Report::profile_only(
            DatasetRef::new("7").with_name("sales.csv"),
            empty_profile(),
        );
        report.assessment = AssessmentOutcome::Attached {
            assessment: Assessment::new(8, "good", vec!["dedupe".to_string()]).unwrap(),
        };
        report.save(&path).unwrap();

        let loaded = Report::load(&path).unwrap();
        assert_eq!(loaded, report);
        assert!(loaded.is_complete());
        assert_eq!(loaded.assessment().unwrap().quality_score, 8);
    }

    #[test]
    fn test_save_writes_complete_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.json");

        // Large enough to spill past the writer's internal buffer
        let mut profile = empty_profile();
        for i in 0..500 {
            profile.columns.insert(
                format!("column_{i}"),
                crate::profile::ColumnStat {
                    dtype: crate::input::DataType::Text,
                    missing_count: 0,
                    missing_ratio: 0.0,
                    unique_count: i,
                },
            );
        }
        let report = Report::profile_only(DatasetRef::new("big"), profile);
        report.save(&path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.len() > 8 * 1024);
        assert!(written.trim_end().ends_with('}'));
        assert_eq!(Report::load(&path).unwrap(), report);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_save_reports_failed_write() {
        // Every write to /dev/full fails with ENOSPC
        if !Path::new("/dev/full").exists() {
            return;
        }
        let report = Report::profile_only(DatasetRef::new("1"), empty_profile());
        let err = report.save("/dev/full").unwrap_err();
        assert!(matches!(err, DatawardError::Persistence(msg) if msg.contains("/dev/full")));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Report::load("/nonexistent/report.json").unwrap_err();
        assert!(matches!(err, DatawardError::Persistence(_)));
    }
}
