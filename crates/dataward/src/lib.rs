//! DataWard: dataset profiling with language-model quality assessment.
//!
//! DataWard turns a tabular dataset into a structured profile (shape,
//! duplicate rows, per-column missingness and cardinality) and asks a
//! language-model service to judge the profile's quality.
//!
//! # Core Principles
//!
//! - **Deterministic profiling**: the same table always yields the same profile and prompt
//! - **Validated answers**: model output is checked against a fixed schema, never trusted
//! - **Partial success**: a failed assessment still yields a profile-only report
//!
//! # Example
//!
//! ```no_run
//! use dataward::{DatasetRef, Parser, Pipeline};
//! use dataward::llm::OllamaProvider;
//!
//! # async fn example() -> dataward::Result<()> {
//! let (table, source) = Parser::new().parse_file("orders.csv")?;
//! let pipeline = Pipeline::new().with_llm(OllamaProvider::new()?);
//! let report = pipeline.run(DatasetRef::new(&source.hash).with_name(&source.file), &table).await?;
//!
//! println!("Rows: {}", report.profile.row_count);
//! if let Some(assessment) = report.assessment() {
//!     println!("Quality: {}/10", assessment.quality_score);
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod input;
pub mod llm;
pub mod profile;

mod pipeline;
mod report;

pub use crate::pipeline::{Pipeline, PipelineConfig, RetryPolicy};
pub use crate::report::{AssessmentOutcome, DatasetRef, Report};
pub use error::{AssessmentError, DatawardError, FailureKind, Result};
pub use input::{DataTable, DataType, Parser, ParserConfig, SourceMetadata, Value};
pub use llm::{Assessment, AssessmentClient, LlmConfig, LlmProvider, MockProvider, PromptBuilder};
pub use profile::{ColumnStat, Profile, Profiler, collect_column_stats};
