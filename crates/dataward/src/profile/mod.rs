//! Statistical profiling of tabular datasets.

mod column;
mod profiler;

pub use column::{ColumnStat, collect_column_stats};
pub use profiler::{Profile, Profiler};
