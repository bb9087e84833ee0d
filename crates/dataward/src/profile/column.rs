//! Per-column statistics.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::input::{DataType, Value};

/// Statistics computed for a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStat {
    /// Semantic type of the column's values.
    pub dtype: DataType,
    /// Number of null/missing values.
    pub missing_count: usize,
    /// `missing_count / row_count`, 0.0 for an empty column.
    pub missing_ratio: f64,
    /// Number of distinct non-null values.
    pub unique_count: usize,
}

impl ColumnStat {
    /// Whether the column has at least one missing value.
    pub fn has_missing(&self) -> bool {
        self.missing_count > 0
    }

    /// Missing values as a percentage (0-100).
    pub fn missing_percentage(&self) -> f64 {
        self.missing_ratio * 100.0
    }
}

/// Compute statistics for one column's values.
///
/// `declared` is the type the source schema gives the column. Without one the
/// type is inferred from the runtime variants of the present values, never
/// from their textual form.
pub fn collect_column_stats<'a>(
    values: impl IntoIterator<Item = &'a Value>,
    declared: Option<DataType>,
) -> ColumnStat {
    let mut row_count = 0usize;
    let mut missing_count = 0usize;
    let mut distinct = HashSet::new();
    let mut seen_types = HashSet::new();

    for value in values {
        row_count += 1;
        match value.key() {
            Some(key) => {
                distinct.insert(key);
                if let Some(t) = value.data_type() {
                    seen_types.insert(t);
                }
            }
            None => missing_count += 1,
        }
    }

    let missing_ratio = if row_count == 0 {
        0.0
    } else {
        missing_count as f64 / row_count as f64
    };

    ColumnStat {
        dtype: declared.unwrap_or_else(|| unify_types(&seen_types)),
        missing_count,
        missing_ratio,
        unique_count: distinct.len(),
    }
}

/// Collapse the runtime types seen in a column into one label.
fn unify_types(seen: &HashSet<DataType>) -> DataType {
    match seen.len() {
        0 => DataType::Unknown,
        1 => seen.iter().next().copied().unwrap_or_default(),
        2 if seen.contains(&DataType::Integer) && seen.contains(&DataType::Float) => {
            DataType::Float
        }
        _ => DataType::Mixed,
    }
}
