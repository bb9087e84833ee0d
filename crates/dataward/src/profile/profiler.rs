//! Dataset-wide profiling.

use std::collections::HashSet;
use std::time::Instant;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::column::{ColumnStat, collect_column_stats};
use crate::error::{DatawardError, Result};
use crate::input::{DataTable, ValueKey};

/// Structural and statistical summary of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Number of data rows.
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// Rows that exactly repeat an earlier row.
    pub duplicate_row_count: usize,
    /// Per-column statistics, in the dataset's column order.
    pub columns: IndexMap<String, ColumnStat>,
}

impl Profile {
    /// Names of columns with at least one missing value, in column order.
    pub fn columns_with_missing(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|(_, stat)| stat.has_missing())
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Total missing cells across all columns.
    pub fn total_missing(&self) -> usize {
        self.columns.values().map(|s| s.missing_count).sum()
    }

    /// Share of cells that are present (0.0-1.0). An empty table is complete.
    pub fn completeness(&self) -> f64 {
        let cells = self.row_count * self.column_count;
        if cells == 0 {
            1.0
        } else {
            1.0 - self.total_missing() as f64 / cells as f64
        }
    }

    /// Get a column's statistics by name.
    pub fn column(&self, name: &str) -> Option<&ColumnStat> {
        self.columns.get(name)
    }
}

/// Builds [`Profile`]s from tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct Profiler;

impl Profiler {
    /// Create a new profiler.
    pub fn new() -> Self {
        Self
    }

    /// Profile a table.
    ///
    /// Fails with [`DatawardError::Profiling`] when the table is not
    /// rectangular or its column names are not unique.
    pub fn profile(&self, table: &DataTable) -> Result<Profile> {
        let started = Instant::now();
        validate_shape(table)?;

        let mut columns = IndexMap::with_capacity(table.column_count());
        for (index, name) in table.headers.iter().enumerate() {
            let stat = collect_column_stats(table.column_values(index), table.declared_type(index));
            columns.insert(name.clone(), stat);
        }

        let profile = Profile {
            row_count: table.row_count(),
            column_count: table.column_count(),
            duplicate_row_count: count_duplicate_rows(table),
            columns,
        };

        debug!(
            rows = profile.row_count,
            columns = profile.column_count,
            duplicates = profile.duplicate_row_count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "profiled table"
        );

        Ok(profile)
    }
}

fn validate_shape(table: &DataTable) -> Result<()> {
    let mut names = HashSet::with_capacity(table.column_count());
    for name in &table.headers {
        if !names.insert(name.as_str()) {
            return Err(DatawardError::Profiling(format!(
                "duplicate column name '{}'",
                name
            )));
        }
    }

    if let Some(types) = &table.declared_types {
        if types.len() != table.column_count() {
            return Err(DatawardError::Profiling(format!(
                "{} declared types for {} columns",
                types.len(),
                table.column_count()
            )));
        }
    }

    if let Some((index, row)) = table
        .rows
        .iter()
        .enumerate()
        .find(|(_, row)| row.len() != table.column_count())
    {
        return Err(DatawardError::Profiling(format!(
            "row {} has {} values but the table has {} columns",
            index + 1,
            row.len(),
            table.column_count()
        )));
    }

    Ok(())
}

/// Count rows equal to an earlier row. Missing cells compare equal to each other.
fn count_duplicate_rows(table: &DataTable) -> usize {
    let mut seen: HashSet<Vec<Option<ValueKey<'_>>>> = HashSet::with_capacity(table.row_count());
    table
        .rows
        .iter()
        .filter(|row| !seen.insert(row.iter().map(|v| v.key()).collect()))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{DataType, Value};

    fn table(headers: &[&str], rows: Vec<Vec<Value>>) -> DataTable {
        DataTable::new(headers.iter().map(|h| h.to_string()).collect(), rows)
    }

    #[test]
    fn test_profile_small_table() {
        let t = table(
            &["id", "name"],
            vec![
                vec![Value::Integer(1), Value::from("a")],
                vec![Value::Integer(2), Value::Null],
                vec![Value::Integer(3), Value::from("c")],
            ],
        );
        let profile = Profiler::new().profile(&t).unwrap();

        assert_eq!(profile.row_count, 3);
        assert_eq!(profile.column_count, 2);
        assert_eq!(profile.duplicate_row_count, 0);
        assert_eq!(profile.column("name").unwrap().missing_count, 1);
        assert_eq!(profile.column("id").unwrap().unique_count, 3);
        assert_eq!(profile.columns_with_missing(), vec!["name"]);
        assert_eq!(profile.total_missing(), 1);
    }

    #[test]
    fn test_column_order_preserved() {
        let t = table(&["zeta", "alpha", "mid"], vec![]);
        let profile = Profiler::new().profile(&t).unwrap();
        let names: Vec<&str> = profile.columns.keys().map(|k| k.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert_eq!(profile.completeness(), 1.0);
    }

    #[test]
    fn test_duplicates_treat_null_as_equal() {
        let t = table(
            &["a", "b"],
            vec![
                vec![Value::Integer(1), Value::Null],
                vec![Value::Integer(1), Value::Null],
                vec![Value::Integer(1), Value::Float(f64::NAN)],
                vec![Value::Integer(2), Value::Null],
            ],
        );
        let profile = Profiler::new().profile(&t).unwrap();
        assert_eq!(profile.duplicate_row_count, 2);
    }

    #[test]
    fn test_all_rows_identical() {
        let row = vec![Value::from("x"), Value::Integer(7)];
        let t = table(&["a", "b"], vec![row.clone(), row.clone(), row.clone(), row]);
        let profile = Profiler::new().profile(&t).unwrap();
        assert_eq!(profile.duplicate_row_count, 3);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let t = table(
            &["a", "b"],
            vec![vec![Value::Integer(1), Value::Integer(2)], vec![Value::Integer(3)]],
        );
        let err = Profiler::new().profile(&t).unwrap_err();
        assert!(matches!(err, DatawardError::Profiling(msg) if msg.contains("row 2")));
    }

    #[test]
    fn test_duplicate_column_names_rejected() {
        let t = table(&["a", "a"], vec![]);
        assert!(matches!(
            Profiler::new().profile(&t),
            Err(DatawardError::Profiling(_))
        ));
    }

    #[test]
    fn test_blank_column_names_accepted() {
        let t = table(
            &[" ", "a"],
            vec![vec![Value::Integer(1), Value::Null], vec![Value::Integer(2), Value::from("x")]],
        );
        let profile = Profiler::new().profile(&t).unwrap();

        assert_eq!(profile.column_count, 2);
        assert_eq!(profile.column(" ").unwrap().unique_count, 2);
        assert_eq!(profile.column("a").unwrap().missing_count, 1);
    }

    #[test]
    fn test_declared_type_count_mismatch_rejected() {
        let t = table(&["a", "b"], vec![]).with_declared_types(vec![DataType::Text]);
        assert!(matches!(
            Profiler::new().profile(&t),
            Err(DatawardError::Profiling(_))
        ));
    }

    #[test]
    fn test_completeness() {
        let t = table(
            &["a", "b"],
            vec![
                vec![Value::Null, Value::Integer(1)],
                vec![Value::Integer(2), Value::Integer(3)],
            ],
        );
        let profile = Profiler::new().profile(&t).unwrap();
        assert_eq!(profile.completeness(), 0.75);
    }
}
