//! In-memory tabular data and source metadata.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::value::{DataType, Value};

/// Metadata about a loaded source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the file was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been loaded.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            row_count,
            column_count,
            loaded_at: Utc::now(),
        }
    }
}

/// A tabular dataset: named columns over rows of typed cells.
///
/// Construction does not check the shape. The profiler validates it and
/// rejects tables that are not rectangular.
#[derive(Debug, Clone, Default)]
pub struct DataTable {
    /// Column headers, in declared order.
    pub headers: Vec<String>,
    /// Declared column types, if the source carries a schema.
    pub declared_types: Option<Vec<DataType>>,
    /// Row data (row-major order).
    pub rows: Vec<Vec<Value>>,
}

impl DataTable {
    /// Create a new data table without declared column types.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self {
            headers,
            declared_types: None,
            rows,
        }
    }

    /// Attach declared column types (one per header).
    pub fn with_declared_types(mut self, types: Vec<DataType>) -> Self {
        self.declared_types = Some(types);
        self
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Declared type of a column, if any.
    pub fn declared_type(&self, index: usize) -> Option<DataType> {
        self.declared_types
            .as_ref()
            .and_then(|types| types.get(index).copied())
    }

    /// Get all values for a column by index. Cells past the end of a short row read as `Null`.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> {
        self.rows
            .iter()
            .map(move |row| row.get(index).unwrap_or(&Value::Null))
    }

    /// Get a column by name.
    pub fn column_by_name(&self, name: &str) -> Option<Vec<&Value>> {
        let index = self.headers.iter().position(|h| h == name)?;
        Some(self.column_values(index).collect())
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataTable {
        DataTable::new(
            vec!["id".to_string(), "name".to_string()],
            vec![
                vec![Value::Integer(1), Value::from("Alice")],
                vec![Value::Integer(2), Value::Null],
            ],
        )
    }

    #[test]
    fn test_shape_accessors() {
        let table = sample();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.get(0, 1), Some(&Value::from("Alice")));
        assert_eq!(table.get(5, 0), None);
    }

    #[test]
    fn test_column_by_name() {
        let table = sample();
        let names = table.column_by_name("name").unwrap();
        assert_eq!(names, vec![&Value::from("Alice"), &Value::Null]);
        assert!(table.column_by_name("missing").is_none());
    }

    #[test]
    fn test_declared_types() {
        let table = sample().with_declared_types(vec![DataType::Integer, DataType::Text]);
        assert_eq!(table.declared_type(0), Some(DataType::Integer));
        assert_eq!(table.declared_type(2), None);
        assert_eq!(sample().declared_type(0), None);
    }
}
