//! CSV/TSV loader producing typed tables.
//!
//! Column types are resolved the way a dataframe loader does it: a column is
//! numeric only if every non-null cell parses as a number, otherwise it falls
//! back to text.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use sha2::{Digest, Sha256};
use tracing::debug;

use super::source::{DataTable, SourceMetadata};
use super::value::{DataType, Value};
use crate::error::{DatawardError, Result};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Datetime layouts accepted for `datetime` columns.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
    /// Cell contents read as null (compared case-insensitively after trimming).
    pub null_tokens: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
            null_tokens: ["", "NA", "N/A", "null", "NaN", "None"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Loads delimited text files into [`DataTable`]s.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the data table and metadata.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(DataTable, SourceMetadata)> {
        let path = path.as_ref();
        let io_err = |e| DatawardError::Io {
            path: path.to_path_buf(),
            source: e,
        };

        let mut file = File::open(path).map_err(io_err)?;
        let size_bytes = file.metadata().map_err(io_err)?.len();

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(io_err)?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(&contents)?,
        };

        let table = self.parse_bytes(&contents, delimiter)?;

        let format = match delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        }
        .to_string();

        debug!(
            path = %path.display(),
            rows = table.row_count(),
            columns = table.column_count(),
            %format,
            "loaded table"
        );

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            format,
            table.row_count(),
            table.column_count(),
        );

        Ok((table, metadata))
    }

    /// Parse bytes with a known delimiter.
    pub fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<DataTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let mut headers: Vec<String> = if self.config.has_header {
            reader
                .headers()?
                .iter()
                .enumerate()
                .map(|(i, s)| match s.trim() {
                    "" => format!("column_{}", i + 1),
                    name => name.to_string(),
                })
                .collect()
        } else {
            Vec::new()
        };

        let mut raw_rows: Vec<Vec<String>> = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            if let Some(max) = self.config.max_rows {
                if row_idx >= max {
                    break;
                }
            }
            let record = result?;
            raw_rows.push(record.iter().map(|s| s.to_string()).collect());
        }

        if !self.config.has_header {
            let width = raw_rows.first().map(|r| r.len()).unwrap_or(0);
            headers = (0..width).map(|i| format!("column_{}", i + 1)).collect();
        }

        if headers.is_empty() {
            return Err(DatawardError::EmptyData("No columns found".to_string()));
        }

        let expected_cols = headers.len();
        for (row_idx, row) in raw_rows.iter().enumerate() {
            if row.len() > expected_cols {
                return Err(DatawardError::Parse {
                    row: row_idx + 1,
                    column: expected_cols + 1,
                    message: format!(
                        "row has {} fields but the header has {}",
                        row.len(),
                        expected_cols
                    ),
                });
            }
        }

        let types: Vec<DataType> = (0..expected_cols)
            .map(|col| {
                let cells: Vec<&str> = raw_rows
                    .iter()
                    .filter_map(|row| row.get(col))
                    .map(|s| s.trim())
                    .filter(|s| !self.is_null_token(s))
                    .collect();
                resolve_type(&cells)
            })
            .collect();

        let rows = raw_rows
            .iter()
            .map(|raw| {
                (0..expected_cols)
                    .map(|col| match raw.get(col) {
                        Some(cell) => self.convert_cell(cell, types[col]),
                        // Short rows are padded with nulls
                        None => Value::Null,
                    })
                    .collect()
            })
            .collect();

        Ok(DataTable::new(headers, rows).with_declared_types(types))
    }

    /// Check if a cell matches one of the configured null tokens.
    pub fn is_null_token(&self, value: &str) -> bool {
        let trimmed = value.trim();
        self.config
            .null_tokens
            .iter()
            .any(|token| trimmed.eq_ignore_ascii_case(token))
    }

    fn convert_cell(&self, cell: &str, data_type: DataType) -> Value {
        let trimmed = cell.trim();
        if self.is_null_token(trimmed) {
            return Value::Null;
        }
        // The resolved type held for every non-null cell, so parsing only fails for text
        match data_type {
            DataType::Integer => trimmed.parse().map(Value::Integer).ok(),
            DataType::Float => trimmed.parse().map(Value::Float).ok(),
            DataType::Boolean => parse_bool(trimmed).map(Value::Boolean),
            DataType::DateTime => parse_datetime(trimmed).map(Value::DateTime),
            _ => None,
        }
        .unwrap_or_else(|| Value::Text(cell.to_string()))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick the narrowest type every non-null cell parses as.
fn resolve_type(cells: &[&str]) -> DataType {
    if cells.is_empty() {
        DataType::Unknown
    } else if cells.iter().all(|c| c.parse::<i64>().is_ok()) {
        DataType::Integer
    } else if cells.iter().all(|c| c.parse::<f64>().is_ok()) {
        DataType::Float
    } else if cells.iter().all(|c| parse_bool(c).is_some()) {
        DataType::Boolean
    } else if cells.iter().all(|c| parse_datetime(c).is_some()) {
        DataType::DateTime
    } else {
        DataType::Text
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .filter_map(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(DatawardError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        // Higher count with consistent per-line counts wins; tab breaks ties
        let consistent = counts.iter().all(|&c| c == first_count);
        let score = if consistent {
            first_count * 1000 + if delim == b'\t' { 100 } else { 0 }
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}
