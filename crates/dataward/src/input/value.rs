//! Cell values and semantic data types.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Semantic type label of a column's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    /// Whole numbers.
    Integer,
    /// Floating-point numbers.
    Float,
    /// Boolean values (true/false).
    Boolean,
    /// Text/string values.
    Text,
    /// Date and/or time values.
    DateTime,
    /// Non-null values of more than one incompatible type.
    Mixed,
    /// No non-null values to decide from.
    #[default]
    Unknown,
}

impl DataType {
    /// The lowercase tag used in profiles and prompts.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Integer => "integer",
            DataType::Float => "float",
            DataType::Boolean => "boolean",
            DataType::Text => "text",
            DataType::DateTime => "datetime",
            DataType::Mixed => "mixed",
            DataType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    DateTime(NaiveDateTime),
}

impl Value {
    /// Whether this cell is a missing sentinel.
    ///
    /// `Null` and a floating-point NaN are missing. Empty strings and zeros are values.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// Runtime type of a present value, `None` for missing cells.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Null => None,
            Value::Float(f) if f.is_nan() => None,
            Value::Boolean(_) => Some(DataType::Boolean),
            Value::Integer(_) => Some(DataType::Integer),
            Value::Float(_) => Some(DataType::Float),
            Value::Text(_) => Some(DataType::Text),
            Value::DateTime(_) => Some(DataType::DateTime),
        }
    }

    /// Hashable equality key of a present value, `None` for missing cells.
    pub fn key(&self) -> Option<ValueKey<'_>> {
        match self {
            Value::Null => None,
            Value::Float(f) if f.is_nan() => None,
            Value::Boolean(b) => Some(ValueKey::Boolean(*b)),
            Value::Integer(i) => Some(ValueKey::Integer(*i)),
            // -0.0 and 0.0 compare equal, so they share a key
            Value::Float(f) if *f == 0.0 => Some(ValueKey::Float(0.0f64.to_bits())),
            Value::Float(f) => Some(ValueKey::Float(f.to_bits())),
            Value::Text(s) => Some(ValueKey::Text(s)),
            Value::DateTime(dt) => Some(ValueKey::DateTime(*dt)),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::DateTime(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Equality key for a present cell value.
///
/// Values of different variants never compare equal, so `1` and `1.0` are distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKey<'a> {
    Boolean(bool),
    Integer(i64),
    Float(u64),
    Text(&'a str),
    DateTime(NaiveDateTime),
}
