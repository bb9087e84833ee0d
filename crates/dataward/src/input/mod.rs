//! Tabular input: typed cells, in-memory tables and the CSV/TSV loader.

mod parser;
mod source;
mod value;

pub use parser::{Parser, ParserConfig};
pub use source::{DataTable, SourceMetadata};
pub use value::{DataType, Value, ValueKey};
