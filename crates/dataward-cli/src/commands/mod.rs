//! CLI command implementations.

pub mod analyze;
pub mod profile;
pub mod prompt;
pub mod show;

use std::path::Path;

use colored::Colorize;
use dataward::{DataTable, Parser, Profile, SourceMetadata};

/// Load a data file, failing early with a readable message when it is missing.
pub fn load_table(file: &Path) -> Result<(DataTable, SourceMetadata), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }
    Ok(Parser::new().parse_file(file)?)
}

/// Print the per-column table shared by `profile`, `analyze` and `show`.
pub fn print_columns(profile: &Profile) {
    println!("{}", "Columns:".yellow().bold());
    println!(
        "  {:24} {:10} {:>9} {:>9} {:>9}",
        "name", "dtype", "missing", "missing%", "unique"
    );
    for (name, stat) in &profile.columns {
        let missing = format!("{:>9}", stat.missing_count);
        let missing = if stat.has_missing() {
            missing.yellow()
        } else {
            missing.normal()
        };
        println!(
            "  {:24} {:10} {} {:>8.1}% {:>9}",
            name,
            stat.dtype.to_string(),
            missing,
            stat.missing_percentage(),
            stat.unique_count
        );
    }
}

/// Print the headline numbers of a profile.
pub fn print_overview(profile: &Profile) {
    println!(
        "Rows: {}  Columns: {}  Duplicate rows: {}",
        profile.row_count.to_string().white().bold(),
        profile.column_count.to_string().white().bold(),
        if profile.duplicate_row_count > 0 {
            profile.duplicate_row_count.to_string().yellow()
        } else {
            profile.duplicate_row_count.to_string().green()
        }
    );
    println!("Completeness: {:.1}%", profile.completeness() * 100.0);
}
