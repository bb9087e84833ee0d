//! Profile command - profile a data file without an LLM.

use std::path::PathBuf;

use colored::Colorize;
use dataward::Pipeline;

use super::{load_table, print_columns, print_overview};

pub fn run(file: PathBuf, json_output: bool, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (table, source) = load_table(&file)?;
    let profile = Pipeline::new().profile_only(&table)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&profile)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Profiled".cyan().bold(),
        source.file.white()
    );
    if verbose {
        println!("Format: {}  Size: {} bytes  Hash: {}", source.format, source.size_bytes, source.hash);
    }
    println!();
    print_overview(&profile);
    println!();
    print_columns(&profile);

    Ok(())
}
