//! Prompt command - print the assessment prompt for a data file.

use std::path::PathBuf;

use dataward::llm::PromptTemplate;
use dataward::{Pipeline, PromptBuilder};

use super::load_table;

pub fn run(file: PathBuf, language: String) -> Result<(), Box<dyn std::error::Error>> {
    let (table, _) = load_table(&file)?;
    let profile = Pipeline::new().profile_only(&table)?;

    let prompt = PromptBuilder::with_template(PromptTemplate::with_language(language)).build(&profile);
    println!("{}", prompt.text);

    Ok(())
}
