//! Analyze command - profile a data file, assess it and save the report.

use std::path::PathBuf;
use std::time::Duration;

use colored::Colorize;
use dataward::llm::{ApiStyle, OllamaProvider, PromptTemplate};
use dataward::{DatasetRef, LlmConfig, MockProvider, Pipeline, PipelineConfig, RetryPolicy};

use super::show::print_assessment;
use super::{load_table, print_columns, print_overview};
use crate::cli::LlmProviderChoice;

/// Flags of the `analyze` subcommand.
pub struct AnalyzeOptions {
    pub output: Option<PathBuf>,
    pub llm: LlmProviderChoice,
    pub model: Option<String>,
    pub host: Option<String>,
    pub timeout: Option<u64>,
    pub language: String,
    pub retries: u32,
    pub chat: bool,
}

impl AnalyzeOptions {
    /// Environment settings with command-line flags applied on top.
    fn llm_config(&self) -> dataward::Result<LlmConfig> {
        let mut config = LlmConfig::from_env()?;
        if let Some(host) = &self.host {
            config = config.with_base_url(host);
        }
        if let Some(model) = &self.model {
            config = config.with_model(model);
        }
        if let Some(secs) = self.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if self.chat {
            config = config.with_api(ApiStyle::Chat);
        }
        Ok(config)
    }
}

pub async fn run(
    file: PathBuf,
    options: AnalyzeOptions,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (table, source) = load_table(&file)?;

    println!(
        "{} {}",
        "Analyzing".cyan().bold(),
        file.display().to_string().white()
    );

    let config = PipelineConfig {
        prompt: PromptTemplate::with_language(options.language.clone()),
        retry: RetryPolicy {
            max_retries: options.retries,
            ..RetryPolicy::default()
        },
    };
    let mut pipeline = Pipeline::with_config(config);

    match options.llm {
        LlmProviderChoice::None => {}
        LlmProviderChoice::Mock => pipeline = pipeline.with_llm(MockProvider::new()),
        LlmProviderChoice::Ollama => {
            let llm = options.llm_config()?;
            if verbose {
                println!("Using model {} at {}", llm.model.white(), llm.endpoint().white());
            }
            pipeline = pipeline.with_llm(OllamaProvider::with_config(llm)?);
        }
    }

    let dataset = DatasetRef::new(&source.hash).with_name(&source.file);
    let report = pipeline.run(dataset, &table).await?;

    println!();
    print_overview(&report.profile);
    if verbose {
        println!();
        print_columns(&report.profile);
    }
    println!();
    print_assessment(&report);

    let output_path = options.output.unwrap_or_else(|| {
        let mut p = file.clone();
        let stem = p.file_stem().unwrap_or_default().to_string_lossy();
        p.set_file_name(format!("{}.report.json", stem));
        p
    });

    report.save(&output_path)?;

    println!();
    println!(
        "{} {}",
        "Saved to".green().bold(),
        output_path.display().to_string().white()
    );

    Ok(())
}
