//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// DataWard: dataset profiling with LLM quality assessment
#[derive(Parser)]
#[command(name = "dataward")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Profile a data file without contacting a language model
    Profile {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the assessment prompt that would be sent for a data file
    Prompt {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Language the model is asked to answer in
        #[arg(long, default_value = "English")]
        language: String,
    },

    /// Profile a data file, assess it and save the report
    Analyze {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path for the report (default: <file>.report.json)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// LLM provider to use for the assessment
        #[arg(long, default_value = "ollama")]
        llm: LlmProviderChoice,

        /// Model to use (e.g., "llama3", "mistral")
        #[arg(long)]
        model: Option<String>,

        /// Base URL of the Ollama-compatible service
        #[arg(long)]
        host: Option<String>,

        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Language the model is asked to answer in
        #[arg(long, default_value = "English")]
        language: String,

        /// Retries after a retryable assessment failure
        #[arg(long, default_value = "1")]
        retries: u32,

        /// Use the chat endpoint instead of generate
        #[arg(long)]
        chat: bool,
    },

    /// Show a saved report
    Show {
        /// Path to a report file
        #[arg(value_name = "REPORT")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// LLM provider choice for the assessment stage
#[derive(Clone, Debug, Default, PartialEq)]
pub enum LlmProviderChoice {
    /// No LLM - profile only
    None,
    /// Ollama-compatible service (requires the service running)
    #[default]
    Ollama,
    /// Mock provider for testing
    Mock,
}

impl std::str::FromStr for LlmProviderChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(LlmProviderChoice::None),
            "ollama" | "local" => Ok(LlmProviderChoice::Ollama),
            "mock" | "test" => Ok(LlmProviderChoice::Mock),
            _ => Err(format!("Unknown provider: {}. Use: none, ollama, or mock.", s)),
        }
    }
}

impl std::fmt::Display for LlmProviderChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmProviderChoice::None => write!(f, "none"),
            LlmProviderChoice::Ollama => write!(f, "ollama"),
            LlmProviderChoice::Mock => write!(f, "mock"),
        }
    }
}
