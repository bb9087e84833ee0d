//! DataWard CLI - dataset profiling with LLM quality assessment.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Profile { file, json } => commands::profile::run(file, json, cli.verbose),

        Commands::Prompt { file, language } => commands::prompt::run(file, language),

        Commands::Analyze {
            file,
            output,
            llm,
            model,
            host,
            timeout,
            language,
            retries,
            chat,
        } => {
            let options = commands::analyze::AnalyzeOptions {
                output,
                llm,
                model,
                host,
                timeout,
                language,
                retries,
                chat,
            };
            commands::analyze::run(file, options, cli.verbose).await
        }

        Commands::Show { file, json } => commands::show::run(file, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr so command output stays machine-readable. `RUST_LOG` wins.
fn init_logging(verbose: bool) {
    let default = if verbose {
        "dataward=debug,info,reqwest=warn,hyper=warn,hyper_util=warn"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
