//! Show command - display a saved report.

use std::path::PathBuf;

use colored::Colorize;
use dataward::{AssessmentOutcome, Report};

use super::{print_columns, print_overview};

pub fn run(file: PathBuf, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("Report not found: {}", file.display()).into());
    }

    let report = Report::load(&file)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let name = report.dataset.name.as_deref().unwrap_or(&report.dataset.id);
    println!("{} {}", "Report for".cyan().bold(), name.white());
    println!(
        "Created: {}",
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!();
    print_overview(&report.profile);
    println!();
    print_columns(&report.profile);
    println!();
    print_assessment(&report);

    Ok(())
}

/// Print the assessment section of a report.
pub fn print_assessment(report: &Report) {
    println!("{}", "Assessment:".yellow().bold());

    match &report.assessment {
        AssessmentOutcome::Attached { assessment } => {
            let score = format!("{}/10", assessment.quality_score);
            let score = match assessment.quality_score {
                8..=10 => score.green().bold(),
                5..=7 => score.yellow().bold(),
                _ => score.red().bold(),
            };
            println!("  Quality score: {}", score);
            println!("  {}", assessment.summary);
            if !assessment.recommendations.is_empty() {
                println!();
                println!("  {}", "Recommendations:".bold());
                for (i, rec) in assessment.recommendations.iter().enumerate() {
                    println!("  {}. {}", i + 1, rec);
                }
            }
        }
        AssessmentOutcome::Failed {
            kind,
            message,
            attempts,
        } => {
            println!(
                "  {} after {} attempt(s) ({:?})",
                "Failed".red().bold(),
                attempts,
                kind
            );
            println!("  {}", message.dimmed());
        }
        AssessmentOutcome::NotAttempted => {
            println!("  {}", "Not attempted (profile only)".dimmed());
        }
    }
}
