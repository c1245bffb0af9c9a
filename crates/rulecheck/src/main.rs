//! `rulecheck` -- offline checker for dependency-tracker rule drafts.
//!
//! Validates rule drafts saved as JSON (the same shape the rules API
//! accepts), merges saved API error responses into the report, and filters
//! dependency lists.
//!
//! # Environment variables
//!
//! | Variable                      | Required | Default  | Description                                |
//! |-------------------------------|----------|----------|--------------------------------------------|
//! | `RULECHECK_UNTOUCHED_TARGETS` | no       | `reject` | `reject` or `defer` drafts with no target  |
//! | `RULECHECK_OUTPUT`            | no       | `text`   | `text` or `json` report output             |
//! | `RUST_LOG`                    | no       | `deptrack_rulecheck=info` | Log filter                    |

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use deptrack_rulecheck::commands;
use deptrack_rulecheck::config::RuleCheckConfig;
use deptrack_rulecheck::report::{render_filter, render_reports};

#[derive(Parser)]
#[command(name = "rulecheck", version, about = "Check dependency-tracker rule drafts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate one or more rule draft files.
    Validate {
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },
    /// Validate a draft and merge a saved API error response into the report.
    Merge {
        #[arg(value_name = "DRAFT")]
        draft: PathBuf,
        #[arg(value_name = "RESPONSE")]
        response: PathBuf,
    },
    /// Print the dependencies in a JSON list that match a fuzzy query.
    Filter {
        /// Whitespace-separated terms; all must match.
        #[arg(long, short, default_value = "")]
        query: String,
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "deptrack_rulecheck=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "rulecheck failed");
            ExitCode::FAILURE
        }
    }
}

/// Run the selected subcommand. `Ok(false)` means the command ran but found
/// problems.
fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = RuleCheckConfig::from_env()?;
    tracing::debug!(
        untouched_targets = config.validator.untouched_targets.as_str(),
        output = ?config.output,
        "Loaded configuration",
    );

    match cli.command {
        Command::Validate { files } => {
            let reports = commands::run_validate(&files, &config);
            print!("{}", render_reports(&reports, config.output)?);
            Ok(reports.iter().all(|r| r.is_valid()))
        }
        Command::Merge { draft, response } => {
            let report = commands::run_merge(&draft, &response, &config)?;
            print!("{}", render_reports(std::slice::from_ref(&report), config.output)?);
            Ok(report.is_valid())
        }
        Command::Filter { query, file } => {
            let report = commands::run_filter(&file, &query)?;
            print!("{}", render_filter(&report, config.output)?);
            Ok(true)
        }
    }
}
