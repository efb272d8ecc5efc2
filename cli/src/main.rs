//! jobmatch: match résumé PDFs against the job catalog from the command line.
//!
//! Logs go to stderr; stdout carries one JSON document per result.

mod report;
mod upload;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use jobmatch_matcher::{MatchEngine, MatcherConfig};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::report::{FailureReport, IndexReport, MatchReport};

#[derive(Parser)]
#[command(name = "jobmatch")]
#[command(author, version, about = "Semantic résumé-to-job matching")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match one or more CV files against the catalog
    Match {
        /// PDF files to match
        #[arg(required = true, num_args = 1..)]
        files: Vec<PathBuf>,

        /// Number of jobs to return per file (default from config)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Leave the debug trace out of the output
        #[arg(long)]
        no_debug: bool,
    },

    /// Fetch and embed the whole catalog, then print a summary
    Index {
        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine; the environment may already be set.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every requested operation succeeded.
async fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Commands::Match {
            files,
            top_k,
            config,
            no_debug,
        } => {
            let config = load_config(config.as_deref())?;
            let top_k = top_k.unwrap_or(config.query.top_k);
            let engine = MatchEngine::new(config).context("failed to set up the matcher")?;
            if !engine.is_provider_available() {
                bail!("OpenAI API key not configured; set OPENAI_API_KEY or add it to .env");
            }
            cmd_match(&engine, &files, top_k, !no_debug).await
        }
        Commands::Index { config } => {
            let engine = MatchEngine::new(load_config(config.as_deref())?)
                .context("failed to set up the matcher")?;
            let index = engine.warm().await.context("failed to build the job index")?;
            print_json(&IndexReport::from(index.as_ref()))?;
            Ok(true)
        }
    }
}

async fn cmd_match(
    engine: &MatchEngine,
    files: &[PathBuf],
    top_k: usize,
    include_debug: bool,
) -> Result<bool> {
    let mut all_ok = true;

    for path in files {
        let file = path.display().to_string();
        let outcome = match upload::read_pdf(path) {
            Ok(document) => engine
                .find_matches(document, top_k)
                .await
                .map_err(anyhow::Error::from),
            Err(err) => Err(err),
        };

        match outcome {
            Ok(outcome) => {
                info!("{file}: {} matches", outcome.result.len());
                print_json(&MatchReport::new(file, &outcome, include_debug))?;
            }
            Err(err) => {
                all_ok = false;
                error!("{file}: {err:#}");
                print_json(&FailureReport {
                    file,
                    error: format!("{err:#}"),
                })?;
            }
        }
    }

    Ok(all_ok)
}

fn load_config(path: Option<&Path>) -> Result<MatcherConfig> {
    let config = match path {
        Some(path) => MatcherConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => MatcherConfig::default(),
    };
    Ok(config.with_env_overrides())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let line = serde_json::to_string_pretty(value).context("failed to encode output")?;
    println!("{line}");
    Ok(())
}
