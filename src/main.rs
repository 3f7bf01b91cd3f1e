//! `markwatch` — flag trademark filings that may conflict with protected marks.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load the watchlist config ([`config::load_config`]).
//! 3. Validate it into a scanner ([`scan::Scanner::new`]); a bad watchlist stops here.
//! 4. Open the filing source ([`source`]) and the persistence store ([`store`]).
//! 5. Scan: every unseen filing × every protected mark goes through the
//!    [`classifier`], which blends [`similarity`] and [`relevance`] scores.
//! 6. Render the requested report ([`report`]).
//! 7. Exit `1` when `--fail-on` is set and a finding reaches that severity.

mod classifier;
mod cli;
mod config;
mod error;
mod models;
mod relevance;
mod report;
mod scan;
mod similarity;
mod source;
mod store;

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use cli::{Cli, ReportFormat};
use config::load_config;
use models::Severity;
use scan::{ScanOptions, Scanner};
use source::xml::XmlFilingSource;
use store::json::JsonFileStore;
use store::memory::MemoryStore;
use store::PersistenceStore;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(min_score) = cli.min_score {
        config.scoring.min_score = min_score;
    }

    let mut scanner = Scanner::new(&config)?;
    let mut source = XmlFilingSource::from_paths(&cli.inputs)?;

    let store_path = cli.store.clone().or_else(|| config.store_path.clone());
    let mut store: Box<dyn PersistenceStore> = match &store_path {
        Some(path) => Box::new(JsonFileStore::open(path)?),
        None => {
            warn!("no store configured; filings will be re-flagged on the next run");
            Box::new(MemoryStore::default())
        }
    };

    let options = ScanOptions {
        max_filings: cli.max_filings,
        record: !cli.dry_run,
        progress: progress_bar(cli.quiet || cli.report == ReportFormat::Json)?,
    };

    let outcome = scanner.run(&mut source, store.as_mut(), &options)?;

    match cli.report {
        ReportFormat::Terminal => report::terminal::render(&outcome, cli.verbose, cli.quiet)?,
        ReportFormat::Json => report::json::render(&outcome)?,
    }

    if let Some(fail_on) = cli.fail_on {
        let threshold = Severity::from(fail_on);
        if outcome.findings.iter().any(|f| f.severity >= threshold) {
            std::process::exit(1);
        }
    }

    Ok(())
}

/// Log to stderr. `RUST_LOG` wins over the `-v` / `-q` defaults.
fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if quiet {
        "markwatch=error"
    } else if verbose {
        "markwatch=debug"
    } else {
        "markwatch=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn progress_bar(hidden: bool) -> Result<ProgressBar> {
    if hidden {
        return Ok(ProgressBar::hidden());
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {pos} filings classified {msg}")?,
    );
    Ok(pb)
}
