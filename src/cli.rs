use std::path::PathBuf;

use clap::Parser;

use crate::models::Severity;

#[derive(Parser, Debug)]
#[command(
    name = "markwatch",
    about = "Score trademark filings against protected marks and flag likely conflicts",
    version
)]
pub struct Cli {
    /// USPTO trademark XML files, or directories of `.xml` files, to scan
    #[arg(required = true, value_name = "PATH")]
    pub inputs: Vec<PathBuf>,

    /// Watchlist config file [default: ./.markwatch/config.toml, fallback ~/.config/markwatch/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// JSON store of seen filings and flagged conflicts; without one, dedup only lasts for this run
    #[arg(long, value_name = "FILE")]
    pub store: Option<PathBuf>,

    /// Classify without recording anything in the store
    #[arg(long)]
    pub dry_run: bool,

    /// Stop after reading this many filings
    #[arg(long, value_name = "N")]
    pub max_filings: Option<usize>,

    /// Override the minimum final score for a finding
    #[arg(long, value_name = "SCORE")]
    pub min_score: Option<f64>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Exit with code 1 if any finding is at or above this severity
    #[arg(long, value_name = "SEVERITY")]
    pub fail_on: Option<SeverityArg>,

    /// Show the per-method score breakdown
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SeverityArg {
    High,
    Medium,
    Low,
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::High => Severity::High,
            SeverityArg::Medium => Severity::Medium,
            SeverityArg::Low => Severity::Low,
        }
    }
}
