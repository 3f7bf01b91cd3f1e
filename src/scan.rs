use std::collections::HashSet;

use indicatif::ProgressBar;
use tracing::{debug, info, warn};

use crate::classifier::classify;
use crate::config::{Config, Watchlist};
use crate::error::ScanError;
use crate::models::{ConflictFinding, ScanPhase, ScanSummary};
use crate::source::FilingSource;
use crate::store::PersistenceStore;

/// Per-run knobs that are not part of the watchlist.
pub struct ScanOptions {
    /// Stop pulling from the source after this many filings.
    pub max_filings: Option<usize>,
    /// Record seen filings and conflicts in the store. Off for dry runs.
    pub record: bool,
    pub progress: ProgressBar,
}

impl Default for ScanOptions {
    fn default() -> Self {
        ScanOptions {
            max_filings: None,
            record: true,
            progress: ProgressBar::hidden(),
        }
    }
}

/// Result of one completed scan run.
#[derive(Debug)]
pub struct ScanOutcome {
    /// Ordered by filing, then by protected mark in configuration order.
    pub findings: Vec<ConflictFinding>,
    pub summary: ScanSummary,
}

/// Drives one scan run: Start → Fetching → Classifying → Deduplicating → Complete.
pub struct Scanner {
    watchlist: Watchlist,
    phase: ScanPhase,
}

impl Scanner {
    /// Validate the configuration up front so a broken watchlist fails before
    /// any filing is read.
    pub fn new(config: &Config) -> Result<Self, ScanError> {
        let watchlist = Watchlist::from_config(config)?;
        info!(
            marks = watchlist.marks.len(),
            monitored_classes = ?watchlist.monitored_classes,
            "watchlist loaded"
        );
        Ok(Scanner {
            watchlist,
            phase: ScanPhase::Start,
        })
    }

    fn enter(&mut self, phase: ScanPhase) {
        debug!(from = %self.phase, to = %phase, "scan phase");
        self.phase = phase;
    }

    /// Run one scan.
    ///
    /// Filings already recorded in `store` (or repeated earlier in the same run)
    /// are skipped without being classified. Filings without a serial number are
    /// always classified and never recorded as seen. Source and store failures abort the
    /// run; findings are only written to the store once classification is done.
    pub fn run(
        &mut self,
        source: &mut dyn FilingSource,
        store: &mut dyn PersistenceStore,
        options: &ScanOptions,
    ) -> Result<ScanOutcome, ScanError> {
        self.phase = ScanPhase::Start;
        let mut summary = ScanSummary::default();

        self.enter(ScanPhase::Fetching);
        let mut filings = Vec::new();
        while options.max_filings.map_or(true, |max| filings.len() < max) {
            match source.next_filing()? {
                Some(filing) => filings.push(filing),
                None => break,
            }
        }
        summary.filings_fetched = filings.len();
        summary.files_rejected = source.rejected_files();
        info!(
            filings = filings.len(),
            files_rejected = summary.files_rejected,
            "fetched filings"
        );

        self.enter(ScanPhase::Classifying);
        let mut run_seen: HashSet<&str> = HashSet::new();
        let mut fresh: Vec<&str> = Vec::new();
        let mut findings = Vec::new();

        for filing in &filings {
            let serial = filing.serial_number.as_str();
            options.progress.inc(1);

            // No serial, no identity to deduplicate on.
            if serial.is_empty() {
                debug!(mark_text = %filing.mark_text, "filing without serial number");
            } else if !run_seen.insert(serial) || store.is_seen(serial)? {
                debug!(serial, "already seen, skipping");
                summary.filings_skipped += 1;
                continue;
            } else {
                fresh.push(serial);
            }
            summary.filings_classified += 1;

            for mark in &self.watchlist.marks {
                if let Some(finding) = classify(filing, mark, &self.watchlist) {
                    warn!(
                        serial,
                        mark_text = %filing.mark_text,
                        matched = %finding.protected_mark,
                        score = finding.final_score,
                        severity = %finding.severity,
                        "potential conflict"
                    );
                    findings.push(finding);
                }
            }
        }
        options.progress.finish_and_clear();

        self.enter(ScanPhase::Deduplicating);
        if options.record {
            for serial in &fresh {
                store.mark_seen(serial)?;
            }
            for finding in &findings {
                store.record_conflict(finding)?;
            }
            store.flush()?;
        } else {
            debug!("dry run, store left untouched");
        }

        self.enter(ScanPhase::Complete);
        summary.phase = ScanPhase::Complete;
        summary.findings = findings.len();
        info!(
            classified = summary.filings_classified,
            skipped = summary.filings_skipped,
            findings = summary.findings,
            "scan complete"
        );

        Ok(ScanOutcome { findings, summary })
    }
}
