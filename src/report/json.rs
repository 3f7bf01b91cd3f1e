use anyhow::Result;
use serde::Serialize;

use crate::models::{ConflictFinding, ScanSummary};
use crate::scan::ScanOutcome;

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: &'a ScanSummary,
    findings: &'a [ConflictFinding],
}

/// Pretty-printed JSON document for `outcome`.
pub fn to_json(outcome: &ScanOutcome) -> Result<String> {
    let report = JsonReport {
        summary: &outcome.summary,
        findings: &outcome.findings,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

pub fn render(outcome: &ScanOutcome) -> Result<()> {
    println!("{}", to_json(outcome)?);
    Ok(())
}
