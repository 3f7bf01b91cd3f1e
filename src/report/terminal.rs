use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::models::{ConflictFinding, Method, Severity};
use crate::scan::ScanOutcome;

/// Render a colored terminal report.
pub fn render(outcome: &ScanOutcome, verbose: bool, quiet: bool) -> Result<()> {
    let summary = &outcome.summary;
    let findings = &outcome.findings;
    let count = |severity: Severity| findings.iter().filter(|f| f.severity == severity).count();
    let (high, medium, low) = (count(Severity::High), count(Severity::Medium), count(Severity::Low));

    if quiet {
        println!(
            "Filings: {}  Findings: {}  High: {}  Medium: {}  Low: {}",
            summary.filings_classified,
            findings.len(),
            high.to_string().red(),
            medium.to_string().yellow(),
            low.to_string().cyan(),
        );
        return Ok(());
    }

    println!("\n {} v{}\n", "markwatch".bold(), env!("CARGO_PKG_VERSION"));

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(
        " │  {:<48} │",
        format!("Filings fetched    : {:>5}", summary.filings_fetched)
    );
    println!(
        " │  {:<48} │",
        format!("Already seen       : {:>5}", summary.filings_skipped)
    );
    println!(
        " │  {:<48} │",
        format!("Classified         : {:>5}", summary.filings_classified)
    );
    if summary.files_rejected > 0 {
        println!(
            " │  {:<48} │",
            format!("Files rejected     : {:>5}", summary.files_rejected)
        );
    }
    println!(
        " │  {:<48} │",
        format!("{}  High           : {:>5}  {}", "✗".red(), high, top_marks(findings, Severity::High))
    );
    println!(
        " │  {:<48} │",
        format!("{}  Medium         : {:>5}  {}", "⚠".yellow(), medium, top_marks(findings, Severity::Medium))
    );
    println!(
        " │  {:<48} │",
        format!("{}  Low            : {:>5}  {}", "•".cyan(), low, top_marks(findings, Severity::Low))
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    if findings.is_empty() {
        println!(" {} No potential conflicts found.\n", "✓".green().bold());
        return Ok(());
    }

    for (severity, label, heading) in [
        (Severity::High, "[HIGH]".red().bold(), "Likely conflicts:"),
        (Severity::Medium, "[MEDIUM]".yellow().bold(), "Possible conflicts:"),
        (Severity::Low, "[LOW]".cyan().bold(), "Weak similarities:"),
    ] {
        if count(severity) > 0 {
            println!(" {} {}\n", label, heading);
            render_table(findings, severity, verbose);
            println!();
        }
    }

    Ok(())
}

fn render_table(findings: &[ConflictFinding], severity: Severity, verbose: bool) {
    let mut header = vec![
        Cell::new("Serial").add_attribute(Attribute::Bold),
        Cell::new("Mark").add_attribute(Attribute::Bold),
        Cell::new("Matches").add_attribute(Attribute::Bold),
        Cell::new("Score").add_attribute(Attribute::Bold),
        Cell::new("Signal").add_attribute(Attribute::Bold),
        Cell::new("Classes").add_attribute(Attribute::Bold),
        Cell::new("Applicant").add_attribute(Attribute::Bold),
    ];
    if verbose {
        header.push(Cell::new("Breakdown").add_attribute(Attribute::Bold));
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);

    let color = match severity {
        Severity::High => Color::Red,
        Severity::Medium => Color::Yellow,
        Severity::Low => Color::Cyan,
    };

    for finding in findings.iter().filter(|f| f.severity == severity) {
        let classes = finding
            .filing
            .classes
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let signal = finding
            .best_method
            .map(|m| m.to_string())
            .unwrap_or_else(|| "-".to_string());

        let mut row = vec![
            Cell::new(&finding.filing.serial_number),
            Cell::new(&finding.filing.mark_text),
            Cell::new(&finding.protected_mark),
            Cell::new(format!("{:.1}", finding.final_score))
                .fg(color)
                .set_alignment(CellAlignment::Right),
            Cell::new(signal),
            Cell::new(classes),
            Cell::new(finding.filing.applicant_name.as_deref().unwrap_or("unknown")),
        ];
        if verbose {
            row.push(Cell::new(breakdown(finding)));
        }
        table.add_row(row);
    }

    println!("{}", table);
}

/// Non-zero method scores plus the relevance inputs, one per line.
fn breakdown(finding: &ConflictFinding) -> String {
    let mut lines: Vec<String> = Method::ALL
        .iter()
        .filter_map(|m| {
            finding
                .method_scores
                .get(m)
                .filter(|score| **score > 0.0)
                .map(|score| format!("{m}: {score:.1}"))
        })
        .collect();
    lines.push(format!(
        "mark {:.1} / relevance {:.1}",
        finding.mark_score, finding.relevance_score
    ));
    if !finding.matched_keywords.is_empty() {
        lines.push(format!("keywords: {}", finding.matched_keywords.join(", ")));
    }
    lines.join("\n")
}

/// The protected marks hit most often at this severity, e.g. `[TOPO (3)]`.
fn top_marks(findings: &[ConflictFinding], severity: Severity) -> String {
    let mut counts: std::collections::BTreeMap<&str, usize> = std::collections::BTreeMap::new();
    for finding in findings.iter().filter(|f| f.severity == severity) {
        *counts.entry(finding.protected_mark.as_str()).or_insert(0) += 1;
    }

    let mut pairs: Vec<(&str, usize)> = counts.into_iter().collect();
    pairs.sort_by(|a, b| b.1.cmp(&a.1));

    let summary: Vec<String> = pairs
        .iter()
        .take(3)
        .map(|(mark, cnt)| format!("{} ({})", mark, cnt))
        .collect();

    if summary.is_empty() {
        String::new()
    } else {
        format!("[{}]", summary.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FilingRecord, ReviewStatus};

    fn finding(mark: &str, severity: Severity) -> ConflictFinding {
        ConflictFinding {
            filing: FilingRecord {
                serial_number: "97000002".to_string(),
                mark_text: "TOPOCORP".to_string(),
                ..FilingRecord::default()
            },
            protected_mark: mark.to_string(),
            mark_score: 85.0,
            relevance_score: 70.0,
            final_score: 80.5,
            severity,
            best_method: Some(Method::Prefix),
            method_scores: [(Method::Prefix, 85.0), (Method::Contains, 70.0), (Method::Exact, 0.0)]
                .into_iter()
                .collect(),
            matched_classes: Default::default(),
            matched_keywords: vec!["mobile".to_string(), "app".to_string()],
            status: ReviewStatus::New,
        }
    }

    #[test]
    fn test_top_marks() {
        let findings = vec![
            finding("TOPO", Severity::Medium),
            finding("TOPOLOGY", Severity::Medium),
            finding("TOPO", Severity::Medium),
            finding("TOPO", Severity::High),
        ];
        assert_eq!(top_marks(&findings, Severity::Medium), "[TOPO (2), TOPOLOGY (1)]");
        assert_eq!(top_marks(&findings, Severity::Low), "");
    }

    #[test]
    fn test_breakdown_lists_firing_methods_only() {
        let text = breakdown(&finding("TOPO", Severity::Medium));
        assert_eq!(
            text,
            "prefix: 85.0\ncontains: 70.0\nmark 85.0 / relevance 70.0\nkeywords: mobile, app"
        );
    }
}
