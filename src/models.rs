use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;
use serde::{Deserialize, Serialize};

/// One trademark application as read from a filing source.
///
/// Mark text, classes and goods/services are always present (possibly empty) so
/// scoring never has to deal with absent fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilingRecord {
    pub serial_number: String,
    #[serde(default)]
    pub mark_text: String,
    #[serde(default)]
    pub filing_date: Option<String>,
    #[serde(default)]
    pub classes: BTreeSet<u32>,
    #[serde(default)]
    pub goods_services: String,
    #[serde(default)]
    pub applicant_name: Option<String>,
}

/// A mark being defended, compiled from configuration.
#[derive(Debug, Clone)]
pub struct ProtectedMark {
    pub name: String,
    /// `name` run through [`normalize`](crate::similarity::normalize::normalize).
    pub normalized: String,
    pub serial_numbers: Vec<String>,
    pub classes: BTreeSet<u32>,
    pub patterns: Vec<Regex>,
}

/// Similarity primitives, in the order the combiner runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    Exact,
    Prefix,
    Suffix,
    Contains,
    EditDistance,
    Phonetic,
    Pattern,
    Variation,
}

impl Method {
    pub const ALL: [Method; 8] = [
        Method::Exact,
        Method::Prefix,
        Method::Suffix,
        Method::Contains,
        Method::EditDistance,
        Method::Phonetic,
        Method::Pattern,
        Method::Variation,
    ];
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Exact => write!(f, "exact"),
            Method::Prefix => write!(f, "prefix"),
            Method::Suffix => write!(f, "suffix"),
            Method::Contains => write!(f, "contains"),
            Method::EditDistance => write!(f, "edit distance"),
            Method::Phonetic => write!(f, "phonetic"),
            Method::Pattern => write!(f, "pattern"),
            Method::Variation => write!(f, "variation"),
        }
    }
}

/// Per-method scores for one (filing, protected mark) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityResult {
    pub method_scores: BTreeMap<Method, f64>,
    /// Maximum over `method_scores`.
    pub score: f64,
    /// Method that produced `score`; `None` when nothing scored.
    pub best_method: Option<Method>,
}

/// Commercial-context score for a filing against one protected mark.
#[derive(Debug, Clone, PartialEq)]
pub struct Relevance {
    pub score: f64,
    pub matched_classes: BTreeSet<u32>,
    pub matched_keywords: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "Low"),
            Severity::Medium => write!(f, "Medium"),
            Severity::High => write!(f, "High"),
        }
    }
}

/// Downstream review state of a flagged conflict. Findings are created as `New`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    #[default]
    New,
    Reviewed,
    Dismissed,
    ActionTaken,
}

/// A detected potential conflict between a filing and a protected mark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictFinding {
    pub filing: FilingRecord,
    pub protected_mark: String,
    pub mark_score: f64,
    pub relevance_score: f64,
    pub final_score: f64,
    pub severity: Severity,
    pub best_method: Option<Method>,
    pub method_scores: BTreeMap<Method, f64>,
    #[serde(default)]
    pub matched_classes: BTreeSet<u32>,
    #[serde(default)]
    pub matched_keywords: Vec<String>,
    #[serde(default)]
    pub status: ReviewStatus,
}

/// Phases of a scan run. Runs move through them strictly in order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanPhase {
    #[default]
    Start,
    Fetching,
    Classifying,
    Deduplicating,
    Complete,
}

impl std::fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanPhase::Start => write!(f, "start"),
            ScanPhase::Fetching => write!(f, "fetching"),
            ScanPhase::Classifying => write!(f, "classifying"),
            ScanPhase::Deduplicating => write!(f, "deduplicating"),
            ScanPhase::Complete => write!(f, "complete"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub phase: ScanPhase,
    pub filings_fetched: usize,
    /// Already seen in the store, or repeated within the run.
    pub filings_skipped: usize,
    pub filings_classified: usize,
    pub findings: usize,
    /// Input files skipped because they could not be parsed.
    pub files_rejected: usize,
}
