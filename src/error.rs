//! Error taxonomy for a scan run.
//!
//! Configuration defects surface once, before any filing is read. Failures of the
//! filing source or the persistence store are passed through untouched so the
//! caller can tell them apart. Malformed filings are not errors at all: they just
//! score low.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no protected marks configured")]
    NoProtectedMarks,

    #[error("protected mark {0:?} is empty after normalization")]
    EmptyMarkName(String),

    #[error("invalid watch pattern {pattern:?} for mark {mark}: {source}")]
    InvalidPattern {
        mark: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("priority keyword {keyword:?} cannot be matched: {source}")]
    InvalidKeyword {
        keyword: String,
        #[source]
        source: regex::Error,
    },

    #[error("{field} must be within 0..=100, got {value}")]
    ScoreOutOfRange { field: &'static str, value: f64 },

    #[error("blend weights must be non-negative and sum to 1 (mark {mark}, relevance {relevance})")]
    InvalidWeights { mark: f64, relevance: f64 },

    #[error("severity bounds must satisfy min_score <= medium <= high (got {min_score}, {medium}, {high})")]
    SeverityOrder { min_score: f64, medium: f64, high: f64 },
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("store file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Everything that can stop a scan run.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("filing source error: {0}")]
    Source(#[from] SourceError),

    #[error("persistence store error: {0}")]
    Store(#[from] StoreError),
}
