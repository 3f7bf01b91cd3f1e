//! Persistence for scan results.
//!
//! The engine only needs key-existence checks on serial numbers plus somewhere to
//! put conflict rows, so stores sit behind [`PersistenceStore`]:
//!
//! - [`memory`] — process-local, nothing survives the run.
//! - [`json`] — a single JSON document on disk.

use crate::error::StoreError;
use crate::models::ConflictFinding;

pub mod json;
pub mod memory;

pub trait PersistenceStore {
    /// Whether a filing with this serial number was recorded by an earlier run.
    fn is_seen(&self, serial_number: &str) -> Result<bool, StoreError>;

    /// Record a serial number as processed. Recording it twice is a no-op.
    fn mark_seen(&mut self, serial_number: &str) -> Result<(), StoreError>;

    /// Store a conflict row. A second row for the same serial and protected mark is ignored.
    fn record_conflict(&mut self, finding: &ConflictFinding) -> Result<(), StoreError>;

    /// Make everything recorded so far durable.
    fn flush(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Conflict rows are unique per (serial number, protected mark).
fn conflict_key(finding: &ConflictFinding) -> (String, String) {
    (
        finding.filing.serial_number.clone(),
        finding.protected_mark.clone(),
    )
}
