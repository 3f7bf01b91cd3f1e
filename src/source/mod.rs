//! Filing sources feeding a scan.
//!
//! - [`xml`] — USPTO trademark daily XML (`case-file` elements) read from disk.

use crate::error::SourceError;
use crate::models::FilingRecord;

pub mod xml;

/// A lazy, finite sequence of filings.
pub trait FilingSource {
    /// Next filing, or `Ok(None)` once the source is exhausted.
    fn next_filing(&mut self) -> Result<Option<FilingRecord>, SourceError>;

    /// Input files skipped so far because they could not be parsed.
    fn rejected_files(&self) -> usize {
        0
    }
}
