use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::models::ConflictFinding;

/// On-disk layout of the store file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    seen: BTreeSet<String>,
    #[serde(default)]
    conflicts: Vec<ConflictFinding>,
}

/// Store kept as one JSON document. Changes stay in memory until [`flush`].
///
/// [`flush`]: super::PersistenceStore::flush
pub struct JsonFileStore {
    path: PathBuf,
    data: StoreFile,
    /// (serial, mark) of every row in `data.conflicts`.
    conflict_keys: HashSet<(String, String)>,
    dirty: bool,
}

impl JsonFileStore {
    /// Open the store at `path`, starting empty if the file does not exist yet.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let data = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            StoreFile::default()
        };

        tracing::debug!(
            path = %path.display(),
            seen = data.seen.len(),
            conflicts = data.conflicts.len(),
            "opened store"
        );

        let conflict_keys = data.conflicts.iter().map(super::conflict_key).collect();

        Ok(JsonFileStore {
            path: path.to_path_buf(),
            data,
            conflict_keys,
            dirty: false,
        })
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl super::PersistenceStore for JsonFileStore {
    fn is_seen(&self, serial_number: &str) -> Result<bool, StoreError> {
        Ok(self.data.seen.contains(serial_number))
    }

    fn mark_seen(&mut self, serial_number: &str) -> Result<(), StoreError> {
        if self.data.seen.insert(serial_number.to_string()) {
            self.dirty = true;
        }
        Ok(())
    }

    fn record_conflict(&mut self, finding: &ConflictFinding) -> Result<(), StoreError> {
        if self.conflict_keys.insert(super::conflict_key(finding)) {
            self.data.conflicts.push(finding.clone());
            self.dirty = true;
        }
        Ok(())
    }

    /// Write to a sibling temp file, then rename over the store.
    fn flush(&mut self) -> Result<(), StoreError> {
        if !self.dirty {
            return Ok(());
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let content = serde_json::to_string_pretty(&self.data).map_err(|source| {
            StoreError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;

        self.dirty = false;
        tracing::debug!(path = %self.path.display(), "store flushed");
        Ok(())
    }
}
