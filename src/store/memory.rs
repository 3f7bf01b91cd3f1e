use std::collections::HashSet;

use crate::error::StoreError;
use crate::models::ConflictFinding;

/// In-memory store. Dedup only holds within one process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    seen: HashSet<String>,
    conflicts: Vec<ConflictFinding>,
    conflict_keys: HashSet<(String, String)>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn conflicts(&self) -> &[ConflictFinding] {
        &self.conflicts
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}

impl super::PersistenceStore for MemoryStore {
    fn is_seen(&self, serial_number: &str) -> Result<bool, StoreError> {
        Ok(self.seen.contains(serial_number))
    }

    fn mark_seen(&mut self, serial_number: &str) -> Result<(), StoreError> {
        self.seen.insert(serial_number.to_string());
        Ok(())
    }

    fn record_conflict(&mut self, finding: &ConflictFinding) -> Result<(), StoreError> {
        if self.conflict_keys.insert(super::conflict_key(finding)) {
            self.conflicts.push(finding.clone());
        }
        Ok(())
    }
}
