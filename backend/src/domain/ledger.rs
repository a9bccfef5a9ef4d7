//! The authoritative loan ledger.
//!
//! [`Ledger`] keeps rows in insertion order together with an index from the
//! normalised copy identifier to the row position. Every mutation that changes
//! state bumps the version exactly once, whatever the number of rows touched.

use std::collections::HashMap;

use super::loan::{LedgerSnapshot, LoanPatch, LoanRow, LoanStatus};

/// A batch of records that passed validation as a whole.
///
/// Only the reconciler constructs batches, so holding one proves the records
/// satisfied every import rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedBatch {
    patches: Vec<LoanPatch>,
}

impl ValidatedBatch {
    pub(crate) fn new(patches: Vec<LoanPatch>) -> Self {
        Self { patches }
    }

    /// Number of records in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patches.len()
    }

    /// Whether the batch holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// The validated records in source order.
    #[must_use]
    pub fn patches(&self) -> &[LoanPatch] {
        &self.patches
    }
}

/// In-memory ledger keyed by normalised copy identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    version: u64,
    rows: Vec<LoanRow>,
    index: HashMap<String, usize>,
}

impl Ledger {
    /// Rebuild a ledger from a persisted snapshot.
    ///
    /// Should the snapshot hold two rows for the same copy, the later one
    /// replaces the earlier so the key stays unique.
    #[must_use]
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Self {
        let mut ledger = Self {
            version: snapshot.version,
            ..Self::default()
        };
        for row in snapshot.rows {
            let key = row.normalized_copy_uid().to_owned();
            match ledger.index.get(&key).and_then(|&at| ledger.rows.get_mut(at)) {
                Some(existing) => *existing = row,
                None => {
                    ledger.index.insert(key, ledger.rows.len());
                    ledger.rows.push(row);
                }
            }
        }
        ledger
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            version: self.version,
            rows: self.rows.clone(),
        }
    }

    /// Current version.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Rows in insertion order.
    #[must_use]
    pub fn rows(&self) -> &[LoanRow] {
        &self.rows
    }

    /// Row for a copy, looked up by its normalised identifier.
    #[must_use]
    pub fn get(&self, normalized_copy_uid: &str) -> Option<&LoanRow> {
        self.index
            .get(normalized_copy_uid)
            .and_then(|&position| self.rows.get(position))
    }

    /// Merge every record of `batch` into the ledger and bump the version.
    ///
    /// Existing copies are merged field by field; new copies are appended.
    /// Returns the new version.
    pub fn apply_upserts(&mut self, batch: ValidatedBatch) -> u64 {
        for patch in batch.patches {
            let key = patch.normalized_copy_uid();
            match self.index.get(&key).and_then(|&at| self.rows.get_mut(at)) {
                Some(existing) => existing.merge(patch),
                None => {
                    self.index.insert(key, self.rows.len());
                    self.rows.push(LoanRow::from_patch(patch));
                }
            }
        }
        self.version += 1;
        self.version
    }

    /// Set `status` on every row matching `predicate` whose status differs.
    ///
    /// Returns the normalised identifiers of the rows that changed. The
    /// version is bumped once when at least one row changed and left alone
    /// otherwise.
    pub fn set_status<F>(&mut self, predicate: F, status: LoanStatus) -> Vec<String>
    where
        F: Fn(&LoanRow) -> bool,
    {
        let mut changed = Vec::new();
        for row in &mut self.rows {
            if row.status() != status && predicate(row) {
                row.set_status(status);
                changed.push(row.normalized_copy_uid().to_owned());
            }
        }
        if !changed.is_empty() {
            self.version += 1;
        }
        changed
    }

    /// Drop every row and bump the version. Returns the new version.
    pub fn reset(&mut self) -> u64 {
        self.rows.clear();
        self.index.clear();
        self.version += 1;
        self.version
    }
}
