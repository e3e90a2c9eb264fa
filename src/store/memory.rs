//! In-memory article store.
//!
//! Mirrors the table constraints of the Postgres store (non-empty link and
//! title, unique link) so dry runs and tests see the same accept/skip/reject
//! decisions.

use super::ArticleStore;
use crate::error::PersistenceError;
use crate::models::{BatchOutcome, Record};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, error, info, instrument};

/// A stored row: the auto-assigned id plus the record as first written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRow {
    pub id: i64,
    pub record: Record,
}

#[derive(Debug, Default, Clone)]
struct Table {
    rows: Vec<StoredRow>,
    next_id: i64,
}

impl Table {
    /// Apply the insert-if-absent rule. `Ok(false)` means the link was already present.
    fn insert(&mut self, record: &Record) -> Result<bool, PersistenceError> {
        if let Some(reason) = record.constraint_violation() {
            return Err(PersistenceError::Constraint {
                link: record.link.clone(),
                reason,
            });
        }
        if self.rows.iter().any(|row| row.record.link == record.link) {
            return Ok(false);
        }
        self.next_id += 1;
        self.rows.push(StoredRow {
            id: self.next_id,
            record: record.clone(),
        });
        Ok(true)
    }
}

/// Thread-safe in-memory store with the same semantics as the articles table.
#[derive(Debug, Default)]
pub struct MemoryStore {
    table: Mutex<Table>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Table> {
        // Batches are swapped in whole, so a poisoned table is still consistent.
        self.table.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Snapshot of all rows in insertion order.
    pub fn rows(&self) -> Vec<StoredRow> {
        self.lock().rows.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ArticleStore for MemoryStore {
    async fn ensure_schema(&self) -> Result<(), PersistenceError> {
        debug!("In-memory table ready");
        Ok(())
    }

    #[instrument(level = "debug", skip_all, fields(count = records.len()))]
    async fn insert_batch(&self, records: &[Record]) -> Result<BatchOutcome, PersistenceError> {
        let mut table = self.lock();
        let mut staged = table.clone();
        let mut outcome = BatchOutcome::default();

        for record in records {
            match staged.insert(record) {
                Ok(true) => outcome.inserted += 1,
                Ok(false) => outcome.skipped += 1,
                Err(e) => {
                    error!(title = %record.title, link = %record.link, error = %e, "Batch rejected; nothing written");
                    return Err(e);
                }
            }
        }

        *table = staged;
        info!(
            inserted = outcome.inserted,
            skipped = outcome.skipped,
            "Committed in-memory batch"
        );
        Ok(outcome)
    }

    async fn insert_one(&self, record: &Record) -> Result<bool, PersistenceError> {
        let inserted = self.lock().insert(record)?;
        debug!(title = %record.title, inserted, "Inserted article");
        Ok(inserted)
    }
}
