//! Idempotent article persistence.
//!
//! Every store keys rows on `link` and treats a second write of the same link
//! as a no-op: the stored row is never updated. Batch writes are
//! all-or-nothing.
//!
//! # Implementations
//!
//! - [`postgres::PgArticleStore`]: the production table, via `sqlx`
//! - [`memory::MemoryStore`]: same semantics in memory, for `--dry-run` and tests

use crate::error::PersistenceError;
use crate::models::{BatchOutcome, Record};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, instrument};

pub mod memory;
pub mod postgres;

/// Default table name.
pub const DEFAULT_TABLE: &str = "articles_nltimes";

static TABLE_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").unwrap());

/// Check that `name` can be spliced into SQL as a bare identifier.
pub fn validate_table_name(name: &str) -> Result<String, PersistenceError> {
    if TABLE_NAME.is_match(name) {
        Ok(name.to_string())
    } else {
        Err(PersistenceError::InvalidTableName(name.to_string()))
    }
}

/// A conflict-tolerant writer of [`Record`]s.
pub trait ArticleStore {
    /// Create the articles table if it does not exist. Safe to call repeatedly.
    async fn ensure_schema(&self) -> Result<(), PersistenceError>;

    /// Insert every record in one transaction, skipping links already stored.
    ///
    /// On any failure nothing from `records` is visible afterwards.
    async fn insert_batch(&self, records: &[Record]) -> Result<BatchOutcome, PersistenceError>;

    /// Insert a single record. Returns `false` when the link already existed.
    async fn insert_one(&self, record: &Record) -> Result<bool, PersistenceError>;
}

/// How a run hands its batch to the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PersistMode {
    /// One transaction for the whole run.
    #[default]
    Batch,
    /// One statement per record. Records written before a failure stay written.
    OneByOne,
}

/// Write `records` to `store` using `mode`.
#[instrument(level = "info", skip(store, records), fields(count = records.len()))]
pub async fn persist_records<S: ArticleStore>(
    store: &S,
    records: &[Record],
    mode: PersistMode,
) -> Result<BatchOutcome, PersistenceError> {
    let outcome = match mode {
        PersistMode::Batch => store.insert_batch(records).await?,
        PersistMode::OneByOne => {
            let mut outcome = BatchOutcome::default();
            for record in records {
                if store.insert_one(record).await? {
                    outcome.inserted += 1;
                } else {
                    outcome.skipped += 1;
                }
            }
            outcome
        }
    };
    info!(
        inserted = outcome.inserted,
        skipped = outcome.skipped,
        "Persisted articles"
    );
    Ok(outcome)
}
