//! Error taxonomy for the ingestion run.
//!
//! Three families matter to the pipeline:
//! - [`FetchError`]: a page could not be retrieved. Never fatal; the page or
//!   article is skipped and the run continues.
//! - [`StructureError`]: the markup did not contain what the site adapter
//!   expected. Downgraded to a page-level or item-level skip.
//! - [`PersistenceError`]: a write to the store failed. Fatal for the run and
//!   surfaced to the caller after rollback.

use thiserror::Error;

/// Transport-level failure while retrieving a document.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("no document available for {url}")]
    Missing { url: String },
}

/// The document did not have the shape the site adapter expects.
#[derive(Debug, Error)]
pub enum StructureError {
    #[error("content region `{expected}` not found (found {found} candidate(s))")]
    MissingRegion { expected: String, found: usize },
    #[error("required field `{field}` missing")]
    MissingField { field: &'static str },
    #[error("unparseable date {raw:?}: {reason}")]
    BadDate { raw: String, reason: String },
    #[error("unresolvable link {href:?}")]
    BadLink { href: String },
}

/// A store operation failed. Batch writes are rolled back before this is returned.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("could not connect to the database: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("schema setup for table {table} failed: {source}")]
    Schema {
        table: String,
        #[source]
        source: sqlx::Error,
    },
    #[error("insert of {link} failed: {source}")]
    Insert {
        link: String,
        #[source]
        source: sqlx::Error,
    },
    #[error("transaction failed: {0}")]
    Transaction(#[source] sqlx::Error),
    #[error("record {link:?} violates a table constraint: {reason}")]
    Constraint { link: String, reason: &'static str },
    #[error("invalid table name {0:?}")]
    InvalidTableName(String),
}

/// Bad command-line or environment configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base url {url}: {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unknown timezone {0:?}")]
    Timezone(String),
    #[error("invalid database url: {0}")]
    DatabaseUrl(#[source] sqlx::Error),
    #[error("no database configured: set DATABASE_URL or DB_HOST/DB_NAME/DB_USER")]
    NoDatabase,
    #[error("could not build http client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structure_error_messages_carry_context() {
        let e = StructureError::MissingRegion {
            expected: "div.view-content".to_string(),
            found: 1,
        };
        assert_eq!(
            e.to_string(),
            "content region `div.view-content` not found (found 1 candidate(s))"
        );

        let e = StructureError::MissingField { field: "date" };
        assert!(e.to_string().contains("`date`"));
    }

    #[test]
    fn test_constraint_error_names_link() {
        let e = PersistenceError::Constraint {
            link: "https://nltimes.nl/a".to_string(),
            reason: "title must not be empty",
        };
        assert!(e.to_string().contains("https://nltimes.nl/a"));
        assert!(e.to_string().contains("title must not be empty"));
    }
}
