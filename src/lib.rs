//! # nltimes_ingest
//!
//! Scrapes the paginated NL Times listing, follows every listed article to
//! its detail page, and stores the assembled articles in PostgreSQL keyed on
//! their link. Re-running is safe: links already stored are skipped and
//! never updated.
//!
//! ## Architecture
//!
//! 1. **Listing**: fetch `?page=0..N` and extract article stubs ([`scrapers`])
//! 2. **Detail**: fetch each stub's page and extract its body text ([`pipeline`])
//! 3. **Persist**: write the whole run in one transaction ([`store`])
//!
//! Fetching is sequential on purpose: one request at a time against the site.
//! Page and article failures are logged and skipped; only persistence
//! failures fail the run.

pub mod cli;
pub mod error;
pub mod fetch;
pub mod models;
pub mod pipeline;
pub mod scrapers;
pub mod store;
pub mod utils;
