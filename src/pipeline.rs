//! The ingestion run.
//!
//! For each page index `0..pages` the pipeline fetches the listing page,
//! extracts stubs through the [`SiteAdapter`], then fetches each stub's
//! detail page and assembles a [`Record`]. Everything is strictly sequential:
//! one request at a time, never overlapped.
//!
//! Nothing that happens while scraping stops the run:
//! - listing page unreachable or without a content region: page skipped
//! - listing item missing a field: item skipped
//! - detail page unreachable: record kept with an empty body
//!
//! Only the persistence step can fail a run (see [`IngestionPipeline::run_into`]).

use crate::error::{FetchError, PersistenceError};
use crate::fetch::PageFetcher;
use crate::models::{ArticleStub, BatchOutcome, Record};
use crate::scrapers::{ListingPage, SiteAdapter};
use crate::store::{ArticleStore, PersistMode, persist_records};
use crate::utils::truncate_for_log;
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// Counters describing what happened during a scrape.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub pages_attempted: usize,
    pub pages_failed: usize,
    pub stubs_seen: usize,
    pub items_skipped: usize,
    /// Stubs whose link was already collected earlier in the run.
    pub duplicate_links: usize,
    pub detail_failures: usize,
    pub empty_bodies: usize,
}

/// The run-scoped batch plus its report.
#[derive(Debug, Default, Clone)]
pub struct Harvest {
    pub records: Vec<Record>,
    pub report: RunReport,
}

/// Drives pagination, listing parsing and detail fetching for one site.
#[derive(Debug)]
pub struct IngestionPipeline<F, A> {
    fetcher: F,
    adapter: A,
    pages: usize,
}

impl<F, A> IngestionPipeline<F, A>
where
    F: PageFetcher,
    A: SiteAdapter,
{
    /// Scrape listing pages `0..pages`.
    pub fn new(fetcher: F, adapter: A, pages: usize) -> Self {
        Self {
            fetcher,
            adapter,
            pages,
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Scrape every page and return the accumulated batch. Never fails.
    #[instrument(level = "info", skip(self), fields(pages = self.pages))]
    pub async fn run(&self) -> Harvest {
        let started = Instant::now();
        let mut harvest = Harvest::default();
        let mut seen: HashSet<String> = HashSet::new();

        for page in 0..self.pages {
            harvest.report.pages_attempted += 1;
            let Some(listing) = self.fetch_listing(page).await else {
                harvest.report.pages_failed += 1;
                continue;
            };
            harvest.report.stubs_seen += listing.stubs.len();
            harvest.report.items_skipped += listing.skipped;

            for stub in listing.stubs {
                if !seen.insert(stub.link.clone()) {
                    debug!(link = %stub.link, "Link already collected this run");
                    harvest.report.duplicate_links += 1;
                    continue;
                }
                let record = self.assemble(stub, &mut harvest.report).await;
                harvest.records.push(record);
            }
            info!(page, collected = harvest.records.len(), "Finished scraping page");
        }

        let report = &harvest.report;
        info!(
            pages_attempted = report.pages_attempted,
            pages_failed = report.pages_failed,
            stubs_seen = report.stubs_seen,
            items_skipped = report.items_skipped,
            duplicate_links = report.duplicate_links,
            detail_failures = report.detail_failures,
            empty_bodies = report.empty_bodies,
            records = harvest.records.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Scrape complete"
        );
        harvest
    }

    /// Ensure the schema, scrape, and persist the batch into `store`.
    ///
    /// The schema is checked before any page is fetched so a bad database
    /// fails fast. Persistence errors are the only errors returned.
    pub async fn run_into<S: ArticleStore>(
        &self,
        store: &S,
        mode: PersistMode,
    ) -> Result<(RunReport, BatchOutcome), PersistenceError> {
        store.ensure_schema().await?;
        let harvest = self.run().await;
        if harvest.records.is_empty() {
            warn!("No articles collected; nothing to persist");
            return Ok((harvest.report, BatchOutcome::default()));
        }
        info!(count = harvest.records.len(), "Scraped articles");
        let outcome = persist_records(store, &harvest.records, mode).await?;
        Ok((harvest.report, outcome))
    }

    /// Fetch a detail page and extract its body text.
    ///
    /// A page without a body container yields `Ok("")`.
    #[instrument(level = "info", skip(self))]
    pub async fn fetch_detail(&self, link: &str) -> Result<String, FetchError> {
        let document = self.fetcher.fetch(link).await?;
        Ok(self.adapter.parse_detail(&document))
    }

    #[instrument(level = "info", skip(self), fields(url = tracing::field::Empty))]
    async fn fetch_listing(&self, page: usize) -> Option<ListingPage> {
        let url = self.adapter.listing_url(page);
        tracing::Span::current().record("url", url.as_str());
        info!("Scraping listing page");

        let document = match self.fetcher.fetch(&url).await {
            Ok(document) => document,
            Err(e) => {
                error!(page, %url, error = %e, "Failed to fetch listing page; skipping");
                return None;
            }
        };

        match self.adapter.parse_listing(&document) {
            Ok(listing) => {
                debug!(page, stubs = listing.stubs.len(), skipped = listing.skipped, "Parsed listing page");
                Some(listing)
            }
            Err(e) => {
                error!(page, %url, error = %e, "Unexpected listing structure; skipping page");
                None
            }
        }
    }

    async fn assemble(&self, stub: ArticleStub, report: &mut RunReport) -> Record {
        info!(title = %stub.title, "Parsing article");
        let body = match self.fetch_detail(&stub.link).await {
            Ok(body) => body,
            Err(e) => {
                error!(link = %stub.link, title = %stub.title, error = %e, "Failed to fetch article page");
                report.detail_failures += 1;
                String::new()
            }
        };
        if body.is_empty() {
            warn!(link = %stub.link, "Article text not found");
            report.empty_bodies += 1;
        } else {
            debug!(bytes = body.len(), preview = %truncate_for_log(&body, 120), "Parsed article body");
        }
        Record::from_stub(stub, body)
    }
}
