//! Site adapters.
//!
//! All knowledge of a site's markup lives behind [`SiteAdapter`]. When the
//! site changes its layout, a new adapter is written; the pipeline stays
//! the same.
//!
//! # Supported Sites
//!
//! | Site | Module | Listing | Detail body |
//! |------|--------|---------|-------------|
//! | NL Times | [`nltimes`] | `?page=N` on the front page | `div.field--name-body` paragraphs |

use crate::error::StructureError;
use crate::models::ArticleStub;
use scraper::Html;

pub mod nltimes;

/// Stubs extracted from one listing page.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListingPage {
    /// Items that had every required field.
    pub stubs: Vec<ArticleStub>,
    /// Items dropped because a required field was missing or malformed.
    pub skipped: usize,
}

/// Site-specific extraction rules.
pub trait SiteAdapter {
    /// URL of the listing page with the given zero-based index.
    fn listing_url(&self, page: usize) -> String;

    /// Extract article stubs from a listing document.
    ///
    /// Fails with [`StructureError`] only when the content region itself is
    /// absent. Broken individual items are logged and counted in
    /// [`ListingPage::skipped`].
    fn parse_listing(&self, document: &Html) -> Result<ListingPage, StructureError>;

    /// Extract body text from a detail document. Returns an empty string
    /// when the page has no body container.
    fn parse_detail(&self, document: &Html) -> String;
}
