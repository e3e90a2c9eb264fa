//! NL Times scraper.
//!
//! Listing pages are the front page with a `page` query parameter
//! (`https://nltimes.nl/?page=0`, `?page=1`, ...). The article cards live in
//! the second `div.view-content` on the page; the first one is a sidebar.
//!
//! Each card looks like:
//!
//! ```html
//! <div class="news-card col-lg-4 col-sm-6 col-xs-12">
//!   <div class="news-card__title"><a href="/2023/03/15/slug" hreflang="en">Headline</a></div>
//!   <div class="news-card__date">15 March 2023 - 10:30</div>
//!   <div class="news-card__categories"><a href="/politics" hreflang="en">Politics</a></div>
//! </div>
//! ```
//!
//! Article pages keep the text in
//! `div.field--name-body.field--type-text-with-summary`, one `<p>` per paragraph.

use super::{ListingPage, SiteAdapter};
use crate::error::StructureError;
use crate::models::ArticleStub;
use crate::utils::{normalize_whitespace, parse_published, resolve_link};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument, warn};
use url::Url;

const REGION_SELECTOR: &str = "div.view-content";

static REGION: Lazy<Selector> = Lazy::new(|| Selector::parse(REGION_SELECTOR).unwrap());
static CARD: Lazy<Selector> = Lazy::new(|| Selector::parse("div.news-card").unwrap());
static TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"div.news-card__title a[hreflang="en"]"#).unwrap());
static TITLE_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.news-card__title a[href]").unwrap());
static DATE: Lazy<Selector> = Lazy::new(|| Selector::parse("div.news-card__date").unwrap());
static CATEGORY: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"div.news-card__categories a[hreflang="en"]"#).unwrap());
static BODY: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div.field--name-body.field--type-text-with-summary").unwrap()
});
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

/// Adapter for the nltimes.nl markup.
#[derive(Debug, Clone)]
pub struct NlTimesAdapter {
    base: Url,
    tz: Tz,
    region_index: usize,
}

impl NlTimesAdapter {
    /// `base` is the listing root; `tz` is the zone the site prints dates in.
    pub fn new(base: Url, tz: Tz) -> Self {
        Self {
            base,
            tz,
            region_index: 1,
        }
    }

    /// Use the `index`-th `div.view-content` as the content region.
    pub fn with_region_index(mut self, index: usize) -> Self {
        self.region_index = index;
        self
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn parse_card(&self, card: ElementRef<'_>) -> Result<ArticleStub, StructureError> {
        let title = card
            .select(&TITLE)
            .next()
            .map(|a| normalize_whitespace(&a.text().collect::<String>()))
            .filter(|t| !t.is_empty())
            .ok_or(StructureError::MissingField { field: "title" })?;

        let href = card
            .select(&TITLE_LINK)
            .next()
            .and_then(|a| a.value().attr("href"))
            .ok_or(StructureError::MissingField { field: "link" })?;
        let link = resolve_link(&self.base, href)?;

        let raw_date = card
            .select(&DATE)
            .next()
            .map(|d| d.text().collect::<String>())
            .ok_or(StructureError::MissingField { field: "date" })?;
        let published_at = parse_published(&raw_date, self.tz)?;

        let categories = card
            .select(&CATEGORY)
            .map(|a| normalize_whitespace(&a.text().collect::<String>()))
            .filter(|c| !c.is_empty())
            .collect();

        Ok(ArticleStub {
            link,
            title,
            categories,
            published_at,
        })
    }
}

impl SiteAdapter for NlTimesAdapter {
    fn listing_url(&self, page: usize) -> String {
        let mut url = self.base.clone();
        let kept: Vec<(String, String)> = self
            .base
            .query_pairs()
            .filter(|(k, _)| k != "page")
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        url.query_pairs_mut()
            .clear()
            .extend_pairs(kept)
            .append_pair("page", &page.to_string());
        url.to_string()
    }

    #[instrument(level = "debug", skip_all)]
    fn parse_listing(&self, document: &Html) -> Result<ListingPage, StructureError> {
        let regions: Vec<ElementRef<'_>> = document.select(&REGION).collect();
        let region = regions
            .get(self.region_index)
            .copied()
            .ok_or_else(|| StructureError::MissingRegion {
                expected: format!("{REGION_SELECTOR}[{}]", self.region_index),
                found: regions.len(),
            })?;

        let mut page = ListingPage::default();
        for (index, card) in region.select(&CARD).enumerate() {
            match self.parse_card(card) {
                Ok(stub) => {
                    debug!(title = %stub.title, link = %stub.link, "Parsed listing item");
                    page.stubs.push(stub);
                }
                Err(e) => {
                    let title = card
                        .select(&TITLE)
                        .next()
                        .map(|a| normalize_whitespace(&a.text().collect::<String>()))
                        .unwrap_or_default();
                    let href = card
                        .select(&TITLE_LINK)
                        .next()
                        .and_then(|a| a.value().attr("href"))
                        .unwrap_or_default();
                    warn!(index, %title, %href, error = %e, "Skipping listing item");
                    page.skipped += 1;
                }
            }
        }
        Ok(page)
    }

    /// Paragraphs are trimmed but keep their own line breaks; empty ones are dropped.
    fn parse_detail(&self, document: &Html) -> String {
        document
            .select(&BODY)
            .flat_map(|body| body.select(&PARAGRAPH))
            .map(|p| p.text().collect::<String>().trim().to_string())
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
