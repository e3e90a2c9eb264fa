//! Data models for scraped articles.
//!
//! - [`ArticleStub`]: what a listing page tells us about an article
//! - [`Record`]: the stub plus its body text, ready for persistence
//! - [`BatchOutcome`]: how many records a write actually added

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An article as found on a listing page, before its detail page is fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleStub {
    /// Absolute, canonical article URL.
    pub link: String,
    /// Headline text. Never empty.
    pub title: String,
    /// Category labels in page order. May be empty.
    pub categories: Vec<String>,
    /// Publication time, resolved from the site's wall-clock date string.
    pub published_at: DateTime<Utc>,
}

/// A fully assembled article.
///
/// `link` is the unique key in the store. `body` may be empty when the
/// detail page had no recognisable body container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub link: String,
    pub title: String,
    pub body: String,
    pub categories: Vec<String>,
    pub published_at: DateTime<Utc>,
}

impl Record {
    /// Combine a listing stub with the body text from its detail page.
    pub fn from_stub(stub: ArticleStub, body: String) -> Self {
        Self {
            link: stub.link,
            title: stub.title,
            body,
            categories: stub.categories,
            published_at: stub.published_at,
        }
    }

    /// The constraint this record would break in the articles table, if any.
    pub fn constraint_violation(&self) -> Option<&'static str> {
        if self.link.trim().is_empty() {
            Some("link must not be empty")
        } else if self.title.trim().is_empty() {
            Some("title must not be empty")
        } else {
            None
        }
    }
}

/// Result of a write against the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Rows newly added.
    pub inserted: usize,
    /// Records whose link was already stored (left untouched).
    pub skipped: usize,
}

impl BatchOutcome {
    pub fn total(&self) -> usize {
        self.inserted + self.skipped
    }
}

impl std::ops::AddAssign for BatchOutcome {
    fn add_assign(&mut self, rhs: Self) {
        self.inserted += rhs.inserted;
        self.skipped += rhs.skipped;
    }
}
