//! Helpers shared by the site adapter and the pipeline.
//!
//! - Publication date parsing for the site's fixed date format
//! - Link resolution against the site base URL
//! - Whitespace normalisation for text pulled out of markup
//! - String truncation for log fields

use crate::error::StructureError;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Format of listing-page dates, e.g. `15 March 2023 - 10:30`.
pub const DATE_FORMAT: &str = "%d %B %Y - %H:%M";

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn normalize_whitespace(s: &str) -> String {
    WHITESPACE.replace_all(s.trim(), " ").into_owned()
}

/// Parse a listing date string into an absolute timestamp.
///
/// The site prints wall-clock time without an offset, so the string is
/// interpreted in `tz`. During the autumn DST overlap the earlier instant
/// wins; a time that falls in the spring gap is rejected.
pub fn parse_published(raw: &str, tz: Tz) -> Result<DateTime<Utc>, StructureError> {
    let cleaned = normalize_whitespace(raw);
    let naive = NaiveDateTime::parse_from_str(&cleaned, DATE_FORMAT).map_err(|e| {
        StructureError::BadDate {
            raw: raw.to_string(),
            reason: e.to_string(),
        }
    })?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| StructureError::BadDate {
            raw: raw.to_string(),
            reason: format!("local time does not exist in {}", tz.name()),
        })
}

/// Resolve a possibly relative `href` against the site base URL.
///
/// Only http(s) results are accepted; fragments are dropped so the same
/// article always maps to the same key.
pub fn resolve_link(base: &Url, href: &str) -> Result<String, StructureError> {
    let href = href.trim();
    if href.is_empty() {
        return Err(StructureError::BadLink {
            href: href.to_string(),
        });
    }
    let mut resolved = base.join(href).map_err(|_| StructureError::BadLink {
        href: href.to_string(),
    })?;
    if !matches!(resolved.scheme(), "http" | "https") {
        return Err(StructureError::BadLink {
            href: href.to_string(),
        });
    }
    resolved.set_fragment(None);
    Ok(resolved.to_string())
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut at the last char boundary at or before `max` bytes
/// with `"…(+N bytes)"` appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}
