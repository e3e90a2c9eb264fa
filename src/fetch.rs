//! Document retrieval.
//!
//! The pipeline only needs "give me the parsed document at this URL". That
//! capability is the [`PageFetcher`] trait, implemented by:
//! - [`HttpFetcher`]: plain HTTP(S) GET through `reqwest`
//! - [`StaticFetcher`]: a fixed URL → HTML map, for dry runs against saved
//!   pages and for tests
//!
//! There is no retry policy here. A failed fetch is reported once and the
//! caller decides whether to skip.

use crate::error::{ConfigError, FetchError};
use scraper::Html;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Anything that can turn a URL into a parsed HTML document.
pub trait PageFetcher {
    /// Fetch `url` and parse the response body.
    async fn fetch(&self, url: &str) -> Result<Html, FetchError>;
}

/// HTTP fetcher backed by a single reused `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a client with the given `User-Agent` and per-request timeout.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(ConfigError::HttpClient)
            .inspect_err(|e| error!(error = %e, "Invalid configuration"))?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<Html, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;
        debug!(bytes = body.len(), "Fetched page");
        Ok(Html::parse_document(&body))
    }
}

/// Serves pre-loaded HTML by exact URL and records every request it sees.
///
/// Unknown URLs fail with [`FetchError::Missing`], which the pipeline treats
/// like any other transport failure.
#[derive(Debug, Default)]
pub struct StaticFetcher {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `html` as the response for `url`.
    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    /// URLs requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<Html, FetchError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
        match self.pages.get(url) {
            Some(html) => Ok(Html::parse_document(html)),
            None => Err(FetchError::Missing {
                url: url.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::log_capture::LogBuffer;
    use scraper::Selector;

    #[tokio::test]
    async fn test_static_fetcher_serves_registered_pages() {
        let fetcher = StaticFetcher::new()
            .with_page("https://example.com/a", "<html><body><h1>Hello</h1></body></html>");

        let doc = fetcher.fetch("https://example.com/a").await.unwrap();
        let h1 = Selector::parse("h1").unwrap();
        let text: String = doc.select(&h1).next().unwrap().text().collect();
        assert_eq!(text, "Hello");
    }

    #[tokio::test]
    async fn test_static_fetcher_missing_page_is_transport_error() {
        let fetcher = StaticFetcher::new();
        let err = fetcher.fetch("https://example.com/missing").await.unwrap_err();
        assert!(matches!(err, FetchError::Missing { .. }));
        assert_eq!(fetcher.requests(), vec!["https://example.com/missing"]);
    }

    #[test]
    fn test_http_fetcher_builds() {
        assert!(HttpFetcher::new("nltimes_ingest/test", Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn test_http_fetcher_rejects_bad_user_agent_and_logs_it() {
        let logs = LogBuffer::default();
        let result = tracing::subscriber::with_default(logs.subscriber(), || {
            HttpFetcher::new("nltimes\ningest", Duration::from_secs(5))
        });

        assert!(matches!(result, Err(ConfigError::HttpClient(_))));
        let out = logs.contents();
        assert!(out.contains("Invalid configuration"), "{out}");
    }
}
