//! Command-line interface definitions.
//!
//! Every option can also be supplied through the environment (a `.env` file
//! in the working directory is loaded first), so a scheduled job needs no
//! flags at all.

use crate::error::ConfigError;
use crate::store::DEFAULT_TABLE;
use chrono_tz::Tz;
use clap::Parser;
use sqlx::postgres::PgConnectOptions;
use std::time::Duration;
use tracing::error;
use url::Url;

/// Scrape NL Times listing pages and store the articles in PostgreSQL.
///
/// # Examples
///
/// ```sh
/// # Two listing pages into the database named by DATABASE_URL
/// nltimes_ingest
///
/// # Five pages, discrete connection settings
/// DB_HOST=localhost DB_NAME=news DB_USER=news DB_PASSWORD=secret nltimes_ingest --pages 5
///
/// # Scrape without touching the database
/// nltimes_ingest --dry-run
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Listing root; pages are requested as `<base-url>?page=N`
    #[arg(long, env = "NLTIMES_BASE_URL", default_value = "https://nltimes.nl/")]
    pub base_url: String,

    /// Number of listing pages to scrape, starting at page 0
    #[arg(short, long, env = "NLTIMES_PAGES", default_value_t = 2)]
    pub pages: usize,

    /// Timezone the site prints its dates in
    #[arg(long, env = "NLTIMES_SOURCE_TZ", default_value = "Europe/Amsterdam")]
    pub source_timezone: String,

    /// User-Agent header sent with every request
    #[arg(long, env = "NLTIMES_USER_AGENT", default_value = concat!("nltimes_ingest/", env!("CARGO_PKG_VERSION")))]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "NLTIMES_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Full PostgreSQL connection URL; takes precedence over the DB_* parts
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    #[arg(long, env = "DB_HOST")]
    pub db_host: Option<String>,

    #[arg(long, env = "DB_PORT", default_value_t = 5432)]
    pub db_port: u16,

    #[arg(long, env = "DB_NAME")]
    pub db_name: Option<String>,

    #[arg(long, env = "DB_USER")]
    pub db_user: Option<String>,

    #[arg(long, env = "DB_PASSWORD", hide_env_values = true)]
    pub db_password: Option<String>,

    /// Table to write articles into
    #[arg(long, env = "NLTIMES_TABLE", default_value = DEFAULT_TABLE)]
    pub table: String,

    /// Insert records one statement at a time instead of in one transaction
    #[arg(long)]
    pub single_insert: bool,

    /// Scrape and report, but keep the records in memory only
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.base_url)
            .map_err(|source| ConfigError::BaseUrl {
                url: self.base_url.clone(),
                source,
            })
            .inspect_err(|e| error!(error = %e, "Invalid configuration"))
    }

    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        self.source_timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::Timezone(self.source_timezone.clone()))
            .inspect_err(|e| error!(error = %e, "Invalid configuration"))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Connection settings from `DATABASE_URL`, or from the discrete parts
    /// when it is unset or empty.
    pub fn connect_options(&self) -> Result<PgConnectOptions, ConfigError> {
        self.database_options()
            .inspect_err(|e| error!(error = %e, "Invalid configuration"))
    }

    fn database_options(&self) -> Result<PgConnectOptions, ConfigError> {
        if let Some(url) = self.database_url.as_deref().filter(|u| !u.is_empty()) {
            return url.parse::<PgConnectOptions>().map_err(ConfigError::DatabaseUrl);
        }

        let (Some(host), Some(name), Some(user)) = (&self.db_host, &self.db_name, &self.db_user)
        else {
            return Err(ConfigError::NoDatabase);
        };
        let mut options = PgConnectOptions::new()
            .host(host)
            .port(self.db_port)
            .database(name)
            .username(user);
        if let Some(password) = &self.db_password {
            options = options.password(password);
        }
        Ok(options)
    }
}
