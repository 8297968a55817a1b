//! # Rates Loader
//!
//! Fetches the published rates sheet, parses it into a [`RateTable`] and
//! memoizes the result for a short window.
//!
//! Failure is binary: a load either yields the full table or an empty one
//! plus a message for the page. Errors never reach the handlers.
//!
//! ```ignore
//! use rates_loader::{HttpCsvSource, RateLoader};
//!
//! let loader = RateLoader::new(url, Arc::new(HttpCsvSource::new()), Duration::from_secs(60));
//! let outcome = loader.load().await;
//! if outcome.table.is_empty() { /* waiting for data */ }
//! ```

pub mod cache;
pub mod parse;
pub mod source;

pub use cache::TtlCache;
pub use parse::{parse_table, parse_timestamp};
pub use source::{CsvSource, HttpCsvSource};

use rates_core::{RateTable, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Result of one [`RateLoader::load`] call
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    /// Loaded table, or the empty sentinel on failure
    pub table: Arc<RateTable>,
    /// Message to show inline when the load failed
    pub error: Option<String>,
    /// Served from the cache without fetching
    pub from_cache: bool,
}

impl LoadOutcome {
    fn fresh(table: Arc<RateTable>) -> Self {
        Self {
            table,
            error: None,
            from_cache: false,
        }
    }

    fn cached(table: Arc<RateTable>) -> Self {
        Self {
            table,
            error: None,
            from_cache: true,
        }
    }

    fn failed(message: String) -> Self {
        Self {
            table: Arc::new(RateTable::empty()),
            error: Some(message),
            from_cache: false,
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Loader statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoaderStats {
    pub successful_fetches: u64,
    pub failed_fetches: u64,
    pub cache_hits: u64,
}

/// Counters kept outside the cache lock so they can be read mid-fetch
#[derive(Debug, Default)]
struct StatsCounters {
    successful_fetches: AtomicU64,
    failed_fetches: AtomicU64,
    cache_hits: AtomicU64,
}

impl StatsCounters {
    fn snapshot(&self) -> LoaderStats {
        LoaderStats {
            successful_fetches: self.successful_fetches.load(Ordering::Relaxed),
            failed_fetches: self.failed_fetches.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
        }
    }
}

/// Cached loader for one CSV resource.
///
/// The cache lock is held across the fetch, so concurrent renders that
/// miss the cache wait for a single request instead of each fetching.
/// [`RateLoader::stats`] never takes that lock.
pub struct RateLoader {
    url: String,
    source: Arc<dyn CsvSource>,
    cache: Mutex<TtlCache<String, Arc<RateTable>>>,
    stats: StatsCounters,
}

impl RateLoader {
    pub fn new(url: impl Into<String>, source: Arc<dyn CsvSource>, ttl: Duration) -> Self {
        Self {
            url: url.into(),
            source,
            cache: Mutex::new(TtlCache::new(ttl)),
            stats: StatsCounters::default(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Load the table, from cache when fresh
    pub async fn load(&self) -> LoadOutcome {
        self.load_at(Instant::now()).await
    }

    /// Like [`RateLoader::load`] with an explicit clock reading
    pub async fn load_at(&self, now: Instant) -> LoadOutcome {
        let mut cache = self.cache.lock().await;

        if let Some(table) = cache.get_at(self.url.as_str(), now).cloned() {
            self.stats.cache_hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(url = %self.url, rows = table.len(), "rates cache hit");
            return LoadOutcome::cached(table);
        }

        match self.fetch_table().await {
            Ok(table) => {
                let table = Arc::new(table);
                cache.insert_at(self.url.clone(), table.clone(), now);
                self.stats.successful_fetches.fetch_add(1, Ordering::Relaxed);
                tracing::info!(
                    url = %self.url,
                    rows = table.len(),
                    ttl_secs = cache.ttl().as_secs(),
                    "rates loaded"
                );
                LoadOutcome::fresh(table)
            }
            Err(e) => {
                self.stats.failed_fetches.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(url = %self.url, error = %e, "rates load failed");
                LoadOutcome::failed(e.to_string())
            }
        }
    }

    /// Drop the cached table and load again
    pub async fn refresh(&self) -> LoadOutcome {
        {
            let mut cache = self.cache.lock().await;
            cache.invalidate(self.url.as_str());
        }
        self.load().await
    }

    pub fn stats(&self) -> LoaderStats {
        self.stats.snapshot()
    }

    async fn fetch_table(&self) -> Result<RateTable> {
        let text = self.source.fetch(&self.url).await?;
        parse_table(&text)
    }
}
