//! Application state for the web GUI

use rates_config::BoardConfig;
use rates_loader::{CsvSource, RateLoader};
use std::sync::Arc;

/// Shared application state
pub struct AppState {
    pub config: BoardConfig,
    /// Cached loader for the configured sheet
    pub loader: RateLoader,
    /// Server start time
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn with_source(config: BoardConfig, source: Arc<dyn CsvSource>) -> Self {
        let loader = RateLoader::new(config.csv_url.clone(), source, config.cache_ttl());
        Self {
            config,
            loader,
            started_at: chrono::Utc::now(),
        }
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> i64 {
        (chrono::Utc::now() - self.started_at).num_seconds()
    }
}
