//! Board configuration.
//!
//! Resolution order (later wins):
//!   1. Built-in defaults
//!   2. YAML file (`--config board.yaml`)
//!   3. `RATES_*` environment variables
//!   4. Command-line flags (applied by the binary)

use rates_core::{Error, Result};
use serde::Deserialize;
use std::env;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

pub const ENV_CSV_URL: &str = "RATES_CSV_URL";
pub const ENV_FORM_URL: &str = "RATES_FORM_URL";
pub const ENV_ADMIN_PASSWORD: &str = "RATES_ADMIN_PASSWORD";
pub const ENV_CACHE_TTL_SECS: &str = "RATES_CACHE_TTL_SECS";
pub const ENV_BIND: &str = "RATES_BIND";
pub const ENV_PAGE_TITLE: &str = "RATES_PAGE_TITLE";

/// Runtime configuration for the board
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Published-to-web CSV export of the rates sheet
    pub csv_url: String,
    /// External form used to append rows. Empty hides the portal link.
    pub form_url: String,
    /// Admin gate credential, compared verbatim
    pub admin_password: String,
    pub cache_ttl_secs: u64,
    pub bind: String,
    pub page_title: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            csv_url: String::new(),
            form_url: String::new(),
            admin_password: "admin123".to_string(),
            cache_ttl_secs: 60,
            bind: "127.0.0.1:3000".to_string(),
            page_title: "DHA Phase 10 Rates".to_string(),
        }
    }
}

impl BoardConfig {
    /// [`BoardConfig::layered`], validated.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = Self::layered(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, then the optional YAML file, then the process environment.
    /// Not validated, so callers can overlay further settings first.
    pub fn layered(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(p) => Self::from_yaml_file(p)?,
            None => Self::default(),
        };
        Ok(base.with_env_from(|name| env::var(name).ok()))
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        tracing::debug!("Loaded config file {}", path.display());
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yaml::from_str(text).map_err(|e| Error::Config(format!("invalid YAML: {}", e)))
    }

    /// Overlay variables returned by `lookup`. Blank values are ignored, as
    /// are TTLs that do not parse. Values are trimmed, except the admin
    /// password, which the gate compares verbatim.
    pub fn with_env_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        if let Some(v) = get(ENV_CSV_URL) {
            self.csv_url = v;
        }
        if let Some(v) = get(ENV_FORM_URL) {
            self.form_url = v;
        }
        if let Some(v) = lookup(ENV_ADMIN_PASSWORD).filter(|s| !s.trim().is_empty()) {
            self.admin_password = v;
        }
        if let Some(v) = get(ENV_CACHE_TTL_SECS) {
            match v.parse() {
                Ok(secs) => self.cache_ttl_secs = secs,
                Err(_) => tracing::warn!("Ignoring {}={:?}: not a number", ENV_CACHE_TTL_SECS, v),
            }
        }
        if let Some(v) = get(ENV_BIND) {
            self.bind = v;
        }
        if let Some(v) = get(ENV_PAGE_TITLE) {
            self.page_title = v;
        }
        self
    }

    /// Check everything that would otherwise fail on first use.
    pub fn validate(&self) -> Result<()> {
        if self.csv_url.trim().is_empty() {
            return Err(Error::Config(format!(
                "no CSV source configured (set {} or csv_url)",
                ENV_CSV_URL
            )));
        }
        check_http_url("csv_url", &self.csv_url)?;
        if !self.form_url.is_empty() {
            check_http_url("form_url", &self.form_url)?;
        }
        if self.admin_password.is_empty() {
            return Err(Error::Config("admin_password must not be empty".to_string()));
        }
        if self.cache_ttl_secs == 0 {
            return Err(Error::Config("cache_ttl_secs must be at least 1".to_string()));
        }
        self.bind_addr()?;
        Ok(())
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.bind
            .parse()
            .map_err(|e| Error::Config(format!("invalid bind address {:?}: {}", self.bind, e)))
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

fn check_http_url(field: &str, value: &str) -> Result<()> {
    let parsed = url::Url::parse(value)
        .map_err(|e| Error::Config(format!("{} {:?} is not a URL: {}", field, value, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(Error::Config(format!(
            "{} must be http or https, got {}",
            field, other
        ))),
    }
}
