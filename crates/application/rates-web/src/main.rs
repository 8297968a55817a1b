//! Rates Board - DHA Phase 10 file rates dashboard
//!
//! ## Usage
//!
//! ```bash
//! RATES_CSV_URL=https://... rates-board      # Start on default 127.0.0.1:3000
//! rates-board --config board.yaml            # Settings from YAML
//! rates-board --host 0.0.0.0 --port 8080     # Listen on all interfaces
//! ```

use anyhow::Context;
use clap::Parser;
use rates_config::BoardConfig;
use rates_loader::HttpCsvSource;
use rates_web::{serve, AppState};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Parser)]
#[command(name = "rates-board")]
#[command(about = "DHA Phase 10 file rates dashboard", version)]
struct Cli {
    /// YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host name or IP address to bind to (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Published CSV export of the rates sheet (overrides config)
    #[arg(long)]
    csv_url: Option<String>,
}

impl Cli {
    async fn apply(self, mut config: BoardConfig) -> anyhow::Result<BoardConfig> {
        if let Some(url) = self.csv_url {
            config.csv_url = url;
        }
        if self.host.is_some() || self.port.is_some() {
            let current = config
                .bind_addr()
                .with_context(|| format!("cannot override bind {:?}", config.bind))?;
            let port = self.port.unwrap_or(current.port());
            let addr = match self.host {
                Some(host) => resolve(&host, port).await?,
                None => SocketAddr::new(current.ip(), port),
            };
            config.bind = addr.to_string();
        }
        Ok(config)
    }
}

/// IP literal or host name to the first address it resolves to
async fn resolve(host: &str, port: u16) -> anyhow::Result<SocketAddr> {
    let bare = host.trim_start_matches('[').trim_end_matches(']');
    if let Ok(ip) = bare.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, port));
    }
    tokio::net::lookup_host((bare, port))
        .await
        .with_context(|| format!("cannot resolve host {:?}", host))?
        .next()
        .with_context(|| format!("host {:?} has no addresses", host))
}

fn http_client() -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("rates-board/", env!("CARGO_PKG_VERSION")))
        .timeout(FETCH_TIMEOUT)
        .build()
        .context("cannot build HTTP client")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "rates_board=info,rates_web=info,rates_loader=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = BoardConfig::layered(cli.config.as_deref())?;
    let config = cli.apply(config).await?;
    config.validate()?;
    let addr = config.bind_addr()?;

    tracing::info!(
        csv_url = %config.csv_url,
        ttl_secs = config.cache_ttl_secs,
        "starting rates board"
    );

    let source = Arc::new(HttpCsvSource::with_client(http_client()?));
    let state = Arc::new(AppState::with_source(config, source));

    rates_web::routes::print_routes();
    println!("Server ready at http://{}", addr);
    println!();

    serve(state, addr).await
}
