//! # Rates Board Web GUI
//!
//! Public dashboard and admin entry page for the DHA Phase 10 file rates
//! sheet, rendered server-side with HTMX + SVG.
//!
//! - **Read-only**: rows are appended through an external form, never here
//! - **Cached**: one fetch per TTL window, shared by every request
//! - **Live**: the metrics grid re-polls `/htmx/metrics` every TTL seconds

pub mod chart;
pub mod gate;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod templates;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Create the main router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard))
        .route("/admin", get(handlers::admin_page).post(handlers::admin_submit))
        // HTMX partials
        .route("/htmx/metrics", get(handlers::metrics_panel))
        // API endpoints
        .route("/api/health", get(handlers::health))
        .route("/api/rates", get(handlers::api_rates))
        .route("/static/style.css", get(handlers::style_css))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the web server
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> anyhow::Result<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Rates board listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
