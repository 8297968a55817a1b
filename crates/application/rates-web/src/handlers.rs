//! Route handlers for the rates board

use axum::{
    extract::{Form, RawQuery, State},
    http::header,
    response::{Html, IntoResponse},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::chart::ChartSelection;
use crate::gate::AdminAccess;
use crate::state::AppState;
use crate::templates::{self, NavItem};
use rates_core::{compute_deltas, CategoryDelta};

// ============== Page Handlers ==============

/// Public dashboard
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    RawQuery(query): RawQuery,
) -> impl IntoResponse {
    let selection = ChartSelection::from_query(query.as_deref());
    let outcome = state.loader.load().await;
    let content = templates::dashboard_html(&outcome, &selection, state.config.cache_ttl_secs);
    Html(templates::page_html(
        &state.config.page_title,
        NavItem::Dashboard,
        &content,
    ))
}

/// Admin entry page before any password is submitted
pub async fn admin_page(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    render_admin(&state, "").await
}

#[derive(Deserialize)]
pub struct AdminInput {
    #[serde(default)]
    pub password: String,
}

/// Handle admin password submission
pub async fn admin_submit(
    State(state): State<Arc<AppState>>,
    Form(input): Form<AdminInput>,
) -> impl IntoResponse {
    render_admin(&state, &input.password).await
}

async fn render_admin(state: &AppState, password: &str) -> Html<String> {
    let access = AdminAccess::check(password, &state.config.admin_password);
    let outcome = match access {
        // entries were probably just submitted, so skip the cache
        AdminAccess::Granted => Some(state.loader.refresh().await),
        AdminAccess::Denied => {
            tracing::warn!("admin access denied");
            None
        }
        AdminAccess::Prompt => None,
    };
    let content = templates::admin_html(access, &state.config.form_url, outcome.as_ref());
    Html(templates::page_html(&state.config.page_title, NavItem::Admin, &content))
}

// ============== HTMX Partial Handlers ==============

/// Metrics grid partial, polled by the dashboard
pub async fn metrics_panel(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let outcome = state.loader.load().await;
    let mut html = String::new();
    if let Some(message) = &outcome.error {
        html.push_str(&templates::error_html(message));
    }
    html.push_str(&templates::metrics_html(&outcome.table));
    Html(html)
}

// ============== API Handlers ==============

/// Health check
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let stats = state.loader.stats();
    Json(serde_json::json!({
        "status": "healthy",
        "service": "rates-board",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": state.uptime_secs(),
        "loader": {
            "source": state.loader.url(),
            "successful_fetches": stats.successful_fetches,
            "failed_fetches": stats.failed_fetches,
            "cache_hits": stats.cache_hits
        }
    }))
}

#[derive(Serialize)]
pub struct RatesResponse {
    /// Latest timestamp, `None` when no rows are loaded
    pub updated_at: Option<chrono::NaiveDateTime>,
    pub rows: usize,
    pub deltas: Vec<CategoryDelta>,
    pub error: Option<String>,
}

/// Current rates and deltas as JSON
pub async fn api_rates(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let outcome = state.loader.load().await;
    Json(RatesResponse {
        updated_at: outcome.table.latest().map(|row| row.timestamp),
        rows: outcome.table.len(),
        deltas: compute_deltas(&outcome.table),
        error: outcome.error.clone(),
    })
}

// ============== Static Assets ==============

/// CSS stylesheet
pub async fn style_css() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], templates::STYLE_CSS)
}
