//! HTML templates for the rates board
//!
//! Uses HTMX for server-driven refresh of the metrics grid.

use crate::chart::{ChartSelection, LineChart};
use crate::gate::AdminAccess;
use rates_core::{
    compute_deltas, format_delta, format_rate, Category, CategoryDelta, DeltaState, RateTable,
    SnapshotRow,
};
use rates_loader::LoadOutcome;

/// Rows shown in the admin "Recent Entries Log"
pub const RECENT_ENTRIES: usize = 10;

/// CSS styles
pub const STYLE_CSS: &str = r#"
:root {
    --bg-primary: #f5f6f8;
    --bg-secondary: #ffffff;
    --bg-tertiary: #eef0f4;
    --accent: #0f766e;
    --text-primary: #1f2933;
    --text-secondary: #6b7280;
    --border: #d9dde3;
    --danger: #b91c1c;
    --warning: #b45309;
    --success: #15803d;
    --info: #1d4ed8;
}

* {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}

body {
    font-family: 'Inter', 'Segoe UI', sans-serif;
    background: var(--bg-primary);
    color: var(--text-primary);
    min-height: 100vh;
    line-height: 1.5;
    display: grid;
    grid-template-columns: 220px 1fr;
}

/* Sidebar */
.sidebar {
    background: var(--bg-secondary);
    border-right: 1px solid var(--border);
    padding: 24px 16px;
}

.sidebar h2 {
    font-size: 1.1em;
    margin-bottom: 16px;
}

.nav-link {
    display: block;
    padding: 8px 12px;
    border-radius: 6px;
    color: var(--text-secondary);
    text-decoration: none;
    margin-bottom: 4px;
}

.nav-link:hover, .nav-link.active {
    color: var(--accent);
    background: var(--bg-tertiary);
}

/* Main */
main {
    padding: 32px 40px;
    max-width: 1200px;
}

h1 { margin-bottom: 8px; }
h2 { margin: 24px 0 12px; font-size: 1.3em; }
h3 { margin: 16px 0 8px; }

.subtitle, .caption {
    color: var(--text-secondary);
}

.caption {
    font-size: 0.9em;
    margin: 8px 0 16px;
}

hr {
    border: none;
    border-top: 1px solid var(--border);
    margin: 24px 0;
}

/* Metrics */
.metrics-grid {
    display: grid;
    grid-template-columns: repeat(4, 1fr);
    gap: 16px;
}

.metric {
    background: var(--bg-secondary);
    border: 1px solid var(--border);
    border-radius: 8px;
    padding: 16px;
}

.metric-label {
    color: var(--text-secondary);
    font-size: 0.9em;
}

.metric-value {
    font-size: 1.8em;
    font-weight: 600;
}

.metric-delta {
    display: inline-block;
    padding: 0 8px;
    border-radius: 10px;
    font-size: 0.9em;
}

.delta-up { color: var(--success); background: rgba(21, 128, 61, 0.1); }
.delta-down { color: var(--danger); background: rgba(185, 28, 28, 0.1); }
.delta-off { color: var(--text-secondary); background: var(--bg-tertiary); }

/* Alerts */
.alert {
    border-radius: 8px;
    padding: 12px 16px;
    margin: 12px 0;
}

.alert-error { color: var(--danger); background: rgba(185, 28, 28, 0.08); }
.alert-warning { color: var(--warning); background: rgba(180, 83, 9, 0.08); }
.alert-success { color: var(--success); background: rgba(21, 128, 61, 0.08); }
.alert-info { color: var(--info); background: rgba(29, 78, 216, 0.08); }

/* Chart */
.chart-form {
    display: flex;
    flex-wrap: wrap;
    gap: 12px;
    align-items: center;
    margin-bottom: 12px;
}

.chart-form label {
    background: var(--bg-secondary);
    border: 1px solid var(--border);
    border-radius: 14px;
    padding: 2px 10px;
    cursor: pointer;
}

.chart-form button, .admin-form button {
    background: var(--accent);
    color: #fff;
    border: none;
    border-radius: 6px;
    padding: 6px 16px;
    cursor: pointer;
}

.chart {
    width: 100%;
    background: var(--bg-secondary);
    border: 1px solid var(--border);
    border-radius: 8px;
}

.chart .chart-title { font-size: 16px; font-weight: 600; fill: var(--text-primary); }
.chart .grid { stroke: var(--border); stroke-width: 1; }
.chart .axis { stroke: var(--text-secondary); stroke-width: 1; }
.chart .tick, .chart .legend { font-size: 12px; fill: var(--text-secondary); }
.chart .axis-label { font-size: 13px; fill: var(--text-primary); }

.chart-empty {
    color: var(--text-secondary);
    padding: 24px;
    text-align: center;
}

/* Tables */
details {
    margin-top: 24px;
    background: var(--bg-secondary);
    border: 1px solid var(--border);
    border-radius: 8px;
    padding: 12px 16px;
}

summary {
    cursor: pointer;
    font-weight: 600;
}

.table-wrap {
    overflow-x: auto;
    margin-top: 12px;
}

table {
    border-collapse: collapse;
    width: 100%;
    font-size: 0.9em;
}

th, td {
    padding: 6px 10px;
    border-bottom: 1px solid var(--border);
    text-align: right;
    white-space: nowrap;
}

th:first-child, td:first-child {
    text-align: left;
}

/* Admin */
.admin-form {
    display: flex;
    gap: 8px;
    margin: 16px 0;
}

.admin-form input {
    padding: 6px 12px;
    border: 1px solid var(--border);
    border-radius: 6px;
    min-width: 260px;
}

@media (max-width: 900px) {
    body { grid-template-columns: 1fr; }
    .metrics-grid { grid-template-columns: repeat(2, 1fr); }
}
"#;

/// Which sidebar entry is highlighted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavItem {
    Dashboard,
    Admin,
}

/// Simple HTML escaping
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Page shell with the navigation sidebar
pub fn page_html(page_title: &str, active: NavItem, content: &str) -> String {
    let class = |item: NavItem| if item == active { "nav-link active" } else { "nav-link" };
    format!(
        "<!DOCTYPE html>
<html lang=\"en\">
<head>
    <meta charset=\"UTF-8\">
    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">
    <title>{title}</title>
    <link rel=\"stylesheet\" href=\"/static/style.css\">
    <script src=\"https://unpkg.com/htmx.org@1.9.10\"></script>
</head>
<body>
    <nav class=\"sidebar\">
        <h2>Navigation</h2>
        <a class=\"{dash}\" href=\"/\">Public Dashboard</a>
        <a class=\"{admin}\" href=\"/admin\">Admin Entry</a>
    </nav>
    <main>
{content}
    </main>
</body>
</html>",
        title = html_escape(page_title),
        dash = class(NavItem::Dashboard),
        admin = class(NavItem::Admin),
        content = content,
    )
}

/// Inline load-failure box
pub fn error_html(message: &str) -> String {
    format!(
        "<div class=\"alert alert-error\">Error loading data: {}</div>",
        html_escape(message)
    )
}

fn no_data_html() -> &'static str {
    "<div class=\"alert alert-warning\">No data available yet. Waiting for first entry.</div>"
}

/// Public dashboard body
pub fn dashboard_html(outcome: &LoadOutcome, selection: &ChartSelection, refresh_secs: u64) -> String {
    let mut html = String::from(
        "<h1>DHA Phase 10 File Rates</h1>
        <p class=\"subtitle\">Live updates based on daily market entries.</p>",
    );

    if let Some(message) = &outcome.error {
        html.push_str(&error_html(message));
    }

    let table = &outcome.table;
    if table.is_empty() {
        html.push_str(no_data_html());
        return html;
    }

    html.push_str(&format!(
        "<div id=\"metrics\" hx-get=\"/htmx/metrics\" hx-trigger=\"every {}s\" hx-swap=\"innerHTML\">{}</div>",
        refresh_secs,
        metrics_html(table)
    ));
    html.push_str("<hr>");
    html.push_str(&trends_html(table, selection));
    html.push_str(&format!(
        "<details>
            <summary>View Historical Data</summary>
            {}
        </details>",
        history_table_html(table.newest_first())
    ));
    html
}

/// Caption and metric grid; also served alone as the HTMX partial.
///
/// An empty table renders the "no data" warning instead.
pub fn metrics_html(table: &RateTable) -> String {
    let Some(current) = table.latest() else {
        return no_data_html().to_string();
    };

    let widgets: String = compute_deltas(table).iter().map(metric_html).collect();
    format!(
        "<p class=\"caption\">Last Updated: {}</p>
        <h2>Current Market Rates</h2>
        <div class=\"metrics-grid\">{}</div>",
        current.timestamp.format("%d %b %Y, %I:%M %p"),
        widgets
    )
}

fn metric_html(delta: &CategoryDelta) -> String {
    let (class, arrow) = match delta.state {
        DeltaState::Favorable => ("delta-up", "&#9650; "),
        DeltaState::Unfavorable => ("delta-down", "&#9660; "),
        DeltaState::Neutral => ("delta-off", ""),
    };
    format!(
        "<div class=\"metric\">
            <div class=\"metric-label\">{}</div>
            <div class=\"metric-value\">{}</div>
            <div class=\"metric-delta {}\">{}{}</div>
        </div>",
        delta.category.label(),
        format_rate(delta.current),
        class,
        arrow,
        format_delta(delta.delta)
    )
}

fn trends_html(table: &RateTable, selection: &ChartSelection) -> String {
    let options: String = Category::ALL
        .iter()
        .map(|&c| {
            format!(
                "<label><input type=\"checkbox\" name=\"props\" value=\"{label}\"{checked}> {label}</label>",
                label = c.label(),
                checked = if selection.contains(c) { " checked" } else { "" },
            )
        })
        .collect();

    let chart = if selection.is_empty() {
        String::new()
    } else {
        LineChart::default().render(table, selection.categories())
    };

    format!(
        "<h2>Price Trends</h2>
        <form class=\"chart-form\" method=\"get\" action=\"/\">
            <span>Select properties to compare:</span>
            <input type=\"hidden\" name=\"chart\" value=\"1\">
            {}
            <button type=\"submit\">Update</button>
        </form>
        {}",
        options, chart
    )
}

/// Raw data table in the given row order
pub fn history_table_html<'a>(rows: impl Iterator<Item = &'a SnapshotRow>) -> String {
    let header: String = std::iter::once("Timestamp")
        .chain(Category::ALL.iter().map(|c| c.label()))
        .map(|h| format!("<th>{}</th>", h))
        .collect();

    let body: String = rows
        .map(|row| {
            let cells: String = Category::ALL
                .iter()
                .map(|&c| format!("<td>{}</td>", format_rate(row.rate(c))))
                .collect();
            format!(
                "<tr><td>{}</td>{}</tr>",
                row.timestamp.format("%Y-%m-%d %H:%M:%S"),
                cells
            )
        })
        .collect();

    format!(
        "<div class=\"table-wrap\"><table><thead><tr>{}</tr></thead><tbody>{}</tbody></table></div>",
        header, body
    )
}

/// Admin entry body.
///
/// `outcome` is only consulted when access is granted.
pub fn admin_html(access: AdminAccess, form_url: &str, outcome: Option<&LoadOutcome>) -> String {
    let mut html = String::from(
        "<h1>Admin Data Entry</h1>
        <form class=\"admin-form\" method=\"post\" action=\"/admin\">
            <input type=\"password\" name=\"password\" placeholder=\"Enter Admin Password\" autocomplete=\"current-password\">
            <button type=\"submit\">Enter</button>
        </form>",
    );

    match access {
        AdminAccess::Granted => {
            html.push_str("<div class=\"alert alert-success\">Access Granted</div>");
            html.push_str(
                "<div class=\"alert alert-info\">Use the form below to enter daily rates.</div>",
            );
            html.push_str("<h3>Data Entry Portal</h3>");
            if form_url.is_empty() {
                html.push_str("<p class=\"caption\">No data entry form is configured.</p>");
            } else {
                html.push_str(&format!(
                    "<p><a href=\"{}\" target=\"_blank\" rel=\"noopener\"><strong>Click Here to Open Data Entry Form</strong></a></p>",
                    html_escape(form_url)
                ));
            }
            html.push_str("<hr><h2>Recent Entries Log</h2>");
            if let Some(outcome) = outcome {
                if let Some(message) = &outcome.error {
                    html.push_str(&error_html(message));
                }
                if !outcome.table.is_empty() {
                    html.push_str(&history_table_html(
                        outcome.table.recent(RECENT_ENTRIES).iter(),
                    ));
                }
            }
        }
        AdminAccess::Denied => {
            html.push_str("<div class=\"alert alert-error\">Incorrect Password</div>");
            html.push_str(employees_only_html());
        }
        AdminAccess::Prompt => {
            html.push_str(employees_only_html());
        }
    }
    html
}

fn employees_only_html() -> &'static str {
    "<div class=\"alert alert-warning\">This section is for employees only.</div>"
}
