//! Route definitions for the rates board

/// All routes defined in the application
pub const ROUTES: &[(&str, &str, &str)] = &[
    // Page routes
    ("GET", "/", "Public dashboard (?props=...&chart=1)"),
    ("GET", "/admin", "Admin entry prompt"),
    ("POST", "/admin", "Submit admin password"),

    // HTMX partial routes
    ("GET", "/htmx/metrics", "Metrics grid partial"),

    // API routes
    ("GET", "/api/health", "Health check"),
    ("GET", "/api/rates", "Latest rates and deltas JSON"),

    // Static assets
    ("GET", "/static/style.css", "CSS stylesheet"),
];

/// Print all routes
pub fn print_routes() {
    println!("\nRates Board Routes:");
    println!("{:-<60}", "");
    for (method, path, desc) in ROUTES {
        println!("{:6} {:30} {}", method, path, desc);
    }
    println!();
}
