use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Target for per-row geocoding failures.
pub const GEOCODING_TARGET: &str = "facility_etl::geocoding";

/// Keeps geocoding failures visible unless `directives` already mention their target.
pub fn with_geocoding_warnings(directives: &str) -> String {
    if directives.contains(GEOCODING_TARGET) {
        directives.to_string()
    } else if directives.trim().is_empty() {
        format!("{}=warn", GEOCODING_TARGET)
    } else {
        format!("{},{}=warn", directives, GEOCODING_TARGET)
    }
}

fn default_filter(verbose: bool) -> EnvFilter {
    let fallback = if verbose {
        "facility_etl=debug,info"
    } else {
        "facility_etl=info"
    };
    let directives = std::env::var(EnvFilter::DEFAULT_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string());

    EnvFilter::new(with_geocoding_warnings(&directives))
}

pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(default_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// JSON lines, for runs whose output is collected by a log shipper.
pub fn init_json_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(default_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .init();
}
