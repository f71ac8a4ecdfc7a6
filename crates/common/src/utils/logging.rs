use std::io;
use tracing_subscriber::{fmt, EnvFilter};

const HUMAN_FILTER: &str = "info,tower_http=info,axum=info";
// forwarded calls are visible in deployed logs
const JSON_FILTER: &str = "info,tower_http=info,rpc=debug";

fn filter_or(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Compact human-readable lines on stdout. `RUST_LOG` overrides the filter.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging_default() {
    let _ = fmt()
        .with_env_filter(filter_or(HUMAN_FILTER))
        .with_target(false)
        .compact()
        .with_writer(io::stdout)
        .try_init();
}

/// One JSON object per event on stdout, with targets so `rpc` and
/// `tower_http` events can be told apart.
pub fn init_logging_json() {
    let _ = fmt()
        .with_env_filter(filter_or(JSON_FILTER))
        .with_target(true)
        .json()
        .with_writer(io::stdout)
        .try_init();
}

pub fn init_logging(json: bool) {
    if json {
        init_logging_json()
    } else {
        init_logging_default()
    }
}
