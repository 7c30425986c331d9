//! Logging Infrastructure

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset
const DEFAULT_FILTER: &str = "lunch_client=info,lunch_watch=info";

/// Initialize the logger
pub fn init_logger() {
    init_logger_with(None, false);
}

/// Initialize the logger with an explicit filter and optional JSON output.
///
/// `RUST_LOG` wins over `filter` when both are present.
pub fn init_logger_with(filter: Option<&str>, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter.unwrap_or(DEFAULT_FILTER)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    // try_init: tests and embedders may have installed a subscriber already
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
