//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Initialize tracing/logging for the process.
///
/// `json` selects machine-readable output (production); otherwise a
/// compact human format is used (development). Filtering is configurable
/// via `RUST_LOG`. Safe to call multiple times (subsequent calls are
/// no-ops).
pub fn init(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if json {
        let _ = builder
            .json()
            .with_timer(tracing_subscriber::fmt::time::SystemTime)
            .try_init();
    } else {
        let _ = builder.compact().try_init();
    }
}
