//! Diagnostic tracing for the `costline` binary.
//!
//! Tracing goes to stderr so that report output on stdout stays clean for
//! piping (`costline explain job.json --format json | jq`).

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`. Defaults to `warn` if unset, which still surfaces
/// skipped deployment records.
///
/// # Example
/// ```bash
/// RUST_LOG=costline=debug costline explain job.json
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
