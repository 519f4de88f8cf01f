//! Development-time tracing for the interception layer.
//!
//! Tracing goes to stderr and is controlled by `RUST_LOG`. Messages meant for
//! the person at the prompt are written by the session, not through here.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber.
///
/// Reads `RUST_LOG`; `debug` raises the default from `warn` to `aidbg=debug`.
///
/// ```bash
/// RUST_LOG=aidbg=debug aidbg run demo.bat
/// ```
pub fn init(debug: bool) {
    let fallback = if debug { "warn,aidbg=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
