//! Diagnostic logging for the `sitework` binary.
//!
//! Library code only emits `tracing` events; the binary installs a `fmt`
//! subscriber writing to stderr so command output on stdout stays clean.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber with `directive` (e.g. `warn`,
/// `sitework=debug`). An unparsable directive falls back to `warn`.
pub fn init(directive: &str) {
    let filter = filter(directive);

    // A subscriber may already be installed (tests)
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

fn filter(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("warn"))
}
