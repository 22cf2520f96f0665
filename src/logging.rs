//! `tracing` setup for the binary.
//!
//! Library code logs through `tracing` macros; the subscriber is installed
//! once by `main`. Terminal feedback for the user goes through the colored
//! macros in the crate root instead.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "moodtune=info,warn";

/// Initialize the logging system.
///
/// The filter is read from `RUST_LOG` and falls back to `moodtune=info` with
/// everything else at `warn`. Logs go to stderr so they never interleave with
/// tables printed to stdout.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
