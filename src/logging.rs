//! Process-wide `tracing` subscriber setup, called once from each binary.

use crate::config::LogLevel;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install a stderr `fmt` subscriber filtered at `level`.
///
/// A second call is ignored, so tests and binaries can both call it.
pub fn init_logging(level: LogLevel) {
    let filter = EnvFilter::try_new(level.as_filter()).unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}
