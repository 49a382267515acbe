//! Process-wide tracing setup for the binary.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Install a stderr `fmt` subscriber filtered by `RUST_LOG` (default
/// `info`).
///
/// Log lines are handed to a background writer; keep the returned guard
/// alive until exit or buffered lines are lost.
pub fn init() -> anyhow::Result<WorkerGuard> {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_thread_names(true)
                .with_target(false),
        )
        .try_init()?;
    Ok(guard)
}
