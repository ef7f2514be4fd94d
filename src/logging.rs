//! Logging setup for the broadcaster
//!
//! Logs go to a daily-rotated file and to stderr. The log level can be
//! controlled via the `RUST_LOG` environment variable.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

const LOG_FILE_PREFIX: &str = "playlist-broadcaster";
const DEFAULT_FILTER: &str = "playlist_broadcaster=debug,rspotify=info,warn";

/// Initialize the logging system.
///
/// Logs are written to `<log_dir>/playlist-broadcaster.YYYY-MM-DD` with daily
/// rotation. The returned guard flushes the file writer and must be held for
/// the lifetime of the process.
pub fn init_logging(log_dir: &Path) -> anyhow::Result<WorkerGuard> {
    // Ensure log directory exists
    if !log_dir.exists() {
        std::fs::create_dir_all(log_dir)?;
    }

    // Daily rotating file appender
    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX);
    // Non-blocking writer so logging never stalls the async runtime
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // RUST_LOG wins over the defaults
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false) // No ANSI colors in log files
        .with_target(true) // Include module path
        .with_span_events(FmtSpan::CLOSE); // Log when spans close

    // Compact console output for interactive runs
    let console_layer = fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()?;

    tracing::info!("Logging initialized - logs written to {}/", log_dir.display());

    Ok(guard)
}

/// Log the outcome of a metadata provider call
#[macro_export]
macro_rules! log_provider_result {
    ($provider:expr, $result:expr) => {
        match &$result {
            Ok(_) => tracing::debug!(provider = $provider, "Provider request successful"),
            Err(e) => tracing::debug!(provider = $provider, error = %e, "Provider request failed"),
        }
    };
}
