//! Tracing initialization and subscriber setup.
//!
//! Installs a `tracing-subscriber` registry with an [`EnvFilter`] and a
//! plain-text `fmt` layer that writes to the rotating log file. Nothing is ever
//! written to the terminal, which the interactive session owns.

use super::file_writer::FileWriter;
use crate::infrastructure::log_path;
use crate::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable that overrides the configured filter.
pub const LOG_ENV: &str = "MODSTASH_LOG";

const DEFAULT_LEVEL: &str = "info";

/// Resolves the filter directive: `MODSTASH_LOG`, then `trace_level`, then
/// `info`.
fn filter_directive(config: &Config) -> String {
    std::env::var(LOG_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| config.trace_level.clone())
        .unwrap_or_else(|| DEFAULT_LEVEL.to_string())
}

/// Initializes the tracing subscriber with file-based output.
///
/// # File Location
///
/// Logs go to `<data_dir>/modstash.log`, rotated at 10 MB with 3 backups.
///
/// # Initialization Behavior
///
/// - Creates the data directory if it doesn't exist
/// - Silently does nothing if the directory cannot be created (logging is
///   optional)
/// - Falls back to `info` for an unparsable filter
/// - Idempotent: only the first call takes effect
///
/// # Example
///
/// ```rust,no_run
/// use modstash::observability::init_tracing;
/// use modstash::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
///
/// init_tracing(&config);
///
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let data_dir = config.data_dir();
    if std::fs::create_dir_all(&data_dir).is_err() {
        return;
    }

    let directive = filter_directive(config);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(FileWriter::new(log_path(&data_dir)))
        .with_ansi(false)
        .with_thread_names(true);

    let subscriber = tracing_subscriber::registry().with(filter).with(file_layer);

    if subscriber.try_init().is_ok() {
        tracing::info!(filter = %directive, version = env!("CARGO_PKG_VERSION"), "tracing initialized");
    }
}
