//! Logging initialization using the `tracing` ecosystem.
//!
//! Provides:
//! - Console output (colored and human-readable, or one JSON object per line)
//! - File output (daily rotation via `tracing-appender`)
//! - Configurable log level via env var `RUST_LOG` or explicit parameter

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Console output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Initialize the global tracing subscriber.
///
/// Should be called once at program start. After this, all `tracing::info!()`
/// etc. macros will produce output.
///
/// # Parameters
///
/// - `log_level`: default level if `RUST_LOG` env var is not set (e.g. `"info"`)
/// - `log_dir`: optional directory for daily-rotating log files
/// - `module_name`: used as the log file prefix (e.g. `"cg-runner"`)
/// - `format`: console layer format; the file layer is always plain text
pub fn init_logging(log_level: &str, log_dir: Option<&str>, module_name: &str, format: LogFormat) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let file_layer = log_dir.map(|dir| {
        let file_appender = tracing_appender::rolling::daily(dir, module_name);
        fmt::layer()
            .with_writer(file_appender)
            .with_ansi(false)
            .with_target(true)
    });

    let registry = tracing_subscriber::registry().with(env_filter).with(file_layer);

    match format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_target(true).with_ansi(true))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(true).with_current_span(false))
            .init(),
    }
}
