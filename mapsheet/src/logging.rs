//! Logging setup for mapsheet hosts.
//!
//! Log records go to a file in the log directory (cleared when logging
//! starts) and optionally to stdout. `RUST_LOG` overrides the default `info`
//! filter.

use std::fs;
use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Keeps the file writer alive. Dropping it flushes the log file.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Installs the global subscriber.
///
/// Hosts that draw their own progress output pass `stdout = false` so log
/// lines do not interleave with it.
///
/// # Errors
///
/// Fails if the log directory cannot be created or the log file cannot be
/// cleared.
pub fn init_logging(
    log_dir: &Path,
    log_file: &str,
    stdout: bool,
) -> Result<LoggingGuard, io::Error> {
    fs::create_dir_all(log_dir)?;
    fs::write(log_dir.join(log_file), "")?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_target(true);

    let stdout_layer = stdout.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(io::stdout)
            .with_ansi(true)
            .compact()
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
        .map_err(io::Error::other)?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

pub fn default_log_file() -> &'static str {
    "mapsheet.log"
}
