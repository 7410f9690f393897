//! Logging Infrastructure
//!
//! Structured logging setup for development and production.
//! `RUST_LOG` takes precedence over the configured level.

use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize the logger
pub fn init_logger() {
    init_logger_with_file(None, None, None);
}

/// Initialize the logger with optional JSON formatting and file output
///
/// File output is only enabled when `log_dir` already exists; otherwise logs
/// go to stdout.
pub fn init_logger_with_file(log_level: Option<&str>, json: Option<bool>, log_dir: Option<&str>) {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    let log_path = log_dir.map(Path::new).filter(|p| p.exists());
    let json = json.unwrap_or(false);

    // try_init: tests may install a subscriber more than once
    let result = match (log_path.and_then(Path::to_str), json) {
        (Some(dir), true) => {
            let file_appender = tracing_appender::rolling::daily(dir, "pos-server");
            builder.json().with_writer(file_appender).try_init()
        }
        (Some(dir), false) => {
            let file_appender = tracing_appender::rolling::daily(dir, "pos-server");
            builder.with_ansi(false).with_writer(file_appender).try_init()
        }
        (None, true) => builder.json().try_init(),
        (None, false) => builder.try_init(),
    };

    if let Err(e) = result {
        eprintln!("Logger already initialized: {e}");
    }
}
