//! Logging utilities for the Clinica workspace.
//!
//! This module provides a standardized approach to logging across all crates.
//! It initializes the tracing subscriber once per process and offers a couple
//! of helpers for logging errors and results uniformly.

use std::path::Path;

use tracing::{error, info, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber with a specific log level.
///
/// When `directory` is given, a daily rolling file `clinica.log` is written
/// there in addition to the console output. The returned guard flushes the
/// file writer and must be kept alive for the lifetime of the program.
///
/// `RUST_LOG` directives take precedence over `level` for individual targets.
///
/// # Arguments
///
/// * `level` - The minimum log level to display.
/// * `directory` - Optional directory for the rolling log file.
pub fn init_with_level(level: Level, directory: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::from_default_env()
        .add_directive(LevelFilter::from_level(level).into());

    let (file_layer, guard) = match directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "clinica.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    // Use try_init to handle the case where a global default subscriber has already been set
    let result = tracing_subscriber::registry()
        .with(fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true))
        .with(file_layer)
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
    guard
}

/// Parse a textual log level from configuration, falling back to INFO.
pub fn parse_level(level: &str) -> Level {
    level.parse().unwrap_or(Level::INFO)
}

/// Log an error with context at the ERROR level.
///
/// # Arguments
///
/// * `error` - The error to log.
/// * `context` - Additional context information about the error.
pub fn log_error<E: std::fmt::Display>(error: E, context: &str) {
    error!("{}: {}", context, error);
}

/// Log a result, with different messages for success and error cases.
///
/// This function logs a success message at the INFO level if the result is Ok,
/// or an error message at the ERROR level if the result is Err.
///
/// # Returns
///
/// The original result, allowing this function to be used in a chain.
pub fn log_result<T, E: std::fmt::Display>(
    result: Result<T, E>,
    success_message: &str,
    error_context: &str,
) -> Result<T, E> {
    match &result {
        Ok(_) => info!("{}", success_message),
        Err(e) => error!("{}: {}", error_context, e),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level_accepts_config_spelling() {
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level("WARN"), Level::WARN);
        assert_eq!(parse_level("chatty"), Level::INFO);
    }

    #[test]
    fn test_log_result_passes_value_through() {
        let ok: Result<u32, String> = Ok(7);
        assert_eq!(log_result(ok, "done", "failed"), Ok(7));

        let err: Result<u32, String> = Err("nope".to_string());
        assert_eq!(log_result(err, "done", "failed"), Err("nope".to_string()));
    }
}
