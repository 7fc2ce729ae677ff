//! Logging utilities for the Slotwise application.
//!
//! This module provides a standardized approach to logging across all crates
//! in the application. The subscriber is installed once at startup; individual
//! crates then use the `tracing` macros directly.

use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber.
///
/// This function should be called at the start of the application to set up
/// logging. It configures the tracing subscriber with the specified log level
/// and formats log messages with timestamps, log levels, targets, and file/line
/// information.
///
/// # Examples
///
/// ```
/// use slotwise_common::logging;
///
/// // Initialize with default log level (INFO)
/// logging::init();
///
/// // Initialize with a specific log level
/// logging::init_with_level(tracing::Level::DEBUG);
/// ```
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber with a specific log level.
///
/// The level acts as the default; directives from `RUST_LOG` take precedence
/// for the targets they name.
pub fn init_with_level(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    // Use try_init to handle the case where a global default subscriber has already been set
    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true)
                .with_thread_names(true),
        )
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
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
