//! Logging utilities for choropleth.
//!
//! Structured `tracing` events for the map pipeline: operation boundaries,
//! timings, classification summaries and errors with their category.

use std::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::classify::{BinBoundaries, BinType};
use crate::error::ChoroplethError;

/// Initialize the tracing subscriber with the given log level.
///
/// `RUST_LOG` takes precedence over `log_level` when set.
pub fn init_tracing(log_level: &str) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(val) => val,
        Err(_) => log_level.to_string(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();
}

/// Log a start message for a significant operation
pub fn log_operation_start(operation: &str, details: Option<&str>) {
    if let Some(details) = details {
        info!(
            operation = operation,
            details = details,
            "Starting operation"
        );
    } else {
        info!(operation = operation, "Starting operation");
    }
}

/// Log the completion of a significant operation
pub fn log_operation_end(operation: &str, start_time: Instant, success: bool) {
    let duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;

    if success {
        info!(
            operation = operation,
            duration_ms = duration_ms,
            "Operation completed successfully"
        );
    } else {
        warn!(
            operation = operation,
            duration_ms = duration_ms,
            "Operation failed"
        );
    }
}

/// Log an operation with timing and result in a single statement
pub fn log_timed_operation<F, R>(operation: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let start = Instant::now();
    let request_id = Uuid::new_v4();

    debug!(
        operation = operation,
        request_id = %request_id,
        "Starting operation"
    );

    let result = f();

    debug!(
        operation = operation,
        request_id = %request_id,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Operation completed"
    );

    result
}

/// Log the outcome of classifying a column
pub fn log_classification_stats(
    column: &str,
    bin_type: BinType,
    sample_size: usize,
    missing: usize,
    boundaries: &BinBoundaries,
) {
    info!(
        operation = "classify",
        column = column,
        bin_type = %bin_type,
        sample_size = sample_size,
        missing = missing,
        bins = boundaries.bin_count(),
        min = boundaries.first(),
        max = boundaries.last(),
        degenerate = boundaries.is_degenerate(),
        "Column classified"
    );
}

/// Log an error with context
pub fn log_error(error: &ChoroplethError, context: &str) {
    error!(
        error = %error,
        context = context,
        category = ?error.category(),
        "Error occurred"
    );
}

/// Generate a unique request ID
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}
