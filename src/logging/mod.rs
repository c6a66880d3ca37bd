//! Logging and observability
//!
//! Structured logging through `tracing`, with console output and optional
//! rolling JSON files. The audit log is a separate, durable store; this module
//! is the diagnostic channel that audit write failures are reported on.
//!
//! # Example
//!
//! ```no_run
//! use stockfeed::logging::init_logging;
//! use stockfeed::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(run_id = "0b6f", "Run started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of a run
///
/// # Example
///
/// ```no_run
/// use stockfeed::log_run_start;
///
/// log_run_start!("4f1c", "public.inventory", false);
/// ```
#[macro_export]
macro_rules! log_run_start {
    ($run_id:expr, $table:expr, $dry_run:expr) => {
        tracing::info!(
            run_id = %$run_id,
            table = %$table,
            dry_run = $dry_run,
            "Starting export run"
        );
    };
}

/// Log the completion of a run
///
/// # Example
///
/// ```no_run
/// use stockfeed::log_run_complete;
/// use std::time::Duration;
///
/// log_run_complete!("4f1c", 42, true, Duration::from_secs(3));
/// ```
#[macro_export]
macro_rules! log_run_complete {
    ($run_id:expr, $lines:expr, $success:expr, $duration:expr) => {
        tracing::info!(
            run_id = %$run_id,
            lines = $lines,
            success = $success,
            duration_ms = $duration.as_millis() as u64,
            "Export run completed"
        );
    };
}

/// Log one fetched page
///
/// # Example
///
/// ```no_run
/// use stockfeed::log_page_fetched;
///
/// log_page_fetched!(3, 1000, Some(3000_i64));
/// ```
#[macro_export]
macro_rules! log_page_fetched {
    ($page:expr, $rows:expr, $cursor:expr) => {
        tracing::debug!(
            page = $page,
            rows = $rows,
            cursor = ?$cursor,
            "Fetched page"
        );
    };
}
