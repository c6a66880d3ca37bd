//! Subscriber setup for the exporter
//!
//! Console lines go to stderr so `validate-config` and `status` reports on
//! stdout stay readable. With `logging.local_enabled` the same events are
//! also written as JSON to a rolling `stockfeed.log`.

use crate::config::LoggingConfig;
use crate::domain::{Result, StockfeedError};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const LOG_FILE_PREFIX: &str = "stockfeed.log";

/// Transport crates that log every command and packet at debug
const QUIET_DEPENDENCIES: &[&str] = &["suppaftp", "tokio_postgres", "hyper", "reqwest"];

/// Flushes the file writer when dropped; hold it until the process exits
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Install the global subscriber
///
/// `RUST_LOG` wins over `level` when it is set.
///
/// # Errors
///
/// Fails on an unknown level, an uncreatable log directory or a second call.
///
/// # Example
///
/// ```no_run
/// use stockfeed::logging::init_logging;
/// use stockfeed::config::LoggingConfig;
///
/// let _guard = init_logging("debug", &LoggingConfig::console_only()).unwrap();
/// ```
pub fn init_logging(level: &str, config: &LoggingConfig) -> Result<LoggingGuard> {
    let filter = build_filter(parse_log_level(level)?);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter.clone())
        .boxed();

    let (file_layer, file_guard) = if config.local_enabled {
        std::fs::create_dir_all(&config.local_path).map_err(|e| {
            StockfeedError::Configuration(format!(
                "Failed to create log directory {}: {e}",
                config.local_path
            ))
        })?;

        let appender = RollingFileAppender::new(
            rotation(&config.local_rotation),
            &config.local_path,
            LOG_FILE_PREFIX,
        );
        let (writer, guard) = tracing_appender::non_blocking(appender);

        let layer = tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(writer)
            .with_filter(filter)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| StockfeedError::Configuration(format!("Failed to install logger: {e}")))?;

    if config.local_enabled {
        tracing::debug!(
            path = %config.local_path,
            rotation = %config.local_rotation,
            "File logging enabled"
        );
    }

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

fn build_filter(level: Level) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    let mut directives = format!("stockfeed={level}");
    for target in QUIET_DEPENDENCIES {
        directives.push_str(&format!(",{target}=warn"));
    }
    EnvFilter::new(directives)
}

fn rotation(name: &str) -> Rotation {
    match name {
        "hourly" => Rotation::HOURLY,
        "never" => Rotation::NEVER,
        _ => Rotation::DAILY,
    }
}

pub(crate) fn parse_log_level(level: &str) -> Result<Level> {
    level.trim().parse::<Level>().map_err(|_| {
        StockfeedError::Configuration(format!(
            "Invalid log level: {level}. Must be one of: trace, debug, info, warn, error"
        ))
    })
}
