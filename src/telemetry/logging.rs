//! Logging configuration and initialization.
//!
//! The library never installs a subscriber on its own initiative: the
//! host process owns logging unless `ANNOTATOR_LOG` asks for ours.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once};
use thiserror::Error;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON structured logging.
    #[default]
    Json,
    /// Human-readable pretty printing (for development).
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub format: LogFormat,
    /// Log level filter (e.g., "info", "annotator_core=trace").
    pub level: String,
    /// Optional file path for log output. If None, logs to stderr.
    pub output_path: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Json,
            level: "info".to_string(),
            output_path: None,
        }
    }
}

/// Errors that can occur during logging initialization.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),
    #[error("Failed to open log file: {0}")]
    FileOpen(String),
    #[error("Subscriber already initialized")]
    AlreadyInitialized,
}

/// Install a global subscriber for `config`.
///
/// Fails with [`LogError::AlreadyInitialized`] when the process already
/// has one, which is the normal case inside a host that logs itself.
pub fn init_logging(config: &LogConfig) -> Result<(), LogError> {
    let filter =
        EnvFilter::try_new(&config.level).map_err(|e| LogError::InvalidFilter(e.to_string()))?;
    let writer = match &config.output_path {
        Some(path) => BoxMakeWriter::new(open_log_file(path)?),
        None => BoxMakeWriter::new(std::io::stderr),
    };
    let ansi = config.output_path.is_none();

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match config.format {
        LogFormat::Json => registry.with(fmt::layer().json().with_writer(writer)).try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().pretty().with_ansi(ansi).with_writer(writer))
            .try_init(),
    };
    installed.map_err(|_| LogError::AlreadyInitialized)
}

fn open_log_file(path: &Path) -> Result<Mutex<File>, LogError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(Mutex::new)
        .map_err(|e| LogError::FileOpen(format!("{}: {}", path.display(), e)))
}

static ENV_LOGGING: Once = Once::new();

/// Install the subscriber described by `ANNOTATOR_LOG*`, at most once per
/// process. Does nothing when `ANNOTATOR_LOG` is unset or when the host
/// already installed a subscriber.
pub fn init_from_env() {
    ENV_LOGGING.call_once(|| {
        if let Some(config) = &crate::config::current().log {
            match init_logging(config) {
                Ok(()) => tracing::debug!(level = %config.level, "annotator logging initialized"),
                Err(LogError::AlreadyInitialized) => {}
                Err(e) => eprintln!("annotator: logging disabled: {}", e),
            }
        }
    });
}
