//! Telemetry: structured logging, call spans and metrics.

mod logging;
pub mod metrics;
mod spans;

pub use logging::{init_from_env, init_logging, LogConfig, LogError, LogFormat};
pub use spans::{CallSpan, SpanExt};
