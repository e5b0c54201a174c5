//! Runtime configuration loading from environment variables.
//!
//! All configuration values are loaded from `ANNOTATOR_*` environment
//! variables with sensible defaults. Invalid values fall back to defaults
//! without crashing.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |---|---|---|
//! | `ANNOTATOR_LOG` | unset | Tracing filter; unset installs no subscriber |
//! | `ANNOTATOR_LOG_FORMAT` | `json` | `json` or `pretty` |
//! | `ANNOTATOR_LOG_FILE` | unset | Write logs to this file instead of stderr |
//! | `ANNOTATOR_INTRAOP_THREADS` | 0 | Initial intra-op width (0 = auto) |
//! | `ANNOTATOR_INTEROP_THREADS` | 0 | Initial inter-op width (0 = auto) |
//! | `ANNOTATOR_MAX_INPUT_BYTES` | 268435456 | Max serialized batch size (bytes) |

use std::path::PathBuf;
use std::sync::OnceLock;

use crate::telemetry::{LogConfig, LogFormat};

const DEFAULT_MAX_INPUT_BYTES: usize = 256 * 1024 * 1024; // 256 MiB
const MIN_MAX_INPUT_BYTES: usize = 1024; // floor: 1 KiB

/// All runtime configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    /// Logging setup; `None` when `ANNOTATOR_LOG` is unset.
    pub log: Option<LogConfig>,
    pub intra_op_threads: usize,
    pub inter_op_threads: usize,
    pub max_input_bytes: usize,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            log: None,
            intra_op_threads: 0,
            inter_op_threads: 0,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

/// Parse a `usize` env var, returning `default` on missing or invalid.
fn parse_usize(key: &str, default: usize) -> usize {
    match std::env::var(key) {
        Ok(val) => val.trim().parse::<usize>().unwrap_or(default),
        Err(_) => default,
    }
}

/// Load logging configuration from environment.
fn load_log_config() -> Option<LogConfig> {
    let level = std::env::var("ANNOTATOR_LOG").ok()?;
    let level = level.trim();
    if level.is_empty() {
        return None;
    }

    let format = match std::env::var("ANNOTATOR_LOG_FORMAT").as_deref() {
        Ok("pretty") => LogFormat::Pretty,
        _ => LogFormat::Json,
    };
    let output_path = std::env::var_os("ANNOTATOR_LOG_FILE").map(PathBuf::from);

    Some(LogConfig {
        format,
        level: level.to_string(),
        output_path,
    })
}

/// Load all configuration from environment variables.
///
/// Missing or invalid values fall back to safe defaults without panicking.
pub fn load() -> EnvConfig {
    let max_input_bytes = parse_usize("ANNOTATOR_MAX_INPUT_BYTES", DEFAULT_MAX_INPUT_BYTES);

    EnvConfig {
        log: load_log_config(),
        intra_op_threads: parse_usize("ANNOTATOR_INTRAOP_THREADS", 0),
        inter_op_threads: parse_usize("ANNOTATOR_INTEROP_THREADS", 0),
        max_input_bytes: max_input_bytes.max(MIN_MAX_INPUT_BYTES),
    }
}

static CURRENT: OnceLock<EnvConfig> = OnceLock::new();

/// Configuration of this process, read from the environment on first use.
pub fn current() -> &'static EnvConfig {
    CURRENT.get_or_init(load)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const ENV_KEYS: &[&str] = &[
        "ANNOTATOR_LOG",
        "ANNOTATOR_LOG_FORMAT",
        "ANNOTATOR_LOG_FILE",
        "ANNOTATOR_INTRAOP_THREADS",
        "ANNOTATOR_INTEROP_THREADS",
        "ANNOTATOR_MAX_INPUT_BYTES",
    ];

    fn clear_env_vars() {
        for k in ENV_KEYS {
            std::env::remove_var(k);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_are_sensible() {
        clear_env_vars();
        let cfg = load();
        assert!(cfg.log.is_none());
        assert_eq!(cfg.intra_op_threads, 0);
        assert_eq!(cfg.inter_op_threads, 0);
        assert_eq!(cfg.max_input_bytes, 256 * 1024 * 1024);
    }

    #[test]
    #[serial]
    fn test_env_vars_override_defaults() {
        clear_env_vars();
        std::env::set_var("ANNOTATOR_LOG", "annotator_core=debug");
        std::env::set_var("ANNOTATOR_LOG_FORMAT", "pretty");
        std::env::set_var("ANNOTATOR_LOG_FILE", "/tmp/annotator.log");
        std::env::set_var("ANNOTATOR_INTRAOP_THREADS", "4");
        std::env::set_var("ANNOTATOR_INTEROP_THREADS", "2");
        std::env::set_var("ANNOTATOR_MAX_INPUT_BYTES", "65536");
        let cfg = load();

        let log = cfg.log.expect("logging configured");
        assert_eq!(log.level, "annotator_core=debug");
        assert_eq!(log.format, LogFormat::Pretty);
        assert_eq!(log.output_path, Some(PathBuf::from("/tmp/annotator.log")));
        assert_eq!(cfg.intra_op_threads, 4);
        assert_eq!(cfg.inter_op_threads, 2);
        assert_eq!(cfg.max_input_bytes, 65536);
        clear_env_vars();
    }

    #[test]
    #[serial]
    fn test_invalid_env_falls_back_to_default() {
        clear_env_vars();
        std::env::set_var("ANNOTATOR_INTRAOP_THREADS", "lots");
        std::env::set_var("ANNOTATOR_INTEROP_THREADS", "-3");
        std::env::set_var("ANNOTATOR_MAX_INPUT_BYTES", "xyz");
        std::env::set_var("ANNOTATOR_LOG", "  ");
        let cfg = load();
        assert!(cfg.log.is_none());
        assert_eq!(cfg.intra_op_threads, 0);
        assert_eq!(cfg.inter_op_threads, 0);
        assert_eq!(cfg.max_input_bytes, 256 * 1024 * 1024);
        clear_env_vars();
    }

    #[test]
    #[serial]
    fn test_max_input_bytes_floor() {
        clear_env_vars();
        std::env::set_var("ANNOTATOR_MAX_INPUT_BYTES", "0");
        let cfg = load();
        assert!(cfg.max_input_bytes >= 1024, "input limit must have floor");
        clear_env_vars();
    }

    #[test]
    #[serial]
    fn test_unknown_log_format_is_json() {
        clear_env_vars();
        std::env::set_var("ANNOTATOR_LOG", "info");
        std::env::set_var("ANNOTATOR_LOG_FORMAT", "xml");
        let cfg = load();
        assert_eq!(cfg.log.unwrap().format, LogFormat::Json);
        clear_env_vars();
    }
}
