//! Logging setup on top of `tracing-subscriber`.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Log level names accepted in configuration.
///
/// `panic` and `fatal` are accepted for compatibility with existing
/// configurations and log at error level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Panic,
    Fatal,
}

impl LogLevel {
    /// Parse a level name, case-insensitively. Unknown names mean `Info`.
    pub fn parse(level: &str) -> Self {
        match level.trim().to_ascii_lowercase().as_str() {
            "debug" => LogLevel::Debug,
            "info" => LogLevel::Info,
            "warn" | "warning" => LogLevel::Warn,
            "error" => LogLevel::Error,
            "panic" => LogLevel::Panic,
            "fatal" => LogLevel::Fatal,
            _ => LogLevel::Info,
        }
    }

    /// The `tracing` filter directive for this level.
    pub fn directive(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error | LogLevel::Panic | LogLevel::Fatal => "error",
        }
    }
}

/// Install the global subscriber. `RUST_LOG` directives still apply on top
/// of `level`, which only sets this crate's own filter.
pub fn init(level: LogLevel) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("validation_toolkit={}", level.directive()).parse()?),
        )
        .with_file(true)
        .with_line_number(true)
        .try_init()
        .map_err(|e| anyhow!(e))
}
