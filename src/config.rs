use crate::logging::LogLevel;
use crate::validation::FieldNameStrategy;
use anyhow::{Context, Result};

#[derive(Debug, Clone)]
pub struct Config {
    // Logging
    pub log_level: LogLevel,

    // Locale resources
    pub locales_base_url: Option<String>,
    pub http_timeout_secs: u64,

    // Messages
    pub field_names: FieldNameStrategy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Logging
            log_level: std::env::var("LOG_LEVEL")
                .map(|v| LogLevel::parse(&v))
                .unwrap_or_default(),

            // Locale resources - bundled files are used when unset
            locales_base_url: std::env::var("LOCALES_BASE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),

            // Messages
            field_names: std::env::var("FIELD_NAME_STRATEGY")
                .ok()
                .map(|v| v.parse::<FieldNameStrategy>())
                .transpose()
                .context("FIELD_NAME_STRATEGY is invalid")?
                .unwrap_or_default(),
        })
    }
}
