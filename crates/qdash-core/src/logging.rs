#![forbid(unsafe_code)]

//! Logging configuration and subscriber installation.
//!
//! Library crates only emit `tracing` events; binaries decide where they go.
//! With the `tracing-json` feature enabled, [`LogConfig::install`] sets up a
//! `tracing-subscriber` registry with an `EnvFilter` and either a human or a
//! JSON formatting layer.

use std::env;
use std::fmt;

/// Environment variable holding the filter directive (e.g. `qdash=debug`).
pub const ENV_LOG: &str = "QDASH_LOG";

/// Environment variable selecting the output format (`human` or `json`).
pub const ENV_LOG_FORMAT: &str = "QDASH_LOG_FORMAT";

/// Filter used when [`ENV_LOG`] is not set.
pub const DEFAULT_FILTER: &str = "warn";

/// Output format for installed subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Compact human-readable lines.
    #[default]
    Human,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parse a format name; unknown names map to `None`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "human" | "text" | "pretty" => Some(Self::Human),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Logging setup for a binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `EnvFilter` directive string.
    pub filter: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_owned(),
            format: LogFormat::Human,
        }
    }
}

impl LogConfig {
    /// Read [`ENV_LOG`] and [`ENV_LOG_FORMAT`], falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(filter) = env::var(ENV_LOG)
            && !filter.trim().is_empty()
        {
            config.filter = filter;
        }
        if let Ok(name) = env::var(ENV_LOG_FORMAT)
            && let Some(format) = LogFormat::from_name(&name)
        {
            config.format = format;
        }
        config
    }

    /// Install a global subscriber writing to stderr.
    #[cfg(feature = "tracing-json")]
    pub fn install(&self) -> Result<(), LoggingError> {
        use tracing_subscriber::EnvFilter;
        use tracing_subscriber::layer::SubscriberExt;
        use tracing_subscriber::util::SubscriberInitExt;

        let filter = EnvFilter::try_new(&self.filter)
            .map_err(|e| LoggingError::InvalidFilter(e.to_string()))?;
        let registry = tracing_subscriber::registry().with(filter);

        let result = match self.format {
            LogFormat::Human => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .compact()
                        .with_writer(std::io::stderr),
                )
                .try_init(),
            LogFormat::Json => registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .try_init(),
        };
        result.map_err(|_| LoggingError::AlreadyInstalled)
    }
}

/// Errors from subscriber installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggingError {
    /// A global subscriber was already set.
    AlreadyInstalled,
    /// The filter directive did not parse.
    InvalidFilter(String),
}

impl fmt::Display for LoggingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyInstalled => write!(f, "a global tracing subscriber is already set"),
            Self::InvalidFilter(msg) => write!(f, "invalid log filter: {msg}"),
        }
    }
}

impl std::error::Error for LoggingError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_names() {
        assert_eq!(LogFormat::from_name("JSON"), Some(LogFormat::Json));
        assert_eq!(LogFormat::from_name(" human "), Some(LogFormat::Human));
        assert_eq!(LogFormat::from_name("xml"), None);
    }

    #[test]
    fn default_config() {
        let config = LogConfig::default();
        assert_eq!(config.filter, "warn");
        assert_eq!(config.format, LogFormat::Human);
    }
}
