//! Tracing subscriber setup for the binary and tests
//!
//! Human-readable output by default, JSON when `LOG_FORMAT=json`. `RUST_LOG`
//! overrides the level passed on the command line.

use std::str::FromStr;
use tracing::Subscriber;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Crates whose chatter is held at `warn` unless `RUST_LOG` says otherwise
const QUIET_TARGETS: &[&str] = &["s3", "reqwest", "hyper", "hyper_util", "rustls"];

/// Logging errors
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// Level is not one of off/error/warn/info/debug/trace
    #[error("invalid log level: {0}")]
    InvalidLevel(String),

    /// Filter directives could not be parsed
    #[error("invalid log filter: {0}")]
    InvalidFilter(String),

    /// A global subscriber is already installed
    #[error("failed to install subscriber: {0}")]
    InitError(String),
}

/// Output encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Plain text lines
    #[default]
    Human,
    /// One JSON object per event
    Json,
}

/// Subscriber configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Default level, e.g. "info"
    pub level: String,
    /// Output encoding
    pub format: LogFormat,
}

impl LoggingConfig {
    /// Config with human output at `level`
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            format: LogFormat::Human,
        }
    }

    /// Config at `level`, JSON if the `LOG_FORMAT` env var is `json`
    pub fn from_env(level: impl Into<String>) -> Self {
        let json = std::env::var("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        Self::new(level).with_format(if json { LogFormat::Json } else { LogFormat::Human })
    }

    /// Set the output encoding
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Filter for this config; `RUST_LOG` wins when set and valid
    pub fn env_filter(&self) -> Result<EnvFilter, LoggingError> {
        let directives = self.directives()?;
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }
        EnvFilter::try_new(directives).map_err(|e| LoggingError::InvalidFilter(e.to_string()))
    }

    /// Directive string built from `level`
    pub fn directives(&self) -> Result<String, LoggingError> {
        let level = LevelFilter::from_str(self.level.trim())
            .map_err(|_| LoggingError::InvalidLevel(self.level.clone()))?;

        let mut directives = level.to_string().to_lowercase();
        for target in QUIET_TARGETS {
            directives.push_str(&format!(",{target}=warn"));
        }
        Ok(directives)
    }

    /// Build a subscriber that writes to `writer`
    pub fn subscriber<W>(
        &self,
        writer: W,
    ) -> Result<Box<dyn Subscriber + Send + Sync>, LoggingError>
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let filter = self.env_filter()?;
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer);

        Ok(match self.format {
            LogFormat::Json => Box::new(builder.json().finish()),
            LogFormat::Human => Box::new(builder.finish()),
        })
    }

    /// Install the global subscriber on stderr
    pub fn init(&self) -> Result<(), LoggingError> {
        self.init_with_writer(std::io::stderr)
    }

    /// Install the global subscriber on `writer`
    pub fn init_with_writer<W>(&self, writer: W) -> Result<(), LoggingError>
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        self.subscriber(writer)?
            .try_init()
            .map_err(|e| LoggingError::InitError(e.to_string()))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new("info")
    }
}
