//! Tracing subscriber setup.
//!
//! `RUST_LOG` takes precedence over the configured level. Output goes to
//! stderr so stdout stays clean for exported tables.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Errors raised while installing the subscriber.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The configured level is not a valid filter directive.
    #[error("Invalid log level '{level}': {source}")]
    InvalidLevel {
        /// The rejected level.
        level: String,
        /// Parse error.
        source: tracing_subscriber::filter::ParseError,
    },

    /// A global subscriber was already installed.
    #[error("Failed to install tracing subscriber: {0}")]
    Install(String),
}

/// Build the filter: `RUST_LOG` if set, otherwise the configured level.
pub fn env_filter(config: &LoggingConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level).map_err(|source| TelemetryError::InvalidLevel {
        level: config.level.clone(),
        source,
    })
}

/// Install the global tracing subscriber.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TelemetryError> {
    let filter = env_filter(config)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = if config.is_json() {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| TelemetryError::Install(e.to_string()))?;

    tracing::debug!(level = %config.level, format = %config.format, "Tracing initialized");
    Ok(())
}
