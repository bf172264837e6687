//! Configuration for the analytics runner.
//!
//! YAML with `${VAR}` / `${VAR:-default}` environment interpolation.
//!
//! # Usage
//!
//! ```rust,ignore
//! use options_analytics::config::load_config;
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//! println!("chain: {}", config.analytics.chain_path);
//! ```

mod analytics;
mod observability;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use analytics::AnalyticsConfig;
pub use observability::{LOG_FORMATS, LoggingConfig, ObservabilityConfig};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Analytics inputs and requests.
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Load configuration from a YAML file with environment variable interpolation.
///
/// `path` defaults to `config.yaml`.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or("config.yaml");

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string.
pub fn load_config_from_string(yaml: &str) -> Result<Config, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: Config = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax. Unset or empty
/// variables without a default become empty.
#[allow(clippy::expect_used)] // constant pattern
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match std::env::var(&cap[1]) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}

fn check_percent(name: &str, value: Decimal) -> Result<(), ConfigError> {
    if value.abs() > Decimal::ONE_HUNDRED {
        return Err(ConfigError::ValidationError(format!(
            "{name} must be between 0 and 100, got {value}"
        )));
    }
    Ok(())
}

/// Validate configuration values.
fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let analytics = &config.analytics;

    if analytics.chain_path.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "analytics.chain_path must not be empty".to_string(),
        ));
    }

    if let Some(price) = analytics.last_price {
        if price <= Decimal::ZERO {
            return Err(ConfigError::ValidationError(
                "analytics.last_price must be positive".to_string(),
            ));
        }
    }

    if let Some(moneyness) = analytics.skew_moneyness {
        if moneyness < Decimal::ZERO {
            return Err(ConfigError::ValidationError(
                "analytics.skew_moneyness must be between 0 and 100".to_string(),
            ));
        }
        check_percent("analytics.skew_moneyness", moneyness)?;
    }

    // Strangle moneyness is signed: negative selects the short side.
    for &moneyness in &analytics.strategies.strangle_moneyness {
        check_percent("analytics.strategies.strangle_moneyness", moneyness)?;
    }

    if analytics.strategies.days.iter().any(|&d| d < -1) {
        return Err(ConfigError::ValidationError(
            "analytics.strategies.days must be -1 or non-negative".to_string(),
        ));
    }

    let format = config.observability.logging.format.to_ascii_lowercase();
    if !LOG_FORMATS.contains(&format.as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "observability.logging.format must be one of: {LOG_FORMATS:?}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::ExpirationSelector;
    use crate::chain::Moneyness;
    use rust_decimal_macros::dec;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = load_config_from_string("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.analytics.chain_path, "chain.json");
        assert_eq!(config.analytics.strategies.days, vec![30]);
        assert_eq!(config.observability.logging.level, "info");
        assert!(!config.observability.logging.is_json());
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
analytics:
  chain_path: "data/spy.json"
  symbol: SPY
  last_price: 512.25
  as_of: 2026-01-05
  stats_moneyness: otm
  skew_date: 30
  skew_moneyness: 10
  strategies:
    days: [7, 30]
    straddle_strike: -510
    strangle_moneyness: [5, -10]
    vertical_calls: [[520, 510]]
  output_path: out.json

observability:
  logging:
    level: debug
    format: json
"#;
        let config = load_config_from_string(yaml).unwrap();
        let analytics = &config.analytics;
        assert_eq!(analytics.chain_path, "data/spy.json");
        assert_eq!(analytics.symbol.as_deref(), Some("SPY"));
        assert_eq!(analytics.last_price, Some(dec!(512.25)));
        assert_eq!(analytics.stats_moneyness, Some(Moneyness::Otm));
        assert_eq!(analytics.skew_date, Some(ExpirationSelector::Days(30)));
        assert_eq!(analytics.strategies.straddle_strike, Some(dec!(-510)));
        assert_eq!(analytics.strategies.vertical_calls, vec![(dec!(520), dec!(510))]);
        assert_eq!(analytics.output_path.as_deref(), Some("out.json"));
        assert!(config.observability.logging.is_json());
    }

    #[test]
    fn test_env_var_with_default_when_missing() {
        let input = "symbol: ${OPTIONS_ANALYTICS_TEST_NONEXISTENT_VAR:-SPY}";
        assert_eq!(interpolate_env_vars(input), "symbol: SPY");
    }

    #[test]
    #[expect(clippy::literal_string_with_formatting_args)] // ${...} is env var syntax, not format args
    fn test_env_var_with_default_uses_existing() {
        let input = "path: ${PATH:-default}";
        let result = interpolate_env_vars(input);
        assert_ne!(result, "path: default");
        assert!(result.starts_with("path: "));
    }

    #[test]
    fn test_env_var_without_default_becomes_empty() {
        let input = "output_path: ${OPTIONS_ANALYTICS_TEST_UNLIKELY_TO_EXIST}";
        assert_eq!(interpolate_env_vars(input), "output_path: ");

        // An empty value parses as absent.
        let config = load_config_from_string(&format!("analytics:\n  {input}\n")).unwrap();
        assert_eq!(config.analytics.output_path, None);
    }

    #[test]
    fn test_validation_skew_moneyness() {
        let err = load_config_from_string("analytics:\n  skew_moneyness: 150\n").unwrap_err();
        assert!(err.to_string().contains("skew_moneyness"));
    }

    #[test]
    fn test_validation_strangle_moneyness() {
        let yaml = "analytics:\n  strategies:\n    strangle_moneyness: [-120]\n";
        let err = load_config_from_string(yaml).unwrap_err();
        assert!(err.to_string().contains("strangle_moneyness"));
    }

    #[test]
    fn test_validation_log_format() {
        let yaml = "observability:\n  logging:\n    format: pretty\n";
        let err = load_config_from_string(yaml).unwrap_err();
        assert!(err.to_string().contains("format"));
    }

    #[test]
    fn test_validation_last_price() {
        let err = load_config_from_string("analytics:\n  last_price: 0\n").unwrap_err();
        assert!(err.to_string().contains("last_price"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "analytics:\n  symbol: QQQ").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.analytics.symbol.as_deref(), Some("QQQ"));

        let missing = load_config(Some("/nonexistent/options-analytics.yaml")).unwrap_err();
        assert!(matches!(missing, ConfigError::ReadError { .. }));
    }
}
