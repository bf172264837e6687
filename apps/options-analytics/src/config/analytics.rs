//! Analytics run configuration.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analytics::ExpirationSelector;
use crate::chain::Moneyness;
use crate::strategies::StrategyRequest;

/// What the runner loads and computes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Path to the chain snapshot (JSON array of records).
    #[serde(default = "default_chain_path")]
    pub chain_path: String,
    /// Underlying symbol; overrides the symbol in the records.
    #[serde(default)]
    pub symbol: Option<String>,
    /// Manual underlying price override.
    #[serde(default)]
    pub last_price: Option<Decimal>,
    /// Snapshot date used to derive DTE; defaults to today (UTC).
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
    /// Moneyness filter applied to the open interest and volume tables.
    #[serde(default)]
    pub stats_moneyness: Option<Moneyness>,
    /// Skew expiration; days or a date.
    #[serde(default)]
    pub skew_date: Option<ExpirationSelector>,
    /// Skew moneyness percent.
    #[serde(default)]
    pub skew_moneyness: Option<Decimal>,
    /// Strategies to price.
    #[serde(default)]
    pub strategies: StrategyRequest,
    /// Output file; stdout when absent.
    #[serde(default)]
    pub output_path: Option<String>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            chain_path: default_chain_path(),
            symbol: None,
            last_price: None,
            as_of: None,
            stats_moneyness: None,
            skew_date: None,
            skew_moneyness: None,
            strategies: StrategyRequest::default(),
            output_path: None,
        }
    }
}

fn default_chain_path() -> String {
    "chain.json".to_string()
}
