//! One-shot analytics report over a chain.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::analytics::{SkewTable, StatSummary};
use crate::chain::OptionsChain;
use crate::config::AnalyticsConfig;
use crate::error::AnalyticsError;
use crate::strategies::StrategyResult;

/// Every table the runner produces for a chain.
///
/// Exposure and skew tables are absent when the chain carries no greeks or
/// no implied volatility.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    /// Underlying symbol.
    pub symbol: Option<String>,
    /// Effective underlying price.
    pub underlying_price: Decimal,
    /// Listed expirations.
    pub expirations: Vec<NaiveDate>,
    /// Open interest by strike and expiration.
    pub open_interest: StatSummary,
    /// Volume by strike and expiration.
    pub volume: StatSummary,
    /// Dollar delta exposure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dex: Option<StatSummary>,
    /// Dollar gamma exposure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gex: Option<StatSummary>,
    /// Implied volatility skew.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skew: Option<SkewTable>,
    /// Priced strategies.
    pub strategies: Vec<StrategyResult>,
}

/// Run the configured analytics against `chain`.
pub fn build_report(
    chain: &OptionsChain,
    config: &AnalyticsConfig,
) -> Result<AnalyticsReport, AnalyticsError> {
    let moneyness = config.stats_moneyness;
    let underlying_price = chain.underlying_price()?;

    let (dex, gex) = if chain.has_greeks() {
        (
            Some(chain.total_dex(moneyness, None)?),
            Some(chain.total_gex(moneyness, None)?),
        )
    } else {
        tracing::debug!("Chain has no greeks; skipping exposure tables");
        (None, None)
    };

    let skew = if chain.has_iv() {
        Some(chain.skew(config.skew_date, config.skew_moneyness)?)
    } else {
        tracing::debug!("Chain has no implied volatility; skipping skew");
        None
    };

    let report = AnalyticsReport {
        symbol: chain.underlying_symbol().map(str::to_string),
        underlying_price,
        expirations: chain.expirations(),
        open_interest: chain.total_oi(moneyness, None)?,
        volume: chain.total_volume(moneyness, None)?,
        dex,
        gex,
        skew,
        strategies: chain.strategies(&config.strategies)?,
    };

    tracing::info!(
        symbol = report.symbol.as_deref().unwrap_or("-"),
        underlying_price = %report.underlying_price,
        expirations = report.expirations.len(),
        strategies = report.strategies.len(),
        "Analytics report built"
    );
    Ok(report)
}
