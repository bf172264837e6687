//! Filtering and projection of the analytics frame.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::search::ExpirationSelector;
use crate::chain::{EnrichedContract, Moneyness, OptionType, OptionsChain};
use crate::error::AnalyticsError;
use crate::math::to_f64;

/// Numeric columns that can be range-filtered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterColumn {
    /// Strike price.
    Strike,
    /// Open interest.
    OpenInterest,
    /// Volume.
    Volume,
    /// Best bid.
    Bid,
    /// Best ask.
    Ask,
    /// Last traded price.
    LastTradePrice,
    /// Implied volatility.
    ImpliedVolatility,
    /// Delta.
    Delta,
    /// Gamma.
    Gamma,
    /// Theta.
    Theta,
    /// Vega.
    Vega,
    /// Rho.
    Rho,
    /// Breakeven.
    Breakeven,
    /// Dollar delta exposure.
    Dex,
    /// Dollar gamma exposure.
    Gex,
}

impl FilterColumn {
    fn value(self, row: &EnrichedContract) -> Option<f64> {
        let c = &row.contract;
        match self {
            Self::Strike => Some(to_f64(c.strike)),
            Self::OpenInterest => Some(c.open_interest as f64),
            Self::Volume => c.volume.map(|v| v as f64),
            Self::Bid => c.bid.map(to_f64),
            Self::Ask => c.ask.map(to_f64),
            Self::LastTradePrice => c.last_trade_price.map(to_f64),
            Self::ImpliedVolatility => c.implied_volatility,
            Self::Delta => c.greeks.map(|g| g.delta),
            Self::Gamma => c.greeks.map(|g| g.gamma),
            Self::Theta => c.greeks.and_then(|g| g.theta),
            Self::Vega => c.greeks.and_then(|g| g.vega),
            Self::Rho => c.greeks.and_then(|g| g.rho),
            Self::Breakeven => row.breakeven.map(to_f64),
            Self::Dex => row.dex,
            Self::Gex => row.gex,
        }
    }
}

impl FromStr for FilterColumn {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let column = match s.trim().to_ascii_lowercase().as_str() {
            "strike" => Self::Strike,
            "open_interest" => Self::OpenInterest,
            "volume" => Self::Volume,
            "bid" => Self::Bid,
            "ask" => Self::Ask,
            "last_trade_price" => Self::LastTradePrice,
            "implied_volatility" => Self::ImpliedVolatility,
            "delta" => Self::Delta,
            "gamma" => Self::Gamma,
            "theta" => Self::Theta,
            "vega" => Self::Vega,
            "rho" => Self::Rho,
            "breakeven" => Self::Breakeven,
            "dex" => Self::Dex,
            "gex" => Self::Gex,
            _ => {
                return Err(AnalyticsError::invalid_filter(format!("Unknown column '{s}'"))
                    .with_context("column", s));
            }
        };
        Ok(column)
    }
}

/// Criteria for [`OptionsChain::filter_data`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainFilter {
    /// Restrict to the nearest matching expiration.
    pub expiration: Option<ExpirationSelector>,
    /// Restrict to calls or puts.
    pub option_type: Option<OptionType>,
    /// Restrict to OTM or ITM contracts.
    pub moneyness: Option<Moneyness>,
    /// Column the value bounds apply to.
    pub column: Option<FilterColumn>,
    /// Inclusive lower bound on `column`.
    pub value_min: Option<f64>,
    /// Inclusive upper bound on `column`.
    pub value_max: Option<f64>,
}

impl ChainFilter {
    /// Filter by expiration.
    #[must_use]
    pub fn expiration(mut self, selector: impl Into<ExpirationSelector>) -> Self {
        self.expiration = Some(selector.into());
        self
    }

    /// Filter by option type.
    #[must_use]
    pub const fn option_type(mut self, option_type: OptionType) -> Self {
        self.option_type = Some(option_type);
        self
    }

    /// Filter by moneyness.
    #[must_use]
    pub const fn moneyness(mut self, moneyness: Moneyness) -> Self {
        self.moneyness = Some(moneyness);
        self
    }

    /// Bound a column's value; either side may be open.
    #[must_use]
    pub const fn range(mut self, column: FilterColumn, min: Option<f64>, max: Option<f64>) -> Self {
        self.column = Some(column);
        self.value_min = min;
        self.value_max = max;
        self
    }

    fn validate(&self) -> Result<(), AnalyticsError> {
        if self.column.is_none() && (self.value_min.is_some() || self.value_max.is_some()) {
            return Err(AnalyticsError::invalid_filter(
                "value_min/value_max require a column",
            ));
        }
        if let (Some(min), Some(max)) = (self.value_min, self.value_max) {
            if min > max {
                return Err(AnalyticsError::invalid_filter(format!(
                    "value_min {min} is greater than value_max {max}"
                )));
            }
        }
        Ok(())
    }
}

impl OptionsChain {
    /// Rows of the analytics frame matching `filter`.
    ///
    /// Filters apply in order: expiration, option type, moneyness, value
    /// range. Rows without a value for a bounded column are dropped. Output
    /// keeps chain order (expiration, strike, option type).
    pub fn filter_data(&self, filter: &ChainFilter) -> Result<Vec<EnrichedContract>, AnalyticsError> {
        filter.validate()?;
        let expiration: Option<NaiveDate> = filter
            .expiration
            .map(|selector| self.nearest_expiration(selector))
            .transpose()?;
        let bounded = filter.value_min.is_some() || filter.value_max.is_some();

        let rows = self
            .dataframe()?
            .iter()
            .filter(|row| expiration.is_none_or(|e| row.contract.expiration == e))
            .filter(|row| filter.option_type.is_none_or(|t| row.contract.option_type == t))
            .filter(|row| {
                filter.moneyness.is_none_or(|m| {
                    m.matches(row.contract.option_type, row.contract.strike, row.underlying_price)
                })
            })
            .filter(|row| {
                let Some(column) = filter.column.filter(|_| bounded) else {
                    return true;
                };
                column.value(row).is_some_and(|v| {
                    filter.value_min.is_none_or(|min| v >= min)
                        && filter.value_max.is_none_or(|max| v <= max)
                })
            })
            .cloned()
            .collect();

        Ok(rows)
    }
}
