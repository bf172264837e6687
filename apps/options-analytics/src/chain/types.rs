//! Core option chain types.
//!
//! Defines the option type (call/put), moneyness filters, position side,
//! the raw provider record and the canonical contract produced by
//! normalization.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;

/// Default contract multiplier for equity options.
pub const DEFAULT_CONTRACT_SIZE: u32 = 100;

/// Option type (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    /// Call option (right to buy).
    Call,
    /// Put option (right to sell).
    Put,
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "call"),
            Self::Put => write!(f, "put"),
        }
    }
}

impl FromStr for OptionType {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" | "c" => Ok(Self::Call),
            "put" | "p" => Ok(Self::Put),
            _ => Err(AnalyticsError::invalid_option_type(s)),
        }
    }
}

/// Moneyness filter relative to the underlying price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Moneyness {
    /// Out of the money: calls above, puts below the underlying.
    Otm,
    /// In the money: calls below, puts above the underlying.
    Itm,
}

impl Moneyness {
    /// Whether a contract at `strike` falls on this side of `underlying`.
    ///
    /// A strike exactly at the underlying is neither OTM nor ITM.
    #[must_use]
    pub fn matches(self, option_type: OptionType, strike: Decimal, underlying: Decimal) -> bool {
        match (self, option_type) {
            (Self::Otm, OptionType::Call) | (Self::Itm, OptionType::Put) => strike > underlying,
            (Self::Otm, OptionType::Put) | (Self::Itm, OptionType::Call) => strike < underlying,
        }
    }
}

impl FromStr for Moneyness {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "otm" => Ok(Self::Otm),
            "itm" => Ok(Self::Itm),
            _ => Err(AnalyticsError::invalid_moneyness_filter(s)),
        }
    }
}

/// Position side for a strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionSide {
    /// Bought: pays the ask.
    #[default]
    Long,
    /// Sold: receives the bid.
    Short,
}

impl PositionSide {
    /// Split a signed request into its magnitude and side.
    ///
    /// Negative values select [`PositionSide::Short`]; zero and positive
    /// values select [`PositionSide::Long`].
    #[must_use]
    pub fn from_signed(value: Decimal) -> (Decimal, Self) {
        if value.is_sign_negative() && !value.is_zero() {
            (value.abs(), Self::Short)
        } else {
            (value, Self::Long)
        }
    }

    /// `1` for long, `-1` for short.
    #[must_use]
    pub const fn sign(self) -> Decimal {
        match self {
            Self::Long => Decimal::ONE,
            Self::Short => Decimal::NEGATIVE_ONE,
        }
    }

    /// Price column used to open a position on this side.
    #[must_use]
    pub const fn price_field(self) -> PriceField {
        match self {
            Self::Long => PriceField::Ask,
            Self::Short => PriceField::Bid,
        }
    }

    /// The opposite side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Long => Self::Short,
            Self::Short => Self::Long,
        }
    }
}

/// Price columns available on a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceField {
    /// Best bid.
    Bid,
    /// Best ask.
    Ask,
    /// Last traded price.
    LastTradePrice,
    /// Mark (mid) price.
    Mark,
}

/// Greeks for a single contract.
///
/// Delta and gamma are required for a contract to count as having greeks;
/// the remaining sensitivities are carried when the provider returns them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// Delta - rate of change of option price with respect to underlying price.
    pub delta: f64,
    /// Gamma - rate of change of delta with respect to underlying price.
    pub gamma: f64,
    /// Theta - time decay per day.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theta: Option<f64>,
    /// Vega - sensitivity to implied volatility.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vega: Option<f64>,
    /// Rho - sensitivity to interest rates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rho: Option<f64>,
}

impl Greeks {
    /// Dollar delta exposure for `units` shares at `spot`.
    #[must_use]
    pub fn dollar_delta(&self, units: f64, spot: f64) -> f64 {
        self.delta * units * spot
    }

    /// Dollar gamma exposure for a 1% move, for `units` shares at `spot`.
    #[must_use]
    pub fn dollar_gamma(&self, units: f64, spot: f64) -> f64 {
        self.gamma * units * spot * spot * 0.01
    }
}

/// A contract record as returned by a provider.
///
/// Every field is optional; [`crate::chain::normalize_records`] validates it
/// into an [`OptionContract`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainRecord {
    /// Provider contract symbol (e.g. OCC symbol).
    pub contract_symbol: Option<String>,
    /// Underlying ticker.
    pub underlying_symbol: Option<String>,
    /// Underlying price at snapshot time.
    pub underlying_price: Option<Decimal>,
    /// Expiration date.
    pub expiration: Option<NaiveDate>,
    /// Days to expiration, if the provider computed it.
    pub dte: Option<i64>,
    /// Strike price.
    pub strike: Option<Decimal>,
    /// Option type as a free string ("call", "put").
    pub option_type: Option<String>,
    /// Contract multiplier.
    pub contract_size: Option<u32>,
    /// Open interest.
    pub open_interest: Option<u64>,
    /// Session volume.
    pub volume: Option<u64>,
    /// Best bid.
    pub bid: Option<Decimal>,
    /// Best ask.
    pub ask: Option<Decimal>,
    /// Last traded price.
    pub last_trade_price: Option<Decimal>,
    /// Mark price.
    pub mark: Option<Decimal>,
    /// Implied volatility (decimal, 0.25 = 25%).
    pub implied_volatility: Option<f64>,
    /// Delta.
    pub delta: Option<f64>,
    /// Gamma.
    pub gamma: Option<f64>,
    /// Theta.
    pub theta: Option<f64>,
    /// Vega.
    pub vega: Option<f64>,
    /// Rho.
    pub rho: Option<f64>,
    /// Snapshot date for historical (end-of-day) chains.
    pub eod_date: Option<NaiveDate>,
}

/// A validated option contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionContract {
    /// Provider contract symbol.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_symbol: Option<String>,
    /// Expiration date.
    pub expiration: NaiveDate,
    /// Days to expiration.
    pub dte: i64,
    /// Strike price.
    pub strike: Decimal,
    /// Option type.
    pub option_type: OptionType,
    /// Contract multiplier.
    pub contract_size: u32,
    /// Open interest.
    pub open_interest: u64,
    /// Session volume.
    pub volume: Option<u64>,
    /// Best bid.
    pub bid: Option<Decimal>,
    /// Best ask.
    pub ask: Option<Decimal>,
    /// Last traded price.
    pub last_trade_price: Option<Decimal>,
    /// Mark price.
    pub mark: Option<Decimal>,
    /// Implied volatility.
    pub implied_volatility: Option<f64>,
    /// Greeks, when delta and gamma are present.
    pub greeks: Option<Greeks>,
}

impl OptionContract {
    /// Price for the given column.
    #[must_use]
    pub const fn price(&self, field: PriceField) -> Option<Decimal> {
        match field {
            PriceField::Bid => self.bid,
            PriceField::Ask => self.ask,
            PriceField::LastTradePrice => self.last_trade_price,
            PriceField::Mark => self.mark,
        }
    }

    /// Premium used for breakeven: ask, then last trade, then mark.
    #[must_use]
    pub fn reference_premium(&self) -> Option<Decimal> {
        self.ask.or(self.last_trade_price).or(self.mark)
    }

    /// Breakeven at expiration for a long position bought at `premium`.
    #[must_use]
    pub fn breakeven(&self, premium: Decimal) -> Decimal {
        match self.option_type {
            OptionType::Call => self.strike + premium,
            OptionType::Put => self.strike - premium,
        }
    }

    /// Positive implied volatility, if any.
    #[must_use]
    pub fn positive_iv(&self) -> Option<f64> {
        self.implied_volatility.filter(|iv| *iv > 0.0)
    }

    /// Share-equivalent units of open interest.
    #[must_use]
    pub fn open_interest_units(&self) -> f64 {
        self.open_interest as f64 * f64::from(self.contract_size)
    }
}
