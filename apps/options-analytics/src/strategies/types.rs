//! Strategy result types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::analytics::ExpirationSelector;
use crate::chain::{OptionType, OptionsChain, PositionSide, positive_price};
use crate::error::AnalyticsError;
use crate::math::round_ratio;

/// Type of options strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKind {
    /// Long call + long put, same strike.
    #[serde(rename = "Long Straddle")]
    LongStraddle,
    /// Short call + short put, same strike.
    #[serde(rename = "Short Straddle")]
    ShortStraddle,
    /// Long OTM call + long OTM put.
    #[serde(rename = "Long Strangle")]
    LongStrangle,
    /// Short OTM call + short OTM put.
    #[serde(rename = "Short Strangle")]
    ShortStrangle,
    /// Debit call vertical.
    #[serde(rename = "Bull Call Spread")]
    BullCallSpread,
    /// Credit call vertical.
    #[serde(rename = "Bear Call Spread")]
    BearCallSpread,
    /// Credit put vertical.
    #[serde(rename = "Bull Put Spread")]
    BullPutSpread,
    /// Debit put vertical.
    #[serde(rename = "Bear Put Spread")]
    BearPutSpread,
    /// Long call + short put, same strike.
    #[serde(rename = "Synthetic Long")]
    SyntheticLong,
    /// Short call + long put, same strike.
    #[serde(rename = "Synthetic Short")]
    SyntheticShort,
}

impl StrategyKind {
    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::LongStraddle => "Long Straddle",
            Self::ShortStraddle => "Short Straddle",
            Self::LongStrangle => "Long Strangle",
            Self::ShortStrangle => "Short Strangle",
            Self::BullCallSpread => "Bull Call Spread",
            Self::BearCallSpread => "Bear Call Spread",
            Self::BullPutSpread => "Bull Put Spread",
            Self::BearPutSpread => "Bear Put Spread",
            Self::SyntheticLong => "Synthetic Long",
            Self::SyntheticShort => "Synthetic Short",
        }
    }

    /// Whether this is a strangle.
    #[must_use]
    pub const fn is_strangle(self) -> bool {
        matches!(self, Self::LongStrangle | Self::ShortStrangle)
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A strike and the premium paid or received for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LegQuote {
    pub strike: Decimal,
    pub premium: Decimal,
}

/// Cost and payoff profile of a strategy. `None` bounds are unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Payoff {
    pub cost: Decimal,
    pub breakeven_lower: Option<Decimal>,
    pub breakeven_upper: Option<Decimal>,
    pub max_profit: Option<Decimal>,
    pub max_loss: Option<Decimal>,
}

/// Expiration and price a strategy is evaluated against.
#[derive(Debug, Clone)]
pub(crate) struct StrategyContext {
    pub symbol: Option<String>,
    pub underlying_price: Decimal,
    pub expiration: NaiveDate,
    pub dte: i64,
}

/// One priced strategy.
///
/// Strike 1 is the call leg (the sold leg for verticals); Strike 2 is the put
/// leg (the bought leg for verticals). Premiums are quoted prices per share.
/// `Max Profit`/`Max Loss` are `None` when unlimited, and `Payoff Ratio` is
/// `None` unless both are finite.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StrategyResult {
    /// Strategy name.
    #[serde(rename = "Strategy")]
    pub strategy: StrategyKind,
    /// Underlying symbol.
    #[serde(rename = "Symbol")]
    pub symbol: Option<String>,
    /// Underlying price used.
    #[serde(rename = "Underlying Price")]
    pub underlying_price: Decimal,
    /// Expiration date.
    #[serde(rename = "Expiration")]
    pub expiration: NaiveDate,
    /// Days to expiration.
    #[serde(rename = "DTE")]
    pub dte: i64,
    /// First leg strike.
    #[serde(rename = "Strike 1")]
    pub strike_1: Decimal,
    /// First leg premium.
    #[serde(rename = "Strike 1 Premium")]
    pub strike_1_premium: Decimal,
    /// Second leg strike.
    #[serde(rename = "Strike 2")]
    pub strike_2: Decimal,
    /// Second leg premium.
    #[serde(rename = "Strike 2 Premium")]
    pub strike_2_premium: Decimal,
    /// Net cost per share; negative is a credit.
    #[serde(rename = "Cost")]
    pub cost: Decimal,
    /// Cost as a percent of the underlying price.
    #[serde(rename = "Cost %")]
    pub cost_percent: Decimal,
    /// Lower breakeven at expiration.
    #[serde(rename = "Breakeven Lower")]
    pub breakeven_lower: Option<Decimal>,
    /// Upper breakeven at expiration.
    #[serde(rename = "Breakeven Upper")]
    pub breakeven_upper: Option<Decimal>,
    /// Maximum profit per share.
    #[serde(rename = "Max Profit")]
    pub max_profit: Option<Decimal>,
    /// Maximum loss per share, as a negative number.
    #[serde(rename = "Max Loss")]
    pub max_loss: Option<Decimal>,
    /// `|Max Profit / Max Loss|`.
    #[serde(rename = "Payoff Ratio")]
    pub payoff_ratio: Option<Decimal>,
}

impl StrategyResult {
    pub(crate) fn new(
        strategy: StrategyKind,
        context: &StrategyContext,
        first: LegQuote,
        second: LegQuote,
        payoff: Payoff,
    ) -> Self {
        let cost_percent =
            round_ratio(payoff.cost / context.underlying_price * Decimal::ONE_HUNDRED);
        let payoff_ratio = match (payoff.max_profit, payoff.max_loss) {
            (Some(profit), Some(loss)) if !loss.is_zero() => Some(round_ratio((profit / loss).abs())),
            _ => None,
        };

        Self {
            strategy,
            symbol: context.symbol.clone(),
            underlying_price: context.underlying_price,
            expiration: context.expiration,
            dte: context.dte,
            strike_1: first.strike,
            strike_1_premium: first.premium,
            strike_2: second.strike,
            strike_2_premium: second.premium,
            cost: payoff.cost,
            cost_percent,
            breakeven_lower: payoff.breakeven_lower,
            breakeven_upper: payoff.breakeven_upper,
            max_profit: payoff.max_profit,
            max_loss: payoff.max_loss,
            payoff_ratio,
        }
    }
}

impl OptionsChain {
    /// Resolve the expiration and price a strategy is evaluated against.
    pub(crate) fn strategy_context(
        &self,
        days: i64,
        underlying_price: Option<Decimal>,
    ) -> Result<StrategyContext, AnalyticsError> {
        let underlying_price = match underlying_price {
            Some(price) => positive_price(price)?,
            None => self.underlying_price()?,
        };
        let expiration = self.nearest_expiration(ExpirationSelector::Days(days))?;
        let dte = self
            .dte_for(expiration)
            .ok_or_else(AnalyticsError::expiration_not_found)?;
        Ok(StrategyContext {
            symbol: self.underlying_symbol().map(str::to_string),
            underlying_price,
            expiration,
            dte,
        })
    }

    /// Nearest contract to `target` quoting the price `side` opens at.
    pub(crate) fn quoted_leg(
        &self,
        option_type: OptionType,
        expiration: NaiveDate,
        target: Decimal,
        side: PositionSide,
        force_otm: bool,
    ) -> Option<LegQuote> {
        let field = Some(side.price_field());
        let strike = self.nearest_strike(option_type, expiration, target, field, force_otm)?;
        let premium = self.premium(expiration, strike, option_type, side)?;
        Some(LegQuote { strike, premium })
    }

    /// Premium for opening `side` on a contract.
    pub(crate) fn premium(
        &self,
        expiration: NaiveDate,
        strike: Decimal,
        option_type: OptionType,
        side: PositionSide,
    ) -> Option<Decimal> {
        self.contract(expiration, strike, option_type)
            .and_then(|c| c.price(side.price_field()))
    }
}
