//! Synthetic stock positions built from a call and a put at one strike.

use rust_decimal::Decimal;

use super::types::{LegQuote, Payoff, StrategyKind, StrategyResult};
use crate::chain::{OptionType, OptionsChain, PositionSide};
use crate::error::AnalyticsError;

impl OptionsChain {
    /// Synthetic long: long call plus short put.
    ///
    /// The strike nearest `strike` (default: the underlying price) among
    /// calls quoting an ask is used.
    pub fn synthetic_long(
        &self,
        days: i64,
        strike: Option<Decimal>,
        underlying_price: Option<Decimal>,
    ) -> Result<Option<StrategyResult>, AnalyticsError> {
        self.synthetic(PositionSide::Long, days, strike, underlying_price)
    }

    /// Synthetic short: short call plus long put.
    pub fn synthetic_short(
        &self,
        days: i64,
        strike: Option<Decimal>,
        underlying_price: Option<Decimal>,
    ) -> Result<Option<StrategyResult>, AnalyticsError> {
        self.synthetic(PositionSide::Short, days, strike, underlying_price)
    }

    fn synthetic(
        &self,
        side: PositionSide,
        days: i64,
        strike: Option<Decimal>,
        underlying_price: Option<Decimal>,
    ) -> Result<Option<StrategyResult>, AnalyticsError> {
        let context = self.strategy_context(days, underlying_price)?;
        let target = strike
            .map(|k| k.abs())
            .filter(|k| !k.is_zero())
            .unwrap_or(context.underlying_price);

        // The bought leg anchors the strike.
        let (call_side, put_side) = (side, side.opposite());
        let anchor = match side {
            PositionSide::Long => OptionType::Call,
            PositionSide::Short => OptionType::Put,
        };
        let Some(strike) = self.nearest_strike(
            anchor,
            context.expiration,
            target,
            Some(PositionSide::Long.price_field()),
            false,
        ) else {
            return Ok(None);
        };

        let call = self.premium(context.expiration, strike, OptionType::Call, call_side);
        let put = self.premium(context.expiration, strike, OptionType::Put, put_side);
        let (Some(call), Some(put)) = (call, put) else {
            return Err(AnalyticsError::missing_premium(strike, strike));
        };

        let (kind, payoff) = match side {
            PositionSide::Long => {
                let cost = call - put;
                (
                    StrategyKind::SyntheticLong,
                    Payoff {
                        cost,
                        breakeven_lower: None,
                        breakeven_upper: Some(strike + cost),
                        max_profit: None,
                        max_loss: Some(-(strike + cost)),
                    },
                )
            }
            PositionSide::Short => {
                let cost = put - call;
                (
                    StrategyKind::SyntheticShort,
                    Payoff {
                        cost,
                        breakeven_lower: Some(strike - cost),
                        breakeven_upper: None,
                        max_profit: Some(strike - cost),
                        max_loss: None,
                    },
                )
            }
        };
        tracing::debug!(strategy = %kind, %strike, expiration = %context.expiration, "Priced synthetic");

        Ok(Some(StrategyResult::new(
            kind,
            &context,
            LegQuote { strike, premium: call },
            LegQuote { strike, premium: put },
            payoff,
        )))
    }
}
