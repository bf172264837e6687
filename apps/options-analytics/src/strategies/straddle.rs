//! Straddles and strangles.

use rust_decimal::Decimal;

use super::types::{LegQuote, Payoff, StrategyKind, StrategyResult};
use crate::analytics::validate_moneyness;
use crate::chain::{OptionType, OptionsChain, PositionSide};
use crate::error::AnalyticsError;
use crate::math::offset_by_percent;

/// Payoff of a two-leg volatility position.
///
/// Long positions risk the debit with unlimited upside; short positions keep
/// the credit with unlimited downside.
fn volatility_payoff(
    side: PositionSide,
    call_premium: Decimal,
    put_premium: Decimal,
    call_strike: Decimal,
    put_strike: Decimal,
) -> Payoff {
    let cost = (call_premium + put_premium) * side.sign();
    let (max_profit, max_loss) = match side {
        PositionSide::Long => (None, Some(-cost)),
        PositionSide::Short => (Some(cost.abs()), None),
    };
    Payoff {
        cost,
        breakeven_lower: Some(put_strike - cost.abs()),
        breakeven_upper: Some(call_strike + cost.abs()),
        max_profit,
        max_loss,
    }
}

impl OptionsChain {
    /// Straddle: call and put at one strike, both bought or both sold.
    ///
    /// The strike nearest `strike` (default: the underlying price) is used.
    /// Returns `Ok(None)` when no contract quotes the required side.
    pub fn straddle(
        &self,
        days: i64,
        strike: Option<Decimal>,
        side: PositionSide,
        underlying_price: Option<Decimal>,
    ) -> Result<Option<StrategyResult>, AnalyticsError> {
        let context = self.strategy_context(days, underlying_price)?;
        let target = strike
            .filter(|k| !k.is_zero())
            .unwrap_or(context.underlying_price);

        let Some(strike) = self.nearest_strike(
            OptionType::Call,
            context.expiration,
            target,
            Some(side.price_field()),
            false,
        ) else {
            return Ok(None);
        };

        let call = self.premium(context.expiration, strike, OptionType::Call, side);
        let put = self.premium(context.expiration, strike, OptionType::Put, side);
        let (Some(call), Some(put)) = (call, put) else {
            return Err(AnalyticsError::missing_premium(strike, strike));
        };

        let kind = match side {
            PositionSide::Long => StrategyKind::LongStraddle,
            PositionSide::Short => StrategyKind::ShortStraddle,
        };
        tracing::debug!(strategy = %kind, %strike, expiration = %context.expiration, "Priced straddle");

        Ok(Some(StrategyResult::new(
            kind,
            &context,
            LegQuote { strike, premium: call },
            LegQuote { strike, premium: put },
            volatility_payoff(side, call, put, strike, strike),
        )))
    }

    /// Strangle: OTM call and OTM put `moneyness` percent from the price.
    ///
    /// Each wing takes the nearest contract at least `moneyness` out of the
    /// money that quotes the side's price. Returns `Ok(None)` when either
    /// wing has no such contract.
    pub fn strangle(
        &self,
        days: i64,
        moneyness: Decimal,
        side: PositionSide,
        underlying_price: Option<Decimal>,
    ) -> Result<Option<StrategyResult>, AnalyticsError> {
        validate_moneyness(moneyness)?;
        let context = self.strategy_context(days, underlying_price)?;
        let price = context.underlying_price;
        let call = self.quoted_leg(
            OptionType::Call,
            context.expiration,
            offset_by_percent(price, moneyness),
            side,
            true,
        );
        let put = self.quoted_leg(
            OptionType::Put,
            context.expiration,
            offset_by_percent(price, -moneyness),
            side,
            true,
        );
        // Unquoted strikes are skipped, so a resolved wing always has a premium.
        let (Some(call), Some(put)) = (call, put) else {
            return Ok(None);
        };
        let (call_strike, put_strike) = (call.strike, put.strike);

        let kind = match side {
            PositionSide::Long => StrategyKind::LongStrangle,
            PositionSide::Short => StrategyKind::ShortStrangle,
        };
        tracing::debug!(
            strategy = %kind,
            %call_strike,
            %put_strike,
            expiration = %context.expiration,
            "Priced strangle"
        );

        Ok(Some(StrategyResult::new(
            kind,
            &context,
            call,
            put,
            volatility_payoff(side, call.premium, put.premium, call_strike, put_strike),
        )))
    }
}
