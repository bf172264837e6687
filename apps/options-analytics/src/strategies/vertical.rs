//! Vertical spreads.
//!
//! One option type, one expiration, two strikes: the sold leg is priced at
//! the bid and the bought leg at the ask. A positive cost is a debit spread,
//! a negative cost a credit spread.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::types::{Payoff, StrategyKind, StrategyResult};
use crate::chain::{OptionType, OptionsChain, PositionSide};
use crate::error::AnalyticsError;
use crate::math::offset_by_percent;

/// Default distance of the sold leg from the underlying, in percent.
const DEFAULT_SPREAD_WIDTH_PCT: Decimal = dec!(5);

fn spread_kind(option_type: OptionType, debit: bool) -> StrategyKind {
    match (option_type, debit) {
        (OptionType::Call, true) => StrategyKind::BullCallSpread,
        (OptionType::Call, false) => StrategyKind::BearCallSpread,
        (OptionType::Put, true) => StrategyKind::BearPutSpread,
        (OptionType::Put, false) => StrategyKind::BullPutSpread,
    }
}

fn spread_payoff(
    option_type: OptionType,
    sold_strike: Decimal,
    bought_strike: Decimal,
    cost: Decimal,
) -> Payoff {
    let width = (sold_strike - bought_strike).abs();
    let debit = cost > Decimal::ZERO;

    let (max_profit, max_loss) = if debit {
        (width - cost, -cost)
    } else {
        (cost.abs(), -(width - cost.abs()))
    };

    // Debit spreads break even off the bought strike, credit spreads off the sold one.
    let breakeven = match (option_type, debit) {
        (OptionType::Call, true) => bought_strike + cost,
        (OptionType::Call, false) => sold_strike + cost.abs(),
        (OptionType::Put, true) => bought_strike - cost,
        (OptionType::Put, false) => sold_strike - cost.abs(),
    };
    let (breakeven_lower, breakeven_upper) = match option_type {
        OptionType::Call => (None, Some(breakeven)),
        OptionType::Put => (Some(breakeven), None),
    };

    Payoff {
        cost,
        breakeven_lower,
        breakeven_upper,
        max_profit: Some(max_profit),
        max_loss: Some(max_loss),
    }
}

impl OptionsChain {
    /// Vertical call spread.
    ///
    /// Strikes snap to the nearest contract quoting the leg's side: the bid
    /// for the sold leg, the ask for the bought leg. The bought leg defaults
    /// to at-the-money and the sold leg to 5% above the price. Strike inputs
    /// are taken by magnitude; zero means the default. Returns `Ok(None)` when
    /// both legs resolve to the same strike or the spread costs nothing.
    pub fn vertical_call_spread(
        &self,
        days: i64,
        sold_strike: Option<Decimal>,
        bought_strike: Option<Decimal>,
        underlying_price: Option<Decimal>,
    ) -> Result<Option<StrategyResult>, AnalyticsError> {
        self.vertical_spread(OptionType::Call, days, sold_strike, bought_strike, underlying_price)
    }

    /// Vertical put spread.
    ///
    /// As [`Self::vertical_call_spread`], with the sold leg defaulting to 5%
    /// below the price.
    pub fn vertical_put_spread(
        &self,
        days: i64,
        sold_strike: Option<Decimal>,
        bought_strike: Option<Decimal>,
        underlying_price: Option<Decimal>,
    ) -> Result<Option<StrategyResult>, AnalyticsError> {
        self.vertical_spread(OptionType::Put, days, sold_strike, bought_strike, underlying_price)
    }

    fn vertical_spread(
        &self,
        option_type: OptionType,
        days: i64,
        sold_strike: Option<Decimal>,
        bought_strike: Option<Decimal>,
        underlying_price: Option<Decimal>,
    ) -> Result<Option<StrategyResult>, AnalyticsError> {
        let context = self.strategy_context(days, underlying_price)?;
        let price = context.underlying_price;
        let expiration = context.expiration;

        let default_sold = match option_type {
            OptionType::Call => offset_by_percent(price, DEFAULT_SPREAD_WIDTH_PCT),
            OptionType::Put => offset_by_percent(price, -DEFAULT_SPREAD_WIDTH_PCT),
        };
        let sold_target = sold_strike
            .map(|k| k.abs())
            .filter(|k| !k.is_zero())
            .unwrap_or(default_sold);
        let bought_target = bought_strike
            .map(|k| k.abs())
            .filter(|k| !k.is_zero())
            .unwrap_or(price);

        let sold_leg =
            self.quoted_leg(option_type, expiration, sold_target, PositionSide::Short, false);
        let bought_leg =
            self.quoted_leg(option_type, expiration, bought_target, PositionSide::Long, false);
        // Unquoted strikes are skipped, so resolved legs always carry a premium.
        let (Some(sold_leg), Some(bought_leg)) = (sold_leg, bought_leg) else {
            return Ok(None);
        };
        let (sold, bought) = (sold_leg.strike, bought_leg.strike);
        if sold == bought {
            tracing::debug!(%option_type, strike = %sold, "Vertical spread legs resolved to one strike");
            return Ok(None);
        }

        let cost = bought_leg.premium - sold_leg.premium;
        if cost.is_zero() {
            tracing::debug!(%option_type, %sold, %bought, "Vertical spread has zero cost");
            return Ok(None);
        }

        let kind = spread_kind(option_type, cost > Decimal::ZERO);
        tracing::debug!(strategy = %kind, %sold, %bought, %expiration, "Priced vertical spread");

        Ok(Some(StrategyResult::new(
            kind,
            &context,
            sold_leg,
            bought_leg,
            spread_payoff(option_type, sold, bought, cost),
        )))
    }
}
