//! Batch strategy evaluation across expirations.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::StrategyResult;
use crate::chain::{OptionsChain, PositionSide};
use crate::error::AnalyticsError;

const DEFAULT_DAYS: i64 = 30;

fn default_days() -> Vec<i64> {
    vec![DEFAULT_DAYS]
}

/// Strategies to evaluate for every requested expiration.
///
/// Signed values follow the convention that a negative number selects the
/// short side; vertical pairs are `(sold, bought)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StrategyRequest {
    /// Target DTEs. `-1` evaluates every listed expiration.
    #[serde(default = "default_days")]
    pub days: Vec<i64>,
    /// Straddle strike; `0` is at-the-money, negative is short.
    #[serde(default)]
    pub straddle_strike: Option<Decimal>,
    /// Strangle moneyness percentages; negative is short.
    #[serde(default)]
    pub strangle_moneyness: Vec<Decimal>,
    /// Synthetic long strikes.
    #[serde(default)]
    pub synthetic_longs: Vec<Decimal>,
    /// Synthetic short strikes.
    #[serde(default)]
    pub synthetic_shorts: Vec<Decimal>,
    /// Vertical call spreads as `(sold, bought)` strikes.
    #[serde(default)]
    pub vertical_calls: Vec<(Decimal, Decimal)>,
    /// Vertical put spreads as `(sold, bought)` strikes.
    #[serde(default)]
    pub vertical_puts: Vec<(Decimal, Decimal)>,
}

impl Default for StrategyRequest {
    fn default() -> Self {
        Self {
            days: default_days(),
            straddle_strike: None,
            strangle_moneyness: Vec::new(),
            synthetic_longs: Vec::new(),
            synthetic_shorts: Vec::new(),
            vertical_calls: Vec::new(),
            vertical_puts: Vec::new(),
        }
    }
}

impl StrategyRequest {
    /// Whether no strategy is requested.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.straddle_strike.is_none()
            && self.strangle_moneyness.is_empty()
            && self.synthetic_longs.is_empty()
            && self.synthetic_shorts.is_empty()
            && self.vertical_calls.is_empty()
            && self.vertical_puts.is_empty()
    }
}

impl OptionsChain {
    /// Evaluate a batch of strategies.
    ///
    /// An empty request prices the at-the-money long straddle. Results are
    /// sorted by expiration and DTE with duplicates removed; strangles whose
    /// wings resolve to one strike are dropped.
    pub fn strategies(
        &self,
        request: &StrategyRequest,
    ) -> Result<Vec<StrategyResult>, AnalyticsError> {
        let days = self.resolve_days(&request.days);
        let mut results = Vec::new();

        for &dte in &days {
            if request.is_empty() {
                results.extend(self.straddle(dte, None, PositionSide::Long, None)?);
                continue;
            }

            if let Some(strike) = request.straddle_strike {
                let (strike, side) = PositionSide::from_signed(strike);
                results.extend(self.straddle(dte, Some(strike), side, None)?);
            }
            for &moneyness in &request.strangle_moneyness {
                let (moneyness, side) = PositionSide::from_signed(moneyness);
                results.extend(self.strangle(dte, moneyness, side, None)?);
            }
            for &strike in &request.synthetic_longs {
                results.extend(self.synthetic_long(dte, Some(strike), None)?);
            }
            for &strike in &request.synthetic_shorts {
                results.extend(self.synthetic_short(dte, Some(strike), None)?);
            }
            for &(sold, bought) in &request.vertical_calls {
                results.extend(self.vertical_call_spread(dte, Some(sold), Some(bought), None)?);
            }
            for &(sold, bought) in &request.vertical_puts {
                results.extend(self.vertical_put_spread(dte, Some(sold), Some(bought), None)?);
            }
        }

        results.retain(|r| !(r.strategy.is_strangle() && r.strike_1 == r.strike_2));
        results.sort_by_key(|r| (r.expiration, r.dte));
        let mut seen = HashSet::new();
        results.retain(|r| seen.insert(r.clone()));

        tracing::debug!(requested_days = days.len(), results = results.len(), "Evaluated strategies");
        Ok(results)
    }

    /// Expand `-1` into every live DTE.
    fn resolve_days(&self, days: &[i64]) -> Vec<i64> {
        let requested = if days.is_empty() { &[DEFAULT_DAYS][..] } else { days };
        if requested.contains(&-1) {
            let mut all: Vec<i64> = self.live_contracts().map(|c| c.dte).collect();
            all.sort_unstable();
            all.dedup();
            all
        } else {
            requested.to_vec()
        }
    }
}
