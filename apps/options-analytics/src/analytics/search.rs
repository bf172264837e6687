//! Nearest expiration and strike resolution.
//!
//! Turns fuzzy requests ("30 days", "5% OTM") into an expiration and strike
//! present in the chain. Only contracts with `dte >= 0` are candidates. Ties
//! resolve to the first candidate in chain order (earliest expiration,
//! lowest strike).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::chain::{OptionType, OptionsChain, PriceField, positive_price};
use crate::error::AnalyticsError;
use crate::math::offset_by_percent;

/// How an expiration is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExpirationSelector {
    /// Days to expiration. `0` means the nearest available expiration; in
    /// skew requests `-1` means every expiration.
    Days(i64),
    /// A calendar date, matched to the nearest listed expiration.
    Date(NaiveDate),
}

impl ExpirationSelector {
    /// Whether this selects every expiration.
    #[must_use]
    pub const fn is_all(self) -> bool {
        matches!(self, Self::Days(-1))
    }
}

impl From<i64> for ExpirationSelector {
    fn from(days: i64) -> Self {
        Self::Days(days)
    }
}

impl From<NaiveDate> for ExpirationSelector {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

/// Nearest OTM call and put strikes at a given moneyness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtmStrikes {
    /// Call strike at or above `price * (1 + moneyness)`.
    pub call: Option<Decimal>,
    /// Put strike at or below `price * (1 - moneyness)`.
    pub put: Option<Decimal>,
}

/// Reject moneyness outside the 0-100 percent range.
pub(crate) fn validate_moneyness(moneyness: Decimal) -> Result<(), AnalyticsError> {
    if moneyness < Decimal::ZERO || moneyness > Decimal::ONE_HUNDRED {
        return Err(AnalyticsError::invalid_moneyness(moneyness));
    }
    Ok(())
}

impl OptionsChain {
    /// Resolve a request to the nearest listed expiration with `dte >= 0`.
    pub fn nearest_expiration(
        &self,
        selector: impl Into<ExpirationSelector>,
    ) -> Result<NaiveDate, AnalyticsError> {
        let mut live: Vec<(NaiveDate, i64)> =
            self.live_contracts().map(|c| (c.expiration, c.dte)).collect();
        live.dedup();

        let nearest = match selector.into() {
            ExpirationSelector::Days(days) => {
                let days = if days == 0 { -1 } else { days };
                live.iter().min_by_key(|(_, dte)| (dte - days).abs())
            }
            ExpirationSelector::Date(date) => live
                .iter()
                .min_by_key(|(expiration, _)| (*expiration - date).num_days().abs()),
        };

        nearest
            .map(|(expiration, _)| *expiration)
            .ok_or_else(AnalyticsError::expiration_not_found)
    }

    /// Nearest strike for an option type at an expiration.
    ///
    /// With `force_otm`, calls keep strikes at or above `target` and take the
    /// lowest; puts keep strikes at or below and take the highest. Otherwise
    /// the strike closest to `target` wins. When `price_field` is set, only
    /// contracts quoting that price are candidates. Returns `None` when no
    /// candidate remains.
    #[must_use]
    pub fn nearest_strike(
        &self,
        option_type: OptionType,
        expiration: NaiveDate,
        target: Decimal,
        price_field: Option<PriceField>,
        force_otm: bool,
    ) -> Option<Decimal> {
        let candidates = self
            .live_contracts()
            .filter(|c| c.expiration == expiration && c.option_type == option_type)
            .filter(|c| price_field.is_none_or(|field| c.price(field).is_some()))
            .map(|c| c.strike);

        if force_otm {
            match option_type {
                OptionType::Call => candidates.filter(|k| *k >= target).min(),
                OptionType::Put => candidates.filter(|k| *k <= target).max(),
            }
        } else {
            candidates.min_by_key(|k| (*k - target).abs())
        }
    }

    /// Nearest OTM call and put strikes `moneyness` percent from the price.
    ///
    /// `underlying_price` defaults to the chain's effective price.
    pub fn nearest_otm_strikes(
        &self,
        expiration: NaiveDate,
        underlying_price: Option<Decimal>,
        moneyness: Decimal,
    ) -> Result<OtmStrikes, AnalyticsError> {
        validate_moneyness(moneyness)?;
        let price = match underlying_price {
            Some(price) => positive_price(price)?,
            None => self.underlying_price()?,
        };

        let call_target = offset_by_percent(price, moneyness);
        let put_target = offset_by_percent(price, -moneyness);

        Ok(OtmStrikes {
            call: self.nearest_strike(OptionType::Call, expiration, call_target, None, true),
            put: self.nearest_strike(OptionType::Put, expiration, put_target, None, true),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::testing::{FAR_DTE, NEAR_DTE, call, expiration_for, fixture_chain, reference_date};
    use rust_decimal_macros::dec;
    use test_case::test_case;

    #[test_case(30, FAR_DTE ; "thirty days picks 45 over 10")]
    #[test_case(20, NEAR_DTE ; "twenty days picks 10")]
    #[test_case(0, NEAR_DTE ; "zero means nearest available")]
    #[test_case(-5, NEAR_DTE ; "negative still resolves to nearest live")]
    #[test_case(400, FAR_DTE ; "beyond the chain picks the last")]
    fn test_nearest_expiration_by_days(days: i64, expected_dte: i64) {
        let chain = fixture_chain();
        assert_eq!(
            chain.nearest_expiration(days).unwrap(),
            expiration_for(expected_dte)
        );
    }

    #[test]
    fn test_nearest_expiration_tie_takes_first() {
        // 10 and 44 are both 17 days from 27
        let records = vec![call(10, dec!(100)), call(44, dec!(100))];
        let tied = OptionsChain::from_records_as_of(&records, reference_date()).unwrap();
        assert_eq!(tied.nearest_expiration(27).unwrap(), expiration_for(10));
    }

    #[test]
    fn test_nearest_expiration_by_date() {
        let chain = fixture_chain();
        let date = expiration_for(40);
        assert_eq!(chain.nearest_expiration(date).unwrap(), expiration_for(FAR_DTE));
    }

    #[test]
    fn test_expired_contracts_are_ignored() {
        let records = vec![call(-3, dec!(100)), call(60, dec!(100))];
        let chain = OptionsChain::from_records_as_of(&records, reference_date()).unwrap();
        assert_eq!(chain.nearest_expiration(1).unwrap(), expiration_for(60));

        let expired = OptionsChain::from_records_as_of(&records[..1], reference_date()).unwrap();
        let err = expired.nearest_expiration(1).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ExpirationNotFound);
    }

    #[test]
    fn test_nearest_strike_plain() {
        let chain = fixture_chain();
        let exp = expiration_for(NEAR_DTE);
        assert_eq!(
            chain.nearest_strike(OptionType::Call, exp, dec!(103), None, false),
            Some(dec!(105))
        );
        // 97.5 is equidistant from 95 and 100; the lower strike comes first
        assert_eq!(
            chain.nearest_strike(OptionType::Put, exp, dec!(97.5), None, false),
            Some(dec!(95))
        );
    }

    #[test]
    fn test_nearest_strike_force_otm() {
        let chain = fixture_chain();
        let exp = expiration_for(NEAR_DTE);
        assert_eq!(
            chain.nearest_strike(OptionType::Call, exp, dec!(101), None, true),
            Some(dec!(105))
        );
        assert_eq!(
            chain.nearest_strike(OptionType::Put, exp, dec!(99), None, true),
            Some(dec!(95))
        );
        assert_eq!(
            chain.nearest_strike(OptionType::Call, exp, dec!(111), None, true),
            None
        );
        assert_eq!(
            chain.nearest_strike(OptionType::Put, exp, dec!(89), None, true),
            None
        );
    }

    #[test]
    fn test_nearest_strike_requires_price_field() {
        let mut unquoted = call(NEAR_DTE, dec!(100));
        unquoted.ask = None;
        let records = vec![unquoted, call(NEAR_DTE, dec!(105))];
        let chain = OptionsChain::from_records_as_of(&records, reference_date()).unwrap();
        let exp = expiration_for(NEAR_DTE);
        assert_eq!(
            chain.nearest_strike(OptionType::Call, exp, dec!(100), Some(PriceField::Ask), false),
            Some(dec!(105))
        );
        assert_eq!(
            chain.nearest_strike(OptionType::Call, exp, dec!(100), Some(PriceField::Bid), false),
            Some(dec!(100))
        );
    }

    #[test]
    fn test_nearest_otm_strikes() {
        let chain = fixture_chain();
        let exp = expiration_for(NEAR_DTE);
        let strikes = chain.nearest_otm_strikes(exp, None, dec!(3)).unwrap();
        assert_eq!(strikes.call, Some(dec!(105)));
        assert_eq!(strikes.put, Some(dec!(95)));

        let wide = chain.nearest_otm_strikes(exp, Some(dec!(100)), dec!(50)).unwrap();
        assert_eq!(wide.call, None);
        assert_eq!(wide.put, None);
    }

    #[test_case(dec!(-1) ; "negative")]
    #[test_case(dec!(100.5) ; "above one hundred")]
    fn test_nearest_otm_strikes_rejects_moneyness(moneyness: Decimal) {
        let chain = fixture_chain();
        let err = chain
            .nearest_otm_strikes(expiration_for(NEAR_DTE), None, moneyness)
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidMoneyness);
    }

    #[test_case(dec!(0) ; "zero")]
    #[test_case(dec!(-50) ; "negative")]
    fn test_nearest_otm_strikes_rejects_price(price: Decimal) {
        let chain = fixture_chain();
        let err = chain
            .nearest_otm_strikes(expiration_for(NEAR_DTE), Some(price), dec!(10))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidUnderlyingPrice);
    }

    #[test]
    fn test_selector_all() {
        assert!(ExpirationSelector::Days(-1).is_all());
        assert!(!ExpirationSelector::Days(30).is_all());
    }
}
