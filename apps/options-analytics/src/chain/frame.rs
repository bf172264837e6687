//! The options chain and its memoized analytics frame.

use std::cell::OnceCell;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::normalize::{normalize_records, provider_underlying_price, provider_underlying_symbol};
use super::types::{ChainRecord, OptionContract, OptionType};
use crate::error::AnalyticsError;
use crate::math::to_f64;

/// Reject underlying prices that are zero or negative.
pub(crate) fn positive_price(price: Decimal) -> Result<Decimal, AnalyticsError> {
    if price > Decimal::ZERO {
        Ok(price)
    } else {
        Err(AnalyticsError::invalid_underlying_price(price))
    }
}

/// A contract augmented with derived analytics columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedContract {
    /// The source contract.
    #[serde(flatten)]
    pub contract: OptionContract,
    /// Underlying price used for the derived columns.
    pub underlying_price: Decimal,
    /// Breakeven at expiration for a long position.
    pub breakeven: Option<Decimal>,
    /// Dollar delta exposure of the open interest.
    pub dex: Option<f64>,
    /// Dollar gamma exposure of the open interest for a 1% move.
    pub gex: Option<f64>,
}

/// An immutable options chain snapshot.
///
/// The enriched frame is computed on first read and memoized. Setting or
/// clearing the last-price override discards it so the next read reflects
/// the effective price.
///
/// Instances are not `Sync`; share one chain per thread.
#[derive(Debug, Clone)]
pub struct OptionsChain {
    symbol: Option<String>,
    contracts: Vec<OptionContract>,
    provider_price: Option<Decimal>,
    last_price: Option<Decimal>,
    frame: OnceCell<Vec<EnrichedContract>>,
}

impl OptionsChain {
    /// Build a chain from provider records, deriving DTE from today (UTC).
    pub fn from_records(records: &[ChainRecord]) -> Result<Self, AnalyticsError> {
        Self::from_records_as_of(records, Utc::now().date_naive())
    }

    /// Build a chain from provider records, deriving DTE from `reference_date`.
    pub fn from_records_as_of(
        records: &[ChainRecord],
        reference_date: NaiveDate,
    ) -> Result<Self, AnalyticsError> {
        let contracts = normalize_records(records, reference_date)?;
        let chain = Self {
            symbol: provider_underlying_symbol(records),
            contracts,
            provider_price: provider_underlying_price(records),
            last_price: None,
            frame: OnceCell::new(),
        };
        tracing::debug!(
            symbol = chain.symbol.as_deref().unwrap_or("-"),
            contracts = chain.contracts.len(),
            "Options chain loaded"
        );
        Ok(chain)
    }

    /// Set the underlying symbol.
    #[must_use]
    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    /// Set the provider underlying price, replacing any per-record value.
    pub fn with_underlying_price(mut self, price: Decimal) -> Result<Self, AnalyticsError> {
        self.provider_price = Some(positive_price(price)?);
        self.frame = OnceCell::new();
        Ok(self)
    }

    /// Underlying symbol.
    #[must_use]
    pub fn underlying_symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    /// Validated contracts, sorted by expiration, strike and type.
    #[must_use]
    pub fn contracts(&self) -> &[OptionContract] {
        &self.contracts
    }

    /// Manual underlying price override, if set.
    #[must_use]
    pub const fn last_price(&self) -> Option<Decimal> {
        self.last_price
    }

    /// Override the underlying price.
    ///
    /// A non-positive price is rejected and leaves the chain unchanged.
    pub fn set_last_price(&mut self, price: Decimal) -> Result<(), AnalyticsError> {
        self.last_price = Some(positive_price(price)?);
        self.frame = OnceCell::new();
        Ok(())
    }

    /// Remove the override and revert to the provider price.
    pub fn clear_last_price(&mut self) {
        self.last_price = None;
        self.frame = OnceCell::new();
    }

    /// Effective underlying price: the override, else the provider price.
    pub fn underlying_price(&self) -> Result<Decimal, AnalyticsError> {
        self.last_price
            .or(self.provider_price)
            .ok_or_else(AnalyticsError::missing_underlying_price)
    }

    /// The enriched analytics frame.
    pub fn dataframe(&self) -> Result<&[EnrichedContract], AnalyticsError> {
        if let Some(frame) = self.frame.get() {
            return Ok(frame);
        }
        let frame = self.enrich(self.underlying_price()?);
        Ok(self.frame.get_or_init(|| frame))
    }

    fn enrich(&self, underlying_price: Decimal) -> Vec<EnrichedContract> {
        let spot = to_f64(underlying_price);
        let frame: Vec<EnrichedContract> = self
            .contracts
            .iter()
            .map(|contract| {
                let units = contract.open_interest_units();
                let breakeven = contract
                    .reference_premium()
                    .map(|premium| contract.breakeven(premium));
                let dex = contract.greeks.map(|g| g.dollar_delta(units, spot));
                let gex = contract.greeks.map(|g| {
                    let gex = g.dollar_gamma(units, spot);
                    match contract.option_type {
                        OptionType::Call => gex,
                        OptionType::Put => -gex,
                    }
                });
                EnrichedContract {
                    contract: contract.clone(),
                    underlying_price,
                    breakeven,
                    dex,
                    gex,
                }
            })
            .collect();
        tracing::debug!(
            rows = frame.len(),
            underlying_price = %underlying_price,
            "Analytics frame built"
        );
        frame
    }

    /// Distinct expirations in ascending order.
    #[must_use]
    pub fn expirations(&self) -> Vec<NaiveDate> {
        let mut expirations: Vec<NaiveDate> =
            self.contracts.iter().map(|c| c.expiration).collect();
        expirations.dedup();
        expirations
    }

    /// Distinct strikes in ascending order.
    #[must_use]
    pub fn strikes(&self) -> Vec<Decimal> {
        let mut strikes: Vec<Decimal> = self.contracts.iter().map(|c| c.strike).collect();
        strikes.sort_unstable();
        strikes.dedup();
        strikes
    }

    /// Whether any contract carries a positive implied volatility.
    #[must_use]
    pub fn has_iv(&self) -> bool {
        self.contracts.iter().any(|c| c.positive_iv().is_some())
    }

    /// Whether any contract carries greeks.
    #[must_use]
    pub fn has_greeks(&self) -> bool {
        self.contracts.iter().any(|c| c.greeks.is_some())
    }

    /// DTE for an expiration present in the chain.
    #[must_use]
    pub fn dte_for(&self, expiration: NaiveDate) -> Option<i64> {
        self.contracts
            .iter()
            .find(|c| c.expiration == expiration)
            .map(|c| c.dte)
    }

    /// Contracts with `dte >= 0`.
    pub(crate) fn live_contracts(&self) -> impl Iterator<Item = &OptionContract> {
        self.contracts.iter().filter(|c| c.dte >= 0)
    }

    /// Contract lookup by expiration, strike and type.
    pub(crate) fn contract(
        &self,
        expiration: NaiveDate,
        strike: Decimal,
        option_type: OptionType,
    ) -> Option<&OptionContract> {
        self.contracts.iter().find(|c| {
            c.expiration == expiration && c.strike == strike && c.option_type == option_type
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::testing::{call, fixture_chain, put, reference_date};
    use rust_decimal_macros::dec;

    #[test]
    fn test_dataframe_requires_underlying_price() {
        let chain =
            OptionsChain::from_records_as_of(&[call(10, dec!(100))], reference_date()).unwrap();
        let err = chain.dataframe().unwrap_err();
        assert_eq!(err.code(), ErrorCode::MissingUnderlyingPrice);
    }

    #[test]
    fn test_override_supplies_missing_price() {
        let mut chain =
            OptionsChain::from_records_as_of(&[call(10, dec!(100))], reference_date()).unwrap();
        chain.set_last_price(dec!(99)).unwrap();
        assert_eq!(chain.dataframe().unwrap()[0].underlying_price, dec!(99));

        chain.clear_last_price();
        assert!(chain.dataframe().is_err());
    }

    #[test]
    fn test_clearing_override_reverts_to_provider_price() {
        let mut chain = fixture_chain();
        assert_eq!(chain.dataframe().unwrap()[0].underlying_price, dec!(100));

        chain.set_last_price(dec!(120)).unwrap();
        assert_eq!(chain.last_price(), Some(dec!(120)));
        assert_eq!(chain.dataframe().unwrap()[0].underlying_price, dec!(120));

        chain.clear_last_price();
        assert_eq!(chain.last_price(), None);
        assert_eq!(chain.dataframe().unwrap()[0].underlying_price, dec!(100));
    }

    #[test]
    fn test_non_positive_override_is_rejected() {
        let mut chain = fixture_chain();
        for price in [dec!(0), dec!(-50)] {
            let err = chain.set_last_price(price).unwrap_err();
            assert_eq!(err.code(), ErrorCode::InvalidUnderlyingPrice);
            assert_eq!(err.context_value("underlying_price"), Some(price.to_string().as_str()));
        }
        assert_eq!(chain.last_price(), None);
        assert_eq!(chain.underlying_price().unwrap(), dec!(100));

        chain.set_last_price(dec!(120)).unwrap();
        assert!(chain.set_last_price(dec!(0)).is_err());
        assert_eq!(chain.underlying_price().unwrap(), dec!(120));
    }

    #[test]
    fn test_provider_price_must_be_positive() {
        let chain =
            OptionsChain::from_records_as_of(&[call(10, dec!(100))], reference_date()).unwrap();
        let err = chain.clone().with_underlying_price(dec!(0)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidUnderlyingPrice);

        let priced = chain.with_underlying_price(dec!(101)).unwrap();
        assert_eq!(priced.underlying_price().unwrap(), dec!(101));
    }

    #[test]
    fn test_dataframe_is_memoized() {
        let chain = fixture_chain();
        let first = chain.dataframe().unwrap().as_ptr();
        let second = chain.dataframe().unwrap().as_ptr();
        assert_eq!(first, second);
    }

    #[test]
    fn test_breakeven_uses_ask() {
        let chain = fixture_chain();
        let frame = chain.dataframe().unwrap();
        let row = frame
            .iter()
            .find(|r| {
                r.contract.dte == 10
                    && r.contract.strike == dec!(100)
                    && r.contract.option_type == OptionType::Call
            })
            .unwrap();
        let ask = row.contract.ask.unwrap();
        assert_eq!(row.breakeven, Some(dec!(100) + ask));

        let put_row = frame
            .iter()
            .find(|r| {
                r.contract.dte == 10
                    && r.contract.strike == dec!(100)
                    && r.contract.option_type == OptionType::Put
            })
            .unwrap();
        assert_eq!(
            put_row.breakeven,
            Some(dec!(100) - put_row.contract.ask.unwrap())
        );
    }

    #[test]
    fn test_exposures_sign_and_scale() {
        let mut record = put(10, dec!(100));
        record.underlying_price = Some(dec!(50));
        record.open_interest = Some(10);
        record.delta = Some(-0.5);
        record.gamma = Some(0.02);
        let chain = OptionsChain::from_records_as_of(&[record], reference_date()).unwrap();
        let row = &chain.dataframe().unwrap()[0];
        // -0.5 * 1000 shares * $50
        assert!((row.dex.unwrap() + 25_000.0).abs() < 1e-9);
        // 0.02 * 1000 * 50^2 * 0.01, negated for puts
        assert!((row.gex.unwrap() + 500.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_greeks_only_affect_their_row() {
        let mut with_greeks = call(10, dec!(100));
        with_greeks.underlying_price = Some(dec!(100));
        with_greeks.delta = Some(0.5);
        with_greeks.gamma = Some(0.01);
        let chain = OptionsChain::from_records_as_of(
            &[with_greeks, call(10, dec!(105))],
            reference_date(),
        )
        .unwrap();
        let frame = chain.dataframe().unwrap();
        assert!(frame[0].dex.is_some());
        assert!(frame[1].dex.is_none());
        assert!(frame[1].breakeven.is_some());
        assert!(chain.has_greeks());
    }

    #[test]
    fn test_expirations_and_strikes() {
        let chain = fixture_chain();
        assert_eq!(chain.expirations().len(), 2);
        assert_eq!(
            chain.strikes(),
            vec![dec!(90), dec!(95), dec!(100), dec!(105), dec!(110)]
        );
        assert!(chain.has_iv());
        assert_eq!(chain.underlying_symbol(), Some("TEST"));
    }
}
