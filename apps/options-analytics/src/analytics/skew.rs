//! Implied volatility skew.
//!
//! Vertical skew compares each contract's IV to the at-the-money IV of the
//! same type and expiration. Horizontal skew compares the OTM put and OTM
//! call equidistant from the underlying, per expiration. Only contracts with
//! positive IV participate.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::search::{ExpirationSelector, validate_moneyness};
use crate::chain::{OptionContract, OptionType, OptionsChain};
use crate::error::AnalyticsError;
use crate::math::{offset_by_percent, round4};

const DEFAULT_SKEW_DAYS: i64 = 30;
const DEFAULT_SKEW_MONEYNESS: Decimal = dec!(20);

/// One contract's IV relative to ATM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerticalSkewRow {
    /// Expiration date.
    #[serde(rename = "Expiration")]
    pub expiration: NaiveDate,
    /// Strike price.
    #[serde(rename = "Strike")]
    pub strike: Decimal,
    /// Option type.
    #[serde(rename = "Option Type")]
    pub option_type: OptionType,
    /// Contract IV.
    #[serde(rename = "IV")]
    pub iv: f64,
    /// ATM IV for the same type and expiration.
    #[serde(rename = "ATM IV")]
    pub atm_iv: f64,
    /// `iv - atm_iv`.
    #[serde(rename = "Skew")]
    pub skew: f64,
}

/// OTM put versus OTM call IV for one expiration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HorizontalSkewRow {
    /// Expiration date.
    #[serde(rename = "Expiration")]
    pub expiration: NaiveDate,
    /// Days to expiration.
    #[serde(rename = "DTE")]
    pub dte: i64,
    /// OTM call strike.
    #[serde(rename = "Call Strike")]
    pub call_strike: Decimal,
    /// OTM call IV.
    #[serde(rename = "Call IV")]
    pub call_iv: f64,
    /// OTM call IV minus ATM call IV.
    #[serde(rename = "Call Skew")]
    pub call_skew: f64,
    /// OTM put strike.
    #[serde(rename = "Put Strike")]
    pub put_strike: Decimal,
    /// OTM put IV.
    #[serde(rename = "Put IV")]
    pub put_iv: f64,
    /// OTM put IV minus ATM put IV.
    #[serde(rename = "Put Skew")]
    pub put_skew: f64,
    /// `put_iv - call_iv`.
    #[serde(rename = "Skew")]
    pub skew: f64,
}

/// Result of [`OptionsChain::skew`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "rows", rename_all = "lowercase")]
pub enum SkewTable {
    /// Per-contract skew within expirations.
    Vertical(Vec<VerticalSkewRow>),
    /// Put/call skew across expirations.
    Horizontal(Vec<HorizontalSkewRow>),
}

impl SkewTable {
    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Vertical(rows) => rows.len(),
            Self::Horizontal(rows) => rows.len(),
        }
    }

    /// True if no rows were produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Positive-IV contracts of one type at one expiration.
fn iv_slice(
    contracts: &[OptionContract],
    expiration: NaiveDate,
    option_type: OptionType,
) -> Vec<(&OptionContract, f64)> {
    contracts
        .iter()
        .filter(|c| c.expiration == expiration && c.option_type == option_type)
        .filter_map(|c| c.positive_iv().map(|iv| (c, iv)))
        .collect()
}

/// IV of the contract whose strike is nearest the price.
fn atm_iv(slice: &[(&OptionContract, f64)], price: Decimal) -> Option<f64> {
    slice
        .iter()
        .min_by_key(|(c, _)| (c.strike - price).abs())
        .map(|(_, iv)| *iv)
}

impl OptionsChain {
    /// Implied volatility skew.
    ///
    /// With neither argument, computes a 30-day horizontal skew at 20%
    /// moneyness. A `moneyness` selects horizontal skew (every expiration if
    /// `date` is absent); otherwise vertical skew is computed for `date`.
    /// `Days(-1)` selects every expiration.
    pub fn skew(
        &self,
        date: Option<ExpirationSelector>,
        moneyness: Option<Decimal>,
    ) -> Result<SkewTable, AnalyticsError> {
        if !self.has_iv() {
            return Err(AnalyticsError::implied_volatility_unavailable());
        }

        let (date, moneyness) = match (date, moneyness) {
            (None, None) => (
                ExpirationSelector::Days(DEFAULT_SKEW_DAYS),
                Some(DEFAULT_SKEW_MONEYNESS),
            ),
            (None, Some(m)) => (ExpirationSelector::Days(-1), Some(m)),
            (Some(d), m) => (d, m),
        };
        if let Some(m) = moneyness {
            validate_moneyness(m)?;
        }

        let price = self.underlying_price()?;
        let expirations = if date.is_all() {
            tracing::warn!(
                expirations = self.expirations().len(),
                "Computing skew for all expirations; this may be slow for large chains"
            );
            let mut live: Vec<NaiveDate> = self.live_contracts().map(|c| c.expiration).collect();
            live.dedup();
            live
        } else {
            vec![self.nearest_expiration(date)?]
        };

        let table = match moneyness {
            Some(m) => SkewTable::Horizontal(
                expirations
                    .into_iter()
                    .filter_map(|e| self.horizontal_skew(e, price, m))
                    .collect(),
            ),
            None => SkewTable::Vertical(
                expirations
                    .into_iter()
                    .flat_map(|e| self.vertical_skew(e, price))
                    .collect(),
            ),
        };
        Ok(table)
    }

    fn vertical_skew(&self, expiration: NaiveDate, price: Decimal) -> Vec<VerticalSkewRow> {
        let mut rows = Vec::new();
        for option_type in [OptionType::Call, OptionType::Put] {
            let slice = iv_slice(self.contracts(), expiration, option_type);
            let Some(atm) = atm_iv(&slice, price) else {
                continue;
            };
            rows.extend(slice.iter().map(|(c, iv)| VerticalSkewRow {
                expiration,
                strike: c.strike,
                option_type,
                iv: *iv,
                atm_iv: atm,
                skew: round4(iv - atm),
            }));
        }
        rows.sort_by(|a, b| (a.strike, a.option_type).cmp(&(b.strike, b.option_type)));
        rows
    }

    fn horizontal_skew(
        &self,
        expiration: NaiveDate,
        price: Decimal,
        moneyness: Decimal,
    ) -> Option<HorizontalSkewRow> {
        let calls = iv_slice(self.contracts(), expiration, OptionType::Call);
        let puts = iv_slice(self.contracts(), expiration, OptionType::Put);

        let call_target = offset_by_percent(price, moneyness);
        let put_target = offset_by_percent(price, -moneyness);

        let (call, call_iv) = calls
            .iter()
            .filter(|(c, _)| c.strike >= call_target)
            .min_by_key(|(c, _)| c.strike)?;
        let (put, put_iv) = puts
            .iter()
            .filter(|(c, _)| c.strike <= put_target)
            .max_by_key(|(c, _)| c.strike)?;
        let atm_call = atm_iv(&calls, price)?;
        let atm_put = atm_iv(&puts, price)?;

        Some(HorizontalSkewRow {
            expiration,
            dte: call.dte,
            call_strike: call.strike,
            call_iv: *call_iv,
            call_skew: round4(call_iv - atm_call),
            put_strike: put.strike,
            put_iv: *put_iv,
            put_skew: round4(put_iv - atm_put),
            skew: round4(put_iv - call_iv),
        })
    }
}
