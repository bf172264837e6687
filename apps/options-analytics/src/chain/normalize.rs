//! Raw provider records to canonical contracts.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::types::{ChainRecord, DEFAULT_CONTRACT_SIZE, Greeks, OptionContract, OptionType};
use crate::error::AnalyticsError;

/// Validate raw records into contracts sorted by expiration, strike and type.
///
/// Records without an expiration or strike are dropped. An `option_type`
/// other than call/put is an error, as is a chain left empty after
/// validation. `dte` is taken from the record when present, otherwise derived
/// from the record's `eod_date` or `reference_date`.
pub fn normalize_records(
    records: &[ChainRecord],
    reference_date: NaiveDate,
) -> Result<Vec<OptionContract>, AnalyticsError> {
    let mut contracts = Vec::with_capacity(records.len());
    let mut dropped = 0_usize;

    for (index, record) in records.iter().enumerate() {
        let (Some(expiration), Some(strike)) = (record.expiration, record.strike) else {
            dropped += 1;
            continue;
        };
        let option_type: OptionType = record
            .option_type
            .as_deref()
            .ok_or_else(|| AnalyticsError::invalid_record(index, "option_type"))?
            .parse()?;

        let as_of = record.eod_date.unwrap_or(reference_date);
        let dte = record
            .dte
            .unwrap_or_else(|| (expiration - as_of).num_days());

        let greeks = match (record.delta, record.gamma) {
            (Some(delta), Some(gamma)) => Some(Greeks {
                delta,
                gamma,
                theta: record.theta,
                vega: record.vega,
                rho: record.rho,
            }),
            _ => None,
        };

        contracts.push(OptionContract {
            contract_symbol: record.contract_symbol.clone(),
            expiration,
            dte,
            strike,
            option_type,
            contract_size: record.contract_size.unwrap_or(DEFAULT_CONTRACT_SIZE),
            open_interest: record.open_interest.unwrap_or(0),
            volume: record.volume,
            bid: record.bid,
            ask: record.ask,
            last_trade_price: record.last_trade_price,
            mark: record.mark,
            implied_volatility: record.implied_volatility,
            greeks,
        });
    }

    if dropped > 0 {
        tracing::debug!(dropped, "Dropped records without expiration or strike");
    }

    if contracts.is_empty() {
        return Err(AnalyticsError::empty_chain());
    }

    contracts.sort_by(|a, b| {
        (a.expiration, a.strike, a.option_type).cmp(&(b.expiration, b.strike, b.option_type))
    });

    Ok(contracts)
}

/// Provider-supplied underlying price: first positive per-record value.
#[must_use]
pub fn provider_underlying_price(records: &[ChainRecord]) -> Option<Decimal> {
    records
        .iter()
        .filter_map(|r| r.underlying_price)
        .find(|p| *p > Decimal::ZERO)
}

/// Provider-supplied underlying symbol: first non-empty per-record value.
#[must_use]
pub fn provider_underlying_symbol(records: &[ChainRecord]) -> Option<String> {
    records
        .iter()
        .filter_map(|r| r.underlying_symbol.as_deref())
        .find(|s| !s.is_empty())
        .map(str::to_string)
}
