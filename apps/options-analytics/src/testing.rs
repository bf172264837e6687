//! Shared fixtures for unit tests.
//!
//! Two expirations (10 and 45 DTE from 2026-01-05), strikes 90-110 in $5
//! steps, underlying at $100.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;

use crate::chain::{ChainRecord, OptionType, OptionsChain};

pub const NEAR_DTE: i64 = 10;
pub const FAR_DTE: i64 = 45;

pub fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
}

pub fn expiration_for(dte: i64) -> NaiveDate {
    reference_date() + Duration::days(dte)
}

/// (bid, ask) quotes.
fn quote(dte: i64, strike: i64, option_type: OptionType) -> Option<(Decimal, Decimal)> {
    let near = dte == NEAR_DTE;
    let q = match (option_type, strike, near) {
        (OptionType::Call, 90, true) => (dec!(10.40), dec!(10.60)),
        (OptionType::Call, 95, true) => (dec!(5.80), dec!(6.00)),
        (OptionType::Call, 100, true) => (dec!(2.40), dec!(2.50)),
        (OptionType::Call, 105, true) => (dec!(0.90), dec!(1.00)),
        (OptionType::Call, 110, true) => (dec!(0.30), dec!(0.35)),
        (OptionType::Put, 90, true) => (dec!(0.25), dec!(0.30)),
        (OptionType::Put, 95, true) => (dec!(0.80), dec!(0.90)),
        (OptionType::Put, 100, true) => (dec!(2.20), dec!(2.30)),
        (OptionType::Put, 105, true) => (dec!(5.60), dec!(5.80)),
        (OptionType::Put, 110, true) => (dec!(10.30), dec!(10.50)),
        (OptionType::Call, 90, false) => (dec!(11.50), dec!(11.80)),
        (OptionType::Call, 95, false) => (dec!(7.40), dec!(7.60)),
        (OptionType::Call, 100, false) => (dec!(4.40), dec!(4.60)),
        (OptionType::Call, 105, false) => (dec!(2.40), dec!(2.50)),
        (OptionType::Call, 110, false) => (dec!(1.10), dec!(1.20)),
        (OptionType::Put, 90, false) => (dec!(1.30), dec!(1.40)),
        (OptionType::Put, 95, false) => (dec!(2.60), dec!(2.70)),
        (OptionType::Put, 100, false) => (dec!(4.20), dec!(4.40)),
        (OptionType::Put, 105, false) => (dec!(7.10), dec!(7.30)),
        (OptionType::Put, 110, false) => (dec!(10.90), dec!(11.20)),
        _ => return None,
    };
    Some(q)
}

pub fn iv(dte: i64, strike: i64) -> Option<f64> {
    let base = match strike {
        90 => 0.29,
        95 => 0.27,
        100 => 0.25,
        105 => 0.23,
        110 => 0.21,
        _ => return None,
    };
    Some(if dte == NEAR_DTE { base } else { base + 0.01 })
}

fn open_interest(dte: i64, strike: i64, option_type: OptionType) -> u64 {
    let base = match (option_type, strike) {
        (OptionType::Call, 90) => 100,
        (OptionType::Call, 95) => 200,
        (OptionType::Call, 100) => 500,
        (OptionType::Call, 105) => 300,
        (OptionType::Call, 110) => 150,
        (OptionType::Put, 90) => 250,
        (OptionType::Put, 95) => 400,
        (OptionType::Put, 100) => 450,
        (OptionType::Put, 105) => 120,
        (OptionType::Put, 110) => 60,
        _ => 0,
    };
    if dte == NEAR_DTE { base } else { base * 2 }
}

fn greeks(strike: i64, option_type: OptionType) -> (f64, f64) {
    let (call_delta, gamma) = match strike {
        90 => (0.9, 0.01),
        95 => (0.75, 0.03),
        100 => (0.5, 0.05),
        105 => (0.25, 0.03),
        _ => (0.1, 0.01),
    };
    match option_type {
        OptionType::Call => (call_delta, gamma),
        OptionType::Put => (call_delta - 1.0, gamma),
    }
}

fn record(dte: i64, strike: Decimal, option_type: OptionType) -> ChainRecord {
    let k = strike.to_i64().unwrap_or_default();
    let quote = quote(dte, k, option_type);
    let oi = open_interest(dte, k, option_type);
    ChainRecord {
        expiration: Some(expiration_for(dte)),
        strike: Some(strike),
        option_type: Some(option_type.to_string()),
        open_interest: Some(oi),
        volume: Some(oi / 10),
        bid: quote.map(|q| q.0),
        ask: quote.map(|q| q.1),
        implied_volatility: iv(dte, k),
        ..ChainRecord::default()
    }
}

pub fn call(dte: i64, strike: Decimal) -> ChainRecord {
    record(dte, strike, OptionType::Call)
}

pub fn put(dte: i64, strike: Decimal) -> ChainRecord {
    record(dte, strike, OptionType::Put)
}

pub fn fixture_records() -> Vec<ChainRecord> {
    let mut records = Vec::new();
    for dte in [NEAR_DTE, FAR_DTE] {
        for k in [90, 95, 100, 105, 110] {
            for option_type in [OptionType::Call, OptionType::Put] {
                let mut r = record(dte, Decimal::from(k), option_type);
                let (delta, gamma) = greeks(k, option_type);
                r.delta = Some(delta);
                r.gamma = Some(gamma);
                r.underlying_price = Some(dec!(100));
                r.underlying_symbol = Some("TEST".to_string());
                records.push(r);
            }
        }
    }
    records
}

pub fn fixture_chain() -> OptionsChain {
    OptionsChain::from_records_as_of(&fixture_records(), reference_date()).unwrap()
}
