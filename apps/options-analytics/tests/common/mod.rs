//! Shared fixtures for integration tests.
//!
//! A synthetic chain on an underlying at $500: expirations at 7, 30 and 60
//! DTE, strikes 490-510 in $5 steps. Each quote is intrinsic value plus a
//! time value that shrinks away from the money, with a $0.10 spread.

#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use options_analytics::{ChainRecord, OptionType, OptionsChain};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const DTES: [i64; 3] = [7, 30, 60];
pub const STRIKES: [i64; 5] = [490, 495, 500, 505, 510];
pub const SPOT: Decimal = dec!(500);

pub fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

pub fn expiration(dte: i64) -> NaiveDate {
    as_of() + Duration::days(dte)
}

fn time_value(dte: i64, strike: i64) -> Decimal {
    let base = match dte {
        7 => dec!(3.00),
        30 => dec!(6.00),
        _ => dec!(9.00),
    };
    let steps = Decimal::from((strike - 500).abs() / 5);
    base * (Decimal::ONE - dec!(0.15) * steps)
}

/// Mid price for a contract on the fixture chain.
pub fn mid(dte: i64, strike: i64, option_type: OptionType) -> Decimal {
    let k = Decimal::from(strike);
    let intrinsic = match option_type {
        OptionType::Call => (SPOT - k).max(Decimal::ZERO),
        OptionType::Put => (k - SPOT).max(Decimal::ZERO),
    };
    intrinsic + time_value(dte, strike)
}

pub fn record(dte: i64, strike: i64, option_type: OptionType) -> ChainRecord {
    let mid = mid(dte, strike, option_type);
    let moneyness = (strike - 500) as f64 / 500.0;
    let call_delta = (0.5 - moneyness * 8.0).clamp(0.05, 0.95);
    let delta = match option_type {
        OptionType::Call => call_delta,
        OptionType::Put => call_delta - 1.0,
    };
    let open_interest = 1_000 + (strike - 490) as u64 * 20;

    ChainRecord {
        contract_symbol: Some(format!("SPY{dte}{option_type}{strike}")),
        underlying_symbol: Some("SPY".to_string()),
        underlying_price: Some(SPOT),
        expiration: Some(expiration(dte)),
        strike: Some(Decimal::from(strike)),
        option_type: Some(option_type.to_string()),
        open_interest: Some(open_interest),
        volume: Some(open_interest / 4),
        bid: Some(mid - dec!(0.05)),
        ask: Some(mid + dec!(0.05)),
        last_trade_price: Some(mid),
        implied_volatility: Some(0.18 + moneyness.abs() + dte as f64 / 1_000.0),
        delta: Some(delta),
        gamma: Some(0.02 - moneyness.abs()),
        ..ChainRecord::default()
    }
}

pub fn records() -> Vec<ChainRecord> {
    let mut records = Vec::new();
    for dte in DTES {
        for strike in STRIKES {
            records.push(record(dte, strike, OptionType::Call));
            records.push(record(dte, strike, OptionType::Put));
        }
    }
    records
}

pub fn chain() -> OptionsChain {
    OptionsChain::from_records_as_of(&records(), as_of()).unwrap()
}
