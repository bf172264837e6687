//! Open interest, volume and exposure aggregation.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::search::ExpirationSelector;
use crate::chain::{EnrichedContract, Moneyness, OptionType, OptionsChain};
use crate::error::AnalyticsError;
use crate::math::round4;

/// Metric aggregated by [`OptionsChain::get_stat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatMetric {
    /// Open interest (contracts).
    OpenInterest,
    /// Session volume (contracts).
    Volume,
    /// Dollar delta exposure.
    Dex,
    /// Dollar gamma exposure.
    Gex,
}

impl StatMetric {
    const fn requires_greeks(self) -> bool {
        matches!(self, Self::Dex | Self::Gex)
    }

    const fn label(self) -> &'static str {
        match self {
            Self::OpenInterest => "open_interest",
            Self::Volume => "volume",
            Self::Dex => "DEX",
            Self::Gex => "GEX",
        }
    }

    fn value(self, row: &EnrichedContract) -> f64 {
        match self {
            Self::OpenInterest => row.contract.open_interest as f64,
            Self::Volume => row.contract.volume.unwrap_or(0) as f64,
            Self::Dex => row.dex.unwrap_or(0.0),
            Self::Gex => row.gex.unwrap_or(0.0),
        }
    }
}

/// Calls/puts breakdown for one group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatRecord {
    /// Sum over calls.
    #[serde(rename = "Calls")]
    pub calls: f64,
    /// Sum over puts.
    #[serde(rename = "Puts")]
    pub puts: f64,
    /// `calls + puts`.
    #[serde(rename = "Total")]
    pub total: f64,
    /// `(|calls| - |puts|) / (|calls| + |puts|) * 100`.
    #[serde(rename = "Net Percent")]
    pub net_percent: Option<f64>,
    /// Put/call ratio `|puts| / |calls|`.
    #[serde(rename = "PCR")]
    pub pcr: Option<f64>,
}

impl StatRecord {
    /// Build a record from call and put sums.
    #[must_use]
    pub fn new(calls: f64, puts: f64) -> Self {
        let calls = round4(calls);
        let puts = round4(puts);
        let gross = calls.abs() + puts.abs();
        let net_percent = (gross > 0.0).then(|| round4((calls.abs() - puts.abs()) / gross * 100.0));
        let pcr = (calls != 0.0).then(|| round4(puts.abs() / calls.abs()));
        Self {
            calls,
            puts,
            total: round4(calls + puts),
            net_percent,
            pcr,
        }
    }
}

/// Breakdown for one expiration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpirationStat {
    /// Expiration date.
    #[serde(rename = "Expiration")]
    pub expiration: NaiveDate,
    /// Days to expiration.
    #[serde(rename = "DTE")]
    pub dte: i64,
    /// Calls/puts breakdown.
    #[serde(flatten)]
    pub stat: StatRecord,
}

/// Breakdown for one strike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrikeStat {
    /// Strike price.
    #[serde(rename = "Strike")]
    pub strike: Decimal,
    /// Calls/puts breakdown.
    #[serde(flatten)]
    pub stat: StatRecord,
}

/// Totals plus per-expiration and per-strike breakdowns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatSummary {
    /// Aggregated metric.
    pub metric: StatMetric,
    /// Whole-chain totals.
    pub total: StatRecord,
    /// Per expiration, ascending.
    pub expiration: Vec<ExpirationStat>,
    /// Per strike, ascending.
    pub strike: Vec<StrikeStat>,
}

#[derive(Default, Clone, Copy)]
struct Sums {
    calls: f64,
    puts: f64,
}

impl Sums {
    fn add(&mut self, option_type: OptionType, value: f64) {
        match option_type {
            OptionType::Call => self.calls += value,
            OptionType::Put => self.puts += value,
        }
    }

    fn record(self) -> StatRecord {
        StatRecord::new(self.calls, self.puts)
    }
}

impl OptionsChain {
    /// Aggregate a metric by option type, expiration and strike.
    ///
    /// `moneyness` keeps only OTM or ITM contracts; `expiration` restricts
    /// the aggregation to the nearest matching expiration.
    pub fn get_stat(
        &self,
        metric: StatMetric,
        moneyness: Option<Moneyness>,
        expiration: Option<ExpirationSelector>,
    ) -> Result<StatSummary, AnalyticsError> {
        if metric.requires_greeks() && !self.has_greeks() {
            return Err(AnalyticsError::greeks_unavailable(metric.label()));
        }

        let expiration = expiration
            .map(|selector| self.nearest_expiration(selector))
            .transpose()?;
        let frame = self.dataframe()?;

        let mut total = Sums::default();
        let mut by_expiration: BTreeMap<(NaiveDate, i64), Sums> = BTreeMap::new();
        let mut by_strike: BTreeMap<Decimal, Sums> = BTreeMap::new();

        for row in frame {
            let contract = &row.contract;
            if expiration.is_some_and(|e| contract.expiration != e) {
                continue;
            }
            if moneyness.is_some_and(|m| {
                !m.matches(contract.option_type, contract.strike, row.underlying_price)
            }) {
                continue;
            }

            let value = metric.value(row);
            total.add(contract.option_type, value);
            by_expiration
                .entry((contract.expiration, contract.dte))
                .or_default()
                .add(contract.option_type, value);
            by_strike
                .entry(contract.strike)
                .or_default()
                .add(contract.option_type, value);
        }

        Ok(StatSummary {
            metric,
            total: total.record(),
            expiration: by_expiration
                .into_iter()
                .map(|((expiration, dte), sums)| ExpirationStat {
                    expiration,
                    dte,
                    stat: sums.record(),
                })
                .collect(),
            strike: by_strike
                .into_iter()
                .map(|(strike, sums)| StrikeStat {
                    strike,
                    stat: sums.record(),
                })
                .collect(),
        })
    }

    /// Open interest totals.
    pub fn total_oi(
        &self,
        moneyness: Option<Moneyness>,
        expiration: Option<ExpirationSelector>,
    ) -> Result<StatSummary, AnalyticsError> {
        self.get_stat(StatMetric::OpenInterest, moneyness, expiration)
    }

    /// Volume totals.
    pub fn total_volume(
        &self,
        moneyness: Option<Moneyness>,
        expiration: Option<ExpirationSelector>,
    ) -> Result<StatSummary, AnalyticsError> {
        self.get_stat(StatMetric::Volume, moneyness, expiration)
    }

    /// Dollar delta exposure totals.
    pub fn total_dex(
        &self,
        moneyness: Option<Moneyness>,
        expiration: Option<ExpirationSelector>,
    ) -> Result<StatSummary, AnalyticsError> {
        self.get_stat(StatMetric::Dex, moneyness, expiration)
    }

    /// Dollar gamma exposure totals.
    pub fn total_gex(
        &self,
        moneyness: Option<Moneyness>,
        expiration: Option<ExpirationSelector>,
    ) -> Result<StatSummary, AnalyticsError> {
        self.get_stat(StatMetric::Gex, moneyness, expiration)
    }
}
