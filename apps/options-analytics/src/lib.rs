// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_collect,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Options Analytics - Rust Core Library
//!
//! Derived analytics over a snapshot of an options chain.
//!
//! # Modules
//!
//! - `chain`: provider records, normalized contracts and the [`OptionsChain`]
//!   with its memoized enriched frame (breakeven, DEX, GEX)
//! - `analytics`: nearest expiration/strike search, OI/volume/exposure
//!   aggregation, filtering and IV skew
//! - `strategies`: straddle, strangle, vertical spread and synthetic payoffs
//! - `config`, `telemetry`, `report`, `export`: the one-shot runner
//!
//! # Example
//!
//! ```rust,ignore
//! use options_analytics::{OptionsChain, PositionSide};
//!
//! let chain = OptionsChain::from_records(&records)?;
//! let oi = chain.total_oi(None, None)?;
//! let straddle = chain.straddle(30, None, PositionSide::Long, None)?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

pub mod analytics;
pub mod chain;
pub mod config;
pub mod error;
pub mod export;
pub mod math;
pub mod report;
pub mod strategies;
pub mod telemetry;

#[cfg(test)]
mod testing;

pub use analytics::{
    ChainFilter, ExpirationSelector, FilterColumn, HorizontalSkewRow, OtmStrikes, SkewTable,
    StatMetric, StatRecord, StatSummary, VerticalSkewRow,
};
pub use chain::{
    ChainRecord, EnrichedContract, Greeks, Moneyness, OptionContract, OptionType, OptionsChain,
    PositionSide, PriceField,
};
pub use error::{AnalyticsError, ErrorCode};
pub use strategies::{StrategyKind, StrategyRequest, StrategyResult};
