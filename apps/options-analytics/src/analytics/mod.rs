//! Chain analytics: search, aggregation, filtering and skew.
//!
//! Every operation is an inherent method on [`crate::OptionsChain`]:
//! - Nearest expiration / strike / OTM strike resolution
//! - Open interest, volume, DEX and GEX totals by strike and expiration
//! - Frame filtering by expiration, type, moneyness and value range
//! - Vertical and horizontal implied volatility skew

mod filter;
mod search;
mod skew;
mod stats;

pub use filter::{ChainFilter, FilterColumn};
pub use search::{ExpirationSelector, OtmStrikes};
pub(crate) use search::validate_moneyness;
pub use skew::{HorizontalSkewRow, SkewTable, VerticalSkewRow};
pub use stats::{ExpirationStat, StatMetric, StatRecord, StatSummary, StrikeStat};
