//! Options chain model.
//!
//! Provider records are validated into [`OptionContract`]s and held by an
//! [`OptionsChain`], which memoizes the enriched analytics frame
//! (breakeven, DEX, GEX) and carries the optional last-price override.

mod frame;
mod normalize;
mod types;

pub use frame::{EnrichedContract, OptionsChain};
pub(crate) use frame::positive_price;
pub use normalize::{normalize_records, provider_underlying_price, provider_underlying_symbol};
pub use types::{
    ChainRecord, DEFAULT_CONTRACT_SIZE, Greeks, Moneyness, OptionContract, OptionType,
    PositionSide, PriceField,
};
