//! Multi-leg strategy payoff calculators.
//!
//! Each calculator resolves an expiration and strikes against the chain,
//! prices bought legs at the ask and sold legs at the bid, and reports cost,
//! breakevens and maximum profit/loss per share:
//! - Straddles and strangles (long or short)
//! - Vertical call and put spreads (debit or credit)
//! - Synthetic long and short stock
//!
//! [`crate::OptionsChain::strategies`] batches them across expirations.

mod batch;
mod straddle;
mod synthetic;
mod types;
mod vertical;

pub use batch::StrategyRequest;
pub use types::{StrategyKind, StrategyResult};
