//! Domain error for options chain analytics.
//!
//! Every failed computation surfaces as a single [`AnalyticsError`] carrying an
//! [`ErrorCode`], a human-readable message and key/value context. Conditions
//! that a batch caller should be able to skip (no matching strike, degenerate
//! spread, zero denominators) are not errors: they produce `None` or empty
//! tables instead.
//!
//! | Code | Raised when |
//! |------|-------------|
//! | `MISSING_UNDERLYING_PRICE` | no provider price and no override |
//! | `INVALID_UNDERLYING_PRICE` | a supplied underlying price is not positive |
//! | `EMPTY_CHAIN` | nothing left after record validation |
//! | `INVALID_RECORD` | a record cannot be read as a contract |
//! | `GREEKS_UNAVAILABLE` | DEX/GEX requested on a chain without greeks |
//! | `IMPLIED_VOLATILITY_UNAVAILABLE` | skew requested without positive IV |
//! | `INVALID_MONEYNESS` | moneyness outside 0-100 or unknown filter |
//! | `INVALID_OPTION_TYPE` | option type other than call/put |
//! | `MISSING_PREMIUM` | a resolved strike has no usable price |
//! | `EXPIRATION_NOT_FOUND` | no expiration with `dte >= 0` |
//! | `INVALID_FILTER` | inconsistent filter arguments |

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for analytics failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Neither the provider nor the caller supplied an underlying price.
    MissingUnderlyingPrice,
    /// A supplied underlying price is zero or negative.
    InvalidUnderlyingPrice,
    /// The chain has no contracts after validation.
    EmptyChain,
    /// A raw record could not be read as a contract.
    InvalidRecord,
    /// Greeks are required but absent.
    GreeksUnavailable,
    /// Implied volatility is required but absent.
    ImpliedVolatilityUnavailable,
    /// Moneyness argument out of range or unrecognised.
    InvalidMoneyness,
    /// Option type is not call or put.
    InvalidOptionType,
    /// A resolved strike has no premium for the requested side.
    MissingPremium,
    /// No live expiration could be resolved.
    ExpirationNotFound,
    /// Filter arguments are inconsistent.
    InvalidFilter,
}

impl ErrorCode {
    /// Get the error reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::MissingUnderlyingPrice => "MISSING_UNDERLYING_PRICE",
            Self::InvalidUnderlyingPrice => "INVALID_UNDERLYING_PRICE",
            Self::EmptyChain => "EMPTY_CHAIN",
            Self::InvalidRecord => "INVALID_RECORD",
            Self::GreeksUnavailable => "GREEKS_UNAVAILABLE",
            Self::ImpliedVolatilityUnavailable => "IMPLIED_VOLATILITY_UNAVAILABLE",
            Self::InvalidMoneyness => "INVALID_MONEYNESS",
            Self::InvalidOptionType => "INVALID_OPTION_TYPE",
            Self::MissingPremium => "MISSING_PREMIUM",
            Self::ExpirationNotFound => "EXPIRATION_NOT_FOUND",
            Self::InvalidFilter => "INVALID_FILTER",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// A domain computation error with context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct AnalyticsError {
    code: ErrorCode,
    message: String,
    context: Vec<(String, String)>,
}

impl AnalyticsError {
    /// Create a new analytics error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: Vec::new(),
        }
    }

    /// Add context to the error.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.push((key.into(), value.into()));
        self
    }

    /// Get the error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Get the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the context.
    #[must_use]
    pub fn context(&self) -> &[(String, String)] {
        &self.context
    }

    /// Look up a context value by key.
    #[must_use]
    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl std::fmt::Display for AnalyticsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.reason(), self.message)
    }
}

/// Convenience constructors for common errors.
impl AnalyticsError {
    /// No underlying price from the provider and no override set.
    #[must_use]
    pub fn missing_underlying_price() -> Self {
        Self::new(
            ErrorCode::MissingUnderlyingPrice,
            "No underlying price available; set last_price to supply one",
        )
    }

    /// Chain is empty after validation.
    #[must_use]
    pub fn empty_chain() -> Self {
        Self::new(ErrorCode::EmptyChain, "Options chain contains no valid contracts")
    }

    /// Underlying price that is zero or negative.
    #[must_use]
    pub fn invalid_underlying_price(price: Decimal) -> Self {
        Self::new(
            ErrorCode::InvalidUnderlyingPrice,
            format!("Underlying price must be positive, got {price}"),
        )
        .with_context("underlying_price", price.to_string())
    }

    /// Raw record is missing a required field.
    #[must_use]
    pub fn invalid_record(index: usize, field: &str) -> Self {
        Self::new(
            ErrorCode::InvalidRecord,
            format!("Record {index} is missing required field '{field}'"),
        )
        .with_context("index", index.to_string())
        .with_context("field", field)
    }

    /// Greeks requested but not present.
    #[must_use]
    pub fn greeks_unavailable(metric: &str) -> Self {
        Self::new(
            ErrorCode::GreeksUnavailable,
            format!("Greeks not available; cannot compute {metric}"),
        )
        .with_context("metric", metric)
    }

    /// Implied volatility requested but not present.
    #[must_use]
    pub fn implied_volatility_unavailable() -> Self {
        Self::new(
            ErrorCode::ImpliedVolatilityUnavailable,
            "Implied volatility not available in the chain",
        )
    }

    /// Moneyness outside the 0-100 percent range.
    #[must_use]
    pub fn invalid_moneyness(value: Decimal) -> Self {
        Self::new(
            ErrorCode::InvalidMoneyness,
            format!("Moneyness must be between 0 and 100 percent, got {value}"),
        )
        .with_context("moneyness", value.to_string())
    }

    /// Unrecognised moneyness filter.
    #[must_use]
    pub fn invalid_moneyness_filter(value: &str) -> Self {
        Self::new(
            ErrorCode::InvalidMoneyness,
            format!("Moneyness filter must be 'otm' or 'itm', got '{value}'"),
        )
        .with_context("moneyness", value)
    }

    /// Option type other than call or put.
    #[must_use]
    pub fn invalid_option_type(value: &str) -> Self {
        Self::new(
            ErrorCode::InvalidOptionType,
            format!("Option type must be 'call' or 'put', got '{value}'"),
        )
        .with_context("option_type", value)
    }

    /// Resolved strikes have no usable premium.
    #[must_use]
    pub fn missing_premium(first_strike: Decimal, second_strike: Decimal) -> Self {
        Self::new(
            ErrorCode::MissingPremium,
            format!("Missing premium data for strikes {first_strike} and {second_strike}"),
        )
        .with_context("strike_1", first_strike.to_string())
        .with_context("strike_2", second_strike.to_string())
    }

    /// No expiration with `dte >= 0`.
    #[must_use]
    pub fn expiration_not_found() -> Self {
        Self::new(
            ErrorCode::ExpirationNotFound,
            "No unexpired expiration available in the chain",
        )
    }

    /// Inconsistent filter arguments.
    #[must_use]
    pub fn invalid_filter(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidFilter, message)
    }
}
