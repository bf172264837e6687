//! Numeric helpers shared by the analytics modules.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Decimal places for percentages and ratios.
pub const RATIO_DP: u32 = 4;

/// Round a float to [`RATIO_DP`] places. Never returns negative zero.
#[must_use]
pub fn round4(value: f64) -> f64 {
    let rounded = (value * 10_000.0).round() / 10_000.0;
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Round a decimal to [`RATIO_DP`] places.
#[must_use]
pub fn round_ratio(value: Decimal) -> Decimal {
    value.round_dp(RATIO_DP)
}

/// Lossy decimal to float conversion for greek arithmetic.
#[must_use]
pub fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Scale a price by a percentage offset: `price * (1 + pct / 100)`.
#[must_use]
pub fn offset_by_percent(price: Decimal, pct: Decimal) -> Decimal {
    price * (Decimal::ONE + pct / Decimal::ONE_HUNDRED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round4() {
        assert_eq!(round4(1.234_56), 1.2346);
        assert_eq!(round4(2.0), 2.0);
    }

    #[test]
    fn test_round4_drops_negative_zero() {
        let rounded = round4(-0.000_04);
        assert_eq!(rounded, 0.0);
        assert!(rounded.is_sign_positive());
        assert_eq!(serde_json::to_string(&rounded).unwrap(), "0.0");
    }

    #[test]
    fn test_round_ratio() {
        assert_eq!(round_ratio(dec!(0.123456)), dec!(0.1235));
        assert_eq!(round_ratio(dec!(5)), dec!(5));
    }

    #[test]
    fn test_offset_by_percent() {
        assert_eq!(offset_by_percent(dec!(100), dec!(5)), dec!(105));
        assert_eq!(offset_by_percent(dec!(100), dec!(-20)), dec!(80));
    }
}
