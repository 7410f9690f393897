//! Money helpers built on rust_decimal
//!
//! Amounts live as `Decimal` in the domain and are rounded to 2 decimal
//! places (midpoint away from zero) whenever they cross a boundary: menu
//! input, storage as SQLite `REAL`, and line totals.

use rust_decimal::prelude::*;

const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed price per menu item
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Round to currency precision
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert a stored `REAL` back into a rounded `Decimal`
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).map(round_money).unwrap_or_default()
}

/// Convert a `Decimal` into the `REAL` stored in SQLite
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    round_money(value).to_f64().unwrap_or_default()
}

/// `price * quantity`, rounded
#[inline]
pub fn line_total(price: Decimal, quantity: u32) -> Decimal {
    round_money(price * Decimal::from(quantity))
}

/// A price is valid when it is non-negative and below [`MAX_PRICE`]
pub fn is_valid_price(price: Decimal) -> bool {
    !price.is_sign_negative() && price <= MAX_PRICE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_round_money_midpoint_away_from_zero() {
        assert_eq!(round_money(d("1.005")), d("1.01"));
        assert_eq!(round_money(d("2.344")), d("2.34"));
    }

    #[test]
    fn test_f64_roundtrip_keeps_cents() {
        for v in [d("0"), d("45"), d("12.50"), d("0.10"), d("199.99")] {
            assert_eq!(to_decimal(to_f64(v)), v);
        }
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line_total(d("150"), 2), d("300"));
        assert_eq!(line_total(d("12.25"), 3), d("36.75"));
    }

    #[test]
    fn test_is_valid_price() {
        assert!(is_valid_price(d("0")));
        assert!(is_valid_price(d("250")));
        assert!(!is_valid_price(d("-1")));
        assert!(!is_valid_price(d("1000000.01")));
    }
}
