//! Monetary rounding.
//!
//! Every monetary value is rounded to 2 decimal places, half away from
//! zero, at each aggregation boundary rather than only at the end, so that
//! sub-totals reconcile exactly with the components they summarize.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a monetary value to 2 decimal places, half away from zero.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::round_money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let value = Decimal::from_str("10.005").unwrap();
/// assert_eq!(round_money(value), Decimal::from_str("10.01").unwrap());
/// ```
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Sums an iterator of already-rounded amounts and rounds the result.
///
/// Inputs are expected to be rounded line amounts; the final rounding only
/// normalizes the scale, so the sum always reconciles with its lines.
pub fn rounded_sum<I: IntoIterator<Item = Decimal>>(amounts: I) -> Decimal {
    round_money(amounts.into_iter().sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_half_rounds_up() {
        assert_eq!(round_money(dec("10.005")), dec("10.01"));
        assert_eq!(round_money(dec("10.004")), dec("10.00"));
        assert_eq!(round_money(dec("10.0050001")), dec("10.01"));
    }

    #[test]
    fn test_negative_half_rounds_away_from_zero() {
        assert_eq!(round_money(dec("-10.005")), dec("-10.01"));
    }

    #[test]
    fn test_already_rounded_value_is_unchanged() {
        assert_eq!(round_money(dec("123.45")), dec("123.45"));
        assert_eq!(round_money(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_rounded_sum_reconciles_with_lines() {
        let lines = vec![dec("33.33"), dec("33.33"), dec("33.34")];
        assert_eq!(rounded_sum(lines), dec("100.00"));
    }

    #[test]
    fn test_rounded_sum_of_empty_is_zero() {
        assert_eq!(rounded_sum(Vec::new()), Decimal::ZERO);
    }
}
