//! Progressive tax calculation.
//!
//! This module provides the bracket walk at the heart of PAYE: a pure
//! function over an ordered, validated set of tax brackets. Bracket
//! validation happens at the point of creation (see
//! [`crate::models::validate_brackets`]); the calculator assumes ordering
//! and does not re-validate it.

use rust_decimal::Decimal;

use crate::models::TaxBracket;

use super::rounding::round_money;

/// Months in a year, used to annualize monthly gross for PAYE.
const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Computes progressive income tax over an ordered set of brackets.
///
/// Walks the brackets in ascending `min` order, taxing the slice of income
/// that falls inside each band at that band's rate. Income in the unbounded
/// top bracket is fully taxed at its rate. Zero or negative income yields
/// zero tax.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::compute_progressive_tax;
/// use payroll_engine::models::TaxBracket;
/// use rust_decimal::Decimal;
///
/// let brackets = vec![
///     TaxBracket { min: Decimal::ZERO, max: Some(Decimal::new(1000, 0)), rate: Decimal::new(10, 0) },
///     TaxBracket { min: Decimal::new(1000, 0), max: None, rate: Decimal::new(20, 0) },
/// ];
///
/// // 1000 * 10% + 500 * 20% = 200
/// let tax = compute_progressive_tax(Decimal::new(1500, 0), &brackets);
/// assert_eq!(tax, Decimal::new(200, 0));
/// ```
pub fn compute_progressive_tax(annual_income: Decimal, brackets: &[TaxBracket]) -> Decimal {
    if annual_income <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let hundred = Decimal::from(100);
    let mut remaining = annual_income;
    let mut tax = Decimal::ZERO;

    for bracket in brackets {
        if remaining <= Decimal::ZERO {
            break;
        }

        let taxable_in_bracket = match bracket.span() {
            Some(span) => remaining.min(span),
            None => remaining,
        };

        tax += taxable_in_bracket * bracket.rate / hundred;
        remaining -= taxable_in_bracket;
    }

    tax
}

/// Computes the monthly PAYE deduction for a monthly gross salary.
///
/// The gross is annualized as `gross * 12`, taxed over the annual brackets,
/// and the annual tax divided back into a rounded monthly amount. This
/// assumes stable monthly income across the year.
pub fn monthly_paye(gross_monthly: Decimal, brackets: &[TaxBracket]) -> Decimal {
    let annual_tax = compute_progressive_tax(gross_monthly * MONTHS_PER_YEAR, brackets);
    round_money(annual_tax / MONTHS_PER_YEAR)
}
