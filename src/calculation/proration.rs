//! Frequency normalization for allowance amounts.
//!
//! Allowances are defined at their own payout frequency; payroll runs at
//! the run's frequency. Amounts normalize through a monthly equivalent:
//! quarterly amounts divide by 3 and annual amounts by 12, then the monthly
//! equivalent scales to the payroll frequency. One-time allowances bypass
//! both steps and pay in full exactly once.

use rust_decimal::Decimal;

use crate::models::{AllowanceFrequency, PayFrequency};

use super::rounding::round_money;

/// Average weeks per month used for weekly proration.
const WEEKS_PER_MONTH: Decimal = Decimal::from_parts(433, 0, 0, false, 2);

/// Average fortnights per month used for biweekly proration.
const FORTNIGHTS_PER_MONTH: Decimal = Decimal::from_parts(217, 0, 0, false, 2);

/// Converts an amount at its definition frequency to a monthly equivalent.
pub fn monthly_equivalent(amount: Decimal, frequency: AllowanceFrequency) -> Decimal {
    match frequency {
        AllowanceFrequency::Monthly | AllowanceFrequency::OneTime => amount,
        AllowanceFrequency::Quarterly => amount / Decimal::from(3),
        AllowanceFrequency::Annual => amount / Decimal::from(12),
    }
}

/// Scales a monthly-equivalent amount to the payroll frequency.
pub fn scale_to_payroll(monthly: Decimal, frequency: PayFrequency) -> Decimal {
    match frequency {
        PayFrequency::Weekly => monthly / WEEKS_PER_MONTH,
        PayFrequency::Biweekly => monthly / FORTNIGHTS_PER_MONTH,
        PayFrequency::Monthly => monthly,
        PayFrequency::Quarterly => monthly * Decimal::from(3),
        PayFrequency::Annual => monthly * Decimal::from(12),
    }
}

/// Prorates an allowance amount from its definition frequency to the
/// payroll frequency, rounding the result.
///
/// One-time allowances pay in full regardless of payroll frequency.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::prorate;
/// use payroll_engine::models::{AllowanceFrequency, PayFrequency};
/// use rust_decimal::Decimal;
///
/// // A quarterly allowance of 30,000 on a monthly payroll pays 10,000.
/// let amount = prorate(
///     Decimal::new(30_000, 0),
///     AllowanceFrequency::Quarterly,
///     PayFrequency::Monthly,
/// );
/// assert_eq!(amount, Decimal::new(10_000, 0));
/// ```
pub fn prorate(amount: Decimal, from: AllowanceFrequency, to: PayFrequency) -> Decimal {
    if from == AllowanceFrequency::OneTime {
        return round_money(amount);
    }
    round_money(scale_to_payroll(monthly_equivalent(amount, from), to))
}
