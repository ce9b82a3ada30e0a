//! Allowance definitions and per-employee allowance entries.
//!
//! An [`Allowance`] is an administrator-authored definition; a
//! [`PersonalAllowance`] is one employee's opted-in instance of it, which is
//! consumed by exactly one payroll period via its `used_in_payroll` marker.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::payroll::PayPeriod;
use super::salary_grade::CalculationMethod;
use super::scope::BenefitScope;

/// How often an allowance pays out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowanceFrequency {
    /// Pays every month.
    Monthly,
    /// Pays once per quarter.
    Quarterly,
    /// Pays once per year.
    Annual,
    /// Pays once, in full, and is then exhausted.
    OneTime,
}

/// Approval state of a personal allowance or bonus entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    /// Awaiting approval; not payable.
    Pending,
    /// Approved and payable.
    Approved,
    /// Rejected; never payable.
    Rejected,
}

/// The consumption marker preventing a personal entry from being paid twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollUsage {
    /// The period month the entry was consumed for (1-12).
    pub month: u32,
    /// The period year the entry was consumed for.
    pub year: i32,
    /// The payroll record that consumed the entry, once persisted.
    pub payroll_id: Option<Uuid>,
}

/// An administrator-authored allowance definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allowance {
    /// Unique identifier for the definition.
    pub id: Uuid,
    /// The allowance's name (e.g. "Remote Work Stipend").
    pub name: String,
    /// How the value turns into an amount.
    pub method: CalculationMethod,
    /// The fixed amount or percentage of basic salary, depending on `method`.
    pub value: Decimal,
    /// How often the allowance pays out.
    pub frequency: AllowanceFrequency,
    /// Who the allowance applies to.
    pub scope: BenefitScope,
    /// The first date the allowance is in force.
    pub effective_date: NaiveDate,
    /// The last date the allowance is in force, if bounded.
    pub expiry_date: Option<NaiveDate>,
    /// Whether the definition is currently active.
    pub is_active: bool,
}

impl Allowance {
    /// Returns true if the allowance's date range overlaps the pay period:
    /// effective on or before the period's end, and not expired before the
    /// period's start.
    pub fn covers_period(&self, period: &PayPeriod) -> bool {
        if self.effective_date > period.end {
            return false;
        }
        match self.expiry_date {
            Some(expiry) => expiry >= period.start,
            None => true,
        }
    }
}

/// One employee's opted-in instance of an allowance definition.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{ApprovalStatus, PersonalAllowance};
/// use uuid::Uuid;
///
/// let entry = PersonalAllowance {
///     id: Uuid::new_v4(),
///     employee: Uuid::new_v4(),
///     allowance: Uuid::new_v4(),
///     status: ApprovalStatus::Approved,
///     used_in_payroll: None,
/// };
/// assert!(!entry.is_used_for(3, 2025));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalAllowance {
    /// Unique identifier for this entry.
    pub id: Uuid,
    /// The employee the entry belongs to.
    pub employee: Uuid,
    /// The allowance definition this entry instantiates.
    pub allowance: Uuid,
    /// Approval state of the entry.
    pub status: ApprovalStatus,
    /// Consumption marker; `None` until a payroll run claims the entry.
    pub used_in_payroll: Option<PayrollUsage>,
}

impl PersonalAllowance {
    /// Returns true if the entry was already consumed for the given period.
    pub fn is_used_for(&self, month: u32, year: i32) -> bool {
        self.used_in_payroll
            .as_ref()
            .is_some_and(|usage| usage.month == month && usage.year == year)
    }

    /// Returns true if the entry has been consumed by any period.
    pub fn is_used(&self) -> bool {
        self.used_in_payroll.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn march_2025() -> PayPeriod {
        PayPeriod::from_month(3, 2025).unwrap()
    }

    fn create_test_allowance(effective: NaiveDate, expiry: Option<NaiveDate>) -> Allowance {
        Allowance {
            id: Uuid::new_v4(),
            name: "Remote Work Stipend".to_string(),
            method: CalculationMethod::Fixed,
            value: dec("20000"),
            frequency: AllowanceFrequency::Monthly,
            scope: BenefitScope::Company,
            effective_date: effective,
            expiry_date: expiry,
            is_active: true,
        }
    }

    #[test]
    fn test_allowance_effective_before_period_covers() {
        let allowance =
            create_test_allowance(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(), None);
        assert!(allowance.covers_period(&march_2025()));
    }

    #[test]
    fn test_allowance_effective_after_period_does_not_cover() {
        let allowance =
            create_test_allowance(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(), None);
        assert!(!allowance.covers_period(&march_2025()));
    }

    #[test]
    fn test_allowance_effective_mid_period_covers() {
        let allowance =
            create_test_allowance(NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(), None);
        assert!(allowance.covers_period(&march_2025()));
    }

    #[test]
    fn test_allowance_expired_before_period_does_not_cover() {
        let allowance = create_test_allowance(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            Some(NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()),
        );
        assert!(!allowance.covers_period(&march_2025()));
    }

    #[test]
    fn test_allowance_expiring_on_period_start_covers() {
        let allowance = create_test_allowance(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            Some(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()),
        );
        assert!(allowance.covers_period(&march_2025()));
    }

    #[test]
    fn test_usage_marker_matches_period() {
        let mut entry = PersonalAllowance {
            id: Uuid::new_v4(),
            employee: Uuid::new_v4(),
            allowance: Uuid::new_v4(),
            status: ApprovalStatus::Approved,
            used_in_payroll: None,
        };
        assert!(!entry.is_used());

        entry.used_in_payroll = Some(PayrollUsage {
            month: 3,
            year: 2025,
            payroll_id: Some(Uuid::new_v4()),
        });
        assert!(entry.is_used());
        assert!(entry.is_used_for(3, 2025));
        assert!(!entry.is_used_for(4, 2025));
        assert!(!entry.is_used_for(3, 2024));
    }

    #[test]
    fn test_frequency_serialization() {
        assert_eq!(
            serde_json::to_string(&AllowanceFrequency::OneTime).unwrap(),
            "\"one_time\""
        );
        assert_eq!(
            serde_json::to_string(&AllowanceFrequency::Quarterly).unwrap(),
            "\"quarterly\""
        );
    }

    #[test]
    fn test_approval_status_serialization() {
        assert_eq!(
            serde_json::to_string(&ApprovalStatus::Approved).unwrap(),
            "\"approved\""
        );
        let status: ApprovalStatus = serde_json::from_str("\"rejected\"").unwrap();
        assert_eq!(status, ApprovalStatus::Rejected);
    }
}
