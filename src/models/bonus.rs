//! Bonus definitions and per-employee bonus entries.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::allowance::{ApprovalStatus, PayrollUsage};
use super::payroll::PayPeriod;

/// The kind of bonus, which determines how its amount is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusType {
    /// Pays `base_amount * score / target` when the target is met, else 0.
    Performance,
    /// Pays one month's basic salary.
    ThirteenthMonth,
    /// Pays the stored amount.
    Special,
    /// Pays the stored amount.
    Achievement,
    /// Pays the stored amount.
    Retention,
    /// Pays the stored amount.
    Project,
    /// Pays the stored amount.
    Fixed,
    /// Pays the stored amount.
    Grade,
}

/// Performance parameters for a [`BonusType::Performance`] bonus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceParams {
    /// The employee's achieved score.
    pub performance_score: Decimal,
    /// The score required for the bonus to pay out.
    pub target_score: Decimal,
    /// The amount the payout is scaled from.
    pub base_amount: Decimal,
}

/// An administrator-authored bonus definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bonus {
    /// Unique identifier for the definition.
    pub id: Uuid,
    /// The bonus's name (e.g. "Q1 Retention").
    pub name: String,
    /// The kind of bonus.
    pub bonus_type: BonusType,
    /// The stored amount, used verbatim by every kind except
    /// `Performance` and `ThirteenthMonth`.
    pub amount: Decimal,
    /// Performance parameters, required for `Performance` bonuses.
    pub performance: Option<PerformanceParams>,
}

/// One employee's approved instance of a bonus definition, payable on a
/// specific date and consumed by exactly one payroll period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalBonus {
    /// Unique identifier for this entry.
    pub id: Uuid,
    /// The employee the entry belongs to.
    pub employee: Uuid,
    /// The bonus definition this entry instantiates.
    pub bonus: Uuid,
    /// Approval state of the entry.
    pub status: ApprovalStatus,
    /// The date the bonus becomes payable.
    pub payment_date: NaiveDate,
    /// Consumption marker; `None` until a payroll run claims the entry.
    pub used_in_payroll: Option<PayrollUsage>,
}

impl PersonalBonus {
    /// Returns true if the entry is payable within the period: approved,
    /// payment date inside the period, and not already consumed for it.
    pub fn is_payable_in(&self, period: &PayPeriod) -> bool {
        self.status == ApprovalStatus::Approved
            && period.contains(self.payment_date)
            && !self.is_used_for(period.month, period.year)
    }

    /// Returns true if the entry was already consumed for the given period.
    pub fn is_used_for(&self, month: u32, year: i32) -> bool {
        self.used_in_payroll
            .as_ref()
            .is_some_and(|usage| usage.month == month && usage.year == year)
    }
}
