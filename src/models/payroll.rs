//! Payroll record models: the pay period, the persisted record, and its
//! earnings/deductions breakdowns.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

/// How often a payroll run pays out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayFrequency {
    /// Weekly payroll.
    Weekly,
    /// Biweekly payroll.
    Biweekly,
    /// Monthly payroll.
    Monthly,
    /// Quarterly payroll.
    Quarterly,
    /// Annual payroll.
    Annual,
}

/// A calendar-month pay period.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayPeriod::from_month(2, 2024).unwrap();
/// assert_eq!(period.start, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
/// assert_eq!(period.end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriod {
    /// The period month (1-12).
    pub month: u32,
    /// The period year.
    pub year: i32,
    /// The first day of the period.
    pub start: NaiveDate,
    /// The last day of the period.
    pub end: NaiveDate,
}

impl PayPeriod {
    /// Builds the pay period for a calendar month.
    ///
    /// Returns `InvalidPeriod` for months outside 1-12 or years chrono
    /// cannot represent.
    pub fn from_month(month: u32, year: i32) -> EngineResult<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or(EngineError::InvalidPeriod { month, year })?;
        let next_month_start = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or(EngineError::InvalidPeriod { month, year })?;
        let end = next_month_start
            .pred_opt()
            .ok_or(EngineError::InvalidPeriod { month, year })?;

        Ok(Self {
            month,
            year,
            start,
            end,
        })
    }

    /// Returns true if the date falls inside the period, bounds included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// The number of days in the period.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Lifecycle status of a payroll record.
///
/// A record is created as `Pending` and thereafter only transitions status;
/// it is never recomputed in place once paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayrollStatus {
    /// Created, awaiting review.
    Pending,
    /// Being reviewed or transferred.
    Processing,
    /// Approved for payment.
    Approved,
    /// Paid out; terminal.
    Paid,
    /// Rejected during review.
    Rejected,
    /// Processing failed after creation.
    Failed,
}

/// A single named monetary line in a payroll record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayLine {
    /// The line's display name (e.g. "Housing", "PAYE").
    pub name: String,
    /// The line's amount, rounded to 2 decimal places.
    pub amount: Decimal,
    /// The definition or personal entry the line originated from.
    pub source: Option<Uuid>,
}

/// The earnings side of a payroll record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollEarnings {
    /// Personal allowance lines included this period.
    pub allowances: Vec<PayLine>,
    /// Bonus lines included this period.
    pub bonuses: Vec<PayLine>,
    /// Sum of allowance and bonus lines, rounded.
    pub total_earnings: Decimal,
}

/// The deductions side of a payroll record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollDeductions {
    /// Statutory deduction lines (PAYE, Pension, NHF).
    pub statutory: Vec<PayLine>,
    /// Voluntary deduction lines.
    pub voluntary: Vec<PayLine>,
    /// Sum of all deduction lines, rounded.
    pub total_deductions: Decimal,
}

/// Aggregated totals for a payroll record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollTotals {
    /// Basic salary plus all earnings, rounded.
    pub gross_earnings: Decimal,
    /// Total deductions, rounded.
    pub total_deductions: Decimal,
    /// Gross earnings minus total deductions, rounded.
    pub net_pay: Decimal,
}

/// A signed, auditable net-pay record for one employee and period.
///
/// At most one record exists per (employee, month, year); the payroll store
/// enforces this before creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRecord {
    /// Unique identifier for the record.
    pub id: Uuid,
    /// The employee the record pays.
    pub employee: Uuid,
    /// The employee's department at computation time.
    pub department: Uuid,
    /// The salary grade the record was computed from.
    pub salary_grade: Uuid,
    /// The period month (1-12).
    pub month: u32,
    /// The period year.
    pub year: i32,
    /// The payroll frequency the record was computed for.
    pub frequency: PayFrequency,
    /// The grade's basic salary.
    pub basic_salary: Decimal,
    /// Grade-level allowance component lines.
    pub components: Vec<PayLine>,
    /// Personal earnings included this period.
    pub earnings: PayrollEarnings,
    /// Deductions applied this period.
    pub deductions: PayrollDeductions,
    /// Aggregated totals.
    pub totals: PayrollTotals,
    /// Lifecycle status.
    pub status: PayrollStatus,
    /// Who requested the run.
    pub created_by: Option<Uuid>,
    /// Who approved or processed the record.
    pub processed_by: Option<Uuid>,
    /// The first day of the period.
    pub period_start: NaiveDate,
    /// The last day of the period.
    pub period_end: NaiveDate,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl PayrollRecord {
    /// Returns true if the record still counts as "pending" for the purpose
    /// of referencing checks (not yet paid out or closed).
    pub fn is_pending(&self) -> bool {
        matches!(
            self.status,
            PayrollStatus::Pending | PayrollStatus::Processing | PayrollStatus::Approved
        )
    }

    /// The calendar period the record covers.
    pub fn period(&self) -> EngineResult<PayPeriod> {
        PayPeriod::from_month(self.month, self.year)
    }
}

/// Returns true when a status transition is allowed.
///
/// `Paid` is terminal; everything else may move forward through the approval
/// workflow or be rejected/failed.
pub fn status_transition_allowed(from: PayrollStatus, to: PayrollStatus) -> bool {
    if from == to {
        return true;
    }
    match from {
        PayrollStatus::Paid => false,
        PayrollStatus::Rejected | PayrollStatus::Failed => to == PayrollStatus::Pending,
        PayrollStatus::Pending | PayrollStatus::Processing | PayrollStatus::Approved => true,
    }
}
