//! Batch summary models.
//!
//! A batch run always produces a [`PayrollSummary`], even when every
//! employee in the cohort fails.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::payroll::PayFrequency;

/// The outcome class for one employee in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchOutcomeStatus {
    /// A payroll record was created.
    Processed,
    /// A benign precondition failed (duplicate period, onboarding
    /// incomplete, missing department, inactive employee).
    Skipped,
    /// An unexpected error occurred.
    Failed,
}

/// Per-employee outcome entry in a batch summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeOutcome {
    /// The employee processed.
    pub employee: Uuid,
    /// How the employee's run ended.
    pub status: BatchOutcomeStatus,
    /// The created payroll record, for processed employees.
    pub payroll_id: Option<Uuid>,
    /// Human-readable detail for skipped and failed employees.
    pub detail: Option<String>,
}

/// A typed error entry with employee context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchError {
    /// The employee the error occurred for, when attributable.
    pub employee: Option<Uuid>,
    /// A stable machine-readable error code.
    pub code: String,
    /// The full error message, preserved for audit.
    pub message: String,
}

/// A warning entry with employee context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchWarning {
    /// The employee the warning concerns, when attributable.
    pub employee: Option<Uuid>,
    /// The warning message.
    pub message: String,
}

/// Outcome counts for a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchCounts {
    /// How many employees the batch attempted.
    pub total_attempted: usize,
    /// How many produced a payroll record.
    pub processed: usize,
    /// How many were skipped on a benign precondition.
    pub skipped: usize,
    /// How many failed unexpectedly.
    pub failed: usize,
}

/// Monetary totals over the processed employees of a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchTotals {
    /// Sum of gross earnings.
    pub gross_pay: Decimal,
    /// Sum of total deductions.
    pub deductions: Decimal,
    /// Sum of net pay.
    pub net_pay: Decimal,
}

/// The artifact of one batch payroll run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollSummary {
    /// Unique identifier for the batch.
    pub batch_id: Uuid,
    /// The period month the batch ran for.
    pub month: u32,
    /// The period year the batch ran for.
    pub year: i32,
    /// The payroll frequency the batch ran for.
    pub frequency: PayFrequency,
    /// Outcome counts.
    pub counts: BatchCounts,
    /// Monetary totals over processed employees.
    pub totals: BatchTotals,
    /// Per-employee outcome entries, in submission order.
    pub outcomes: Vec<EmployeeOutcome>,
    /// Typed errors for failed employees.
    pub errors: Vec<BatchError>,
    /// Warnings for skipped employees and non-fatal conditions.
    pub warnings: Vec<BatchWarning>,
    /// Wall-clock processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl PayrollSummary {
    /// Returns the outcome entry for an employee, if present.
    pub fn outcome_for(&self, employee: Uuid) -> Option<&EmployeeOutcome> {
        self.outcomes.iter().find(|o| o.employee == employee)
    }
}
