//! Allowance aggregation.
//!
//! Resolves the grade-level allowance components plus the employee's
//! personal allowance entries valid for the period. This component is
//! read-only: consumption of personal entries is performed by the
//! orchestrator, not here, so the aggregation stays testable in isolation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    ApprovalStatus, Employee, PayFrequency, PayLine, PayPeriod, SalaryGrade,
};
use crate::store::AllowanceStore;

use super::methods::{PerformanceCalculator, benefit_amount};
use super::proration::prorate;
use super::rounding::rounded_sum;
use super::salary_structure::calculate_total_salary;

/// The allowances applicable to one employee for one period.
///
/// Personal lines carry the personal entry id in their `source` field; the
/// orchestrator claims exactly those entries during consumption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceResolution {
    /// Grade-level component lines.
    pub grade_allowances: Vec<PayLine>,
    /// Personal allowance lines valid for the period.
    pub personal_allowances: Vec<PayLine>,
    /// Sum of grade lines, rounded.
    pub grade_total: Decimal,
    /// Sum of personal lines, rounded.
    pub personal_total: Decimal,
    /// Sum of both groups, rounded.
    pub total: Decimal,
}

/// Resolves all allowances for an employee and period.
///
/// Grade components resolve through the salary structure; personal entries
/// are filtered to approved, unconsumed entries whose definition is active
/// and covers the period, then valued by the definition's calculation
/// method and prorated from the definition's frequency to the payroll
/// frequency.
pub fn resolve_allowances(
    employee: &Employee,
    grade: &SalaryGrade,
    period: &PayPeriod,
    frequency: PayFrequency,
    store: &dyn AllowanceStore,
    performance: &dyn PerformanceCalculator,
) -> EngineResult<AllowanceResolution> {
    let structure = calculate_total_salary(grade)?;

    let mut personal_allowances = Vec::new();
    for entry in store.personal_allowances_for(employee.id)? {
        if entry.status != ApprovalStatus::Approved || entry.is_used() {
            continue;
        }

        let definition =
            store
                .find_allowance(entry.allowance)?
                .ok_or_else(|| EngineError::Store {
                    message: format!(
                        "personal allowance {} references missing definition {}",
                        entry.id, entry.allowance
                    ),
                })?;

        if !definition.is_active || !definition.covers_period(period) {
            continue;
        }

        let amount = benefit_amount(
            definition.method,
            definition.value,
            grade.basic_salary,
            employee.id,
            performance,
        )?;

        personal_allowances.push(PayLine {
            name: definition.name.clone(),
            amount: prorate(amount, definition.frequency, frequency),
            source: Some(entry.id),
        });
    }

    let grade_total = structure.total_allowances;
    let personal_total = rounded_sum(personal_allowances.iter().map(|line| line.amount));
    let total = rounded_sum([grade_total, personal_total]);

    Ok(AllowanceResolution {
        grade_allowances: structure.components,
        personal_allowances,
        grade_total,
        personal_total,
        total,
    })
}
