//! Salary structure resolution.
//!
//! Computes a salary grade's basic salary and grade-level allowance
//! components as a pure aggregation, usable for preview and reporting
//! independently of a payroll run.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{CalculationMethod, PayLine, SalaryGrade};

use super::methods::{fixed_amount, percentage_of};
use super::rounding::rounded_sum;

/// The salary structure of a grade: basic salary plus its active
/// grade-level allowance components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryBreakdown {
    /// The grade's basic salary.
    pub basic_salary: Decimal,
    /// Sum of the component amounts, rounded.
    pub total_allowances: Decimal,
    /// Basic salary plus total allowances, rounded.
    pub gross_salary: Decimal,
    /// The individual component lines.
    pub components: Vec<PayLine>,
}

/// Computes the salary structure for a grade.
///
/// Validates the grade's basic salary, then resolves each active component
/// of type allowance: fixed components pay their value, percentage
/// components pay a rounded percentage of basic salary. Grade components
/// never use performance-based calculation.
///
/// # Errors
///
/// Returns `InvalidBasicSalary` for a non-positive basic salary, and
/// `CalculationError` if a component carries a method grade components do
/// not support.
pub fn calculate_total_salary(grade: &SalaryGrade) -> EngineResult<SalaryBreakdown> {
    grade.validate()?;

    let mut components = Vec::new();
    for component in grade.active_components() {
        let amount = match component.method {
            CalculationMethod::Fixed => fixed_amount(component.value),
            CalculationMethod::Percentage => percentage_of(grade.basic_salary, component.value),
            CalculationMethod::PerformanceBased => {
                return Err(EngineError::CalculationError {
                    message: format!(
                        "grade component '{}' uses performance-based calculation",
                        component.name
                    ),
                });
            }
        };
        components.push(PayLine {
            name: component.name.clone(),
            amount,
            source: Some(grade.id),
        });
    }

    let total_allowances = rounded_sum(components.iter().map(|line| line.amount));
    let gross_salary = rounded_sum([grade.basic_salary, total_allowances]);

    Ok(SalaryBreakdown {
        basic_salary: grade.basic_salary,
        total_allowances,
        gross_salary,
        components,
    })
}
