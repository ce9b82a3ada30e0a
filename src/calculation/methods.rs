//! Calculation-method strategies.
//!
//! Each calculation method maps to a pure function, so that methods can be
//! unit tested in isolation and new methods added without touching the
//! orchestrator. Performance-based amounts are delegated to a pluggable
//! [`PerformanceCalculator`].

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{CalculationMethod, DeductionMethod, TaxBracket};

use super::rounding::round_money;
use super::tax::compute_progressive_tax;

/// Computes performance-based benefit amounts.
///
/// Implementations are free to consult appraisal data, KPI systems or any
/// other source; the engine only requires that the result is deterministic
/// for a given employee within one run.
pub trait PerformanceCalculator: Send + Sync {
    /// Resolves the amount for a performance-based benefit, given the
    /// definition's configured value as the baseline.
    fn calculate(&self, employee: Uuid, base_value: Decimal) -> EngineResult<Decimal>;
}

/// The default performance calculator: pays the configured value in full.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullValuePerformance;

impl PerformanceCalculator for FullValuePerformance {
    fn calculate(&self, _employee: Uuid, base_value: Decimal) -> EngineResult<Decimal> {
        Ok(base_value)
    }
}

/// Fixed method: the value is the amount.
pub fn fixed_amount(value: Decimal) -> Decimal {
    round_money(value)
}

/// Percentage method: the value is a percentage of the base.
pub fn percentage_of(base: Decimal, value: Decimal) -> Decimal {
    round_money(base * value / Decimal::from(100))
}

/// Resolves a component or allowance amount by its calculation method.
///
/// Percentage values apply against basic salary, never against gross.
pub fn benefit_amount(
    method: CalculationMethod,
    value: Decimal,
    basic_salary: Decimal,
    employee: Uuid,
    performance: &dyn PerformanceCalculator,
) -> EngineResult<Decimal> {
    let amount = match method {
        CalculationMethod::Fixed => fixed_amount(value),
        CalculationMethod::Percentage => percentage_of(basic_salary, value),
        CalculationMethod::PerformanceBased => round_money(performance.calculate(employee, value)?),
    };
    Ok(amount)
}

/// Resolves a voluntary deduction amount by its calculation method.
///
/// Percentage and progressive deductions apply against gross salary.
pub fn deduction_amount(
    method: DeductionMethod,
    value: Decimal,
    gross_salary: Decimal,
    brackets: &[TaxBracket],
) -> Decimal {
    match method {
        DeductionMethod::Fixed => fixed_amount(value),
        DeductionMethod::Percentage => percentage_of(gross_salary, value),
        DeductionMethod::Progressive => round_money(compute_progressive_tax(gross_salary, brackets)),
    }
}
