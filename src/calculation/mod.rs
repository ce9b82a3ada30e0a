//! Calculation logic for the Payroll Calculation Engine.
//!
//! This module contains the pure calculators the orchestrator composes:
//! progressive tax, calculation-method strategies, frequency proration,
//! salary structure resolution, allowance and bonus aggregation, and
//! deduction resolution. Everything here is read-only; consumption and
//! persistence belong to the engine module.

mod allowances;
mod bonuses;
mod deductions;
mod methods;
mod proration;
mod rounding;
mod salary_structure;
mod tax;

pub use allowances::{AllowanceResolution, resolve_allowances};
pub use bonuses::{BonusResolution, resolve_bonuses};
pub use deductions::{DeductionResolution, resolve_deductions};
pub use methods::{
    FullValuePerformance, PerformanceCalculator, benefit_amount, deduction_amount, fixed_amount,
    percentage_of,
};
pub use proration::{monthly_equivalent, prorate, scale_to_payroll};
pub use rounding::{round_money, rounded_sum};
pub use salary_structure::{SalaryBreakdown, calculate_total_salary};
pub use tax::{compute_progressive_tax, monthly_paye};
