//! Core data models for the Payroll Calculation Engine.
//!
//! This module contains all the domain records used throughout the engine.

mod allowance;
mod bonus;
mod deduction;
mod employee;
mod payroll;
mod salary_grade;
mod scope;
mod summary;

pub use allowance::{
    Allowance, AllowanceFrequency, ApprovalStatus, PayrollUsage, PersonalAllowance,
};
pub use bonus::{Bonus, BonusType, PerformanceParams, PersonalBonus};
pub use deduction::{
    Deduction, DeductionKind, DeductionMethod, StatutoryCode, TaxBracket, validate_brackets,
};
pub use employee::{Department, Employee};
pub use payroll::{
    PayFrequency, PayLine, PayPeriod, PayrollDeductions, PayrollEarnings, PayrollRecord,
    PayrollStatus, PayrollTotals, status_transition_allowed,
};
pub use salary_grade::{CalculationMethod, SalaryComponent, SalaryGrade};
pub use scope::{BenefitScope, ScopeFilter};
pub use summary::{
    BatchCounts, BatchError, BatchOutcomeStatus, BatchTotals, BatchWarning, EmployeeOutcome,
    PayrollSummary,
};
