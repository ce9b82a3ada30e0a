//! Error types for the Payroll Calculation Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during payroll processing.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// The main error type for the Payroll Calculation Engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
/// use uuid::Uuid;
///
/// let error = EngineError::EmployeeNotFound { id: Uuid::nil() };
/// assert_eq!(
///     error.to_string(),
///     "Employee not found: 00000000-0000-0000-0000-000000000000"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// The employee record was not found in the store.
    #[error("Employee not found: {id}")]
    EmployeeNotFound {
        /// The employee id that was not found.
        id: Uuid,
    },

    /// The employee exists but is not active.
    #[error("Employee {id} is not active")]
    InactiveEmployee {
        /// The inactive employee's id.
        id: Uuid,
    },

    /// The employee has no department assigned.
    #[error("Employee {employee} has no department assigned")]
    MissingDepartment {
        /// The employee missing a department.
        employee: Uuid,
    },

    /// The employee has not completed onboarding.
    #[error("Employee {employee} has not completed onboarding")]
    OnboardingIncomplete {
        /// The employee with incomplete onboarding.
        employee: Uuid,
    },

    /// The salary grade was not found.
    #[error("Salary grade not found: {grade}")]
    SalaryGradeNotFound {
        /// The grade id or level that was not found.
        grade: String,
    },

    /// A salary grade carried a basic salary that is zero or negative.
    #[error("Invalid basic salary {value} for grade '{grade}'")]
    InvalidBasicSalary {
        /// The grade level with the invalid salary.
        grade: String,
        /// The offending value.
        value: Decimal,
    },

    /// A payroll record already exists for the employee and period.
    #[error("Payroll already exists for employee {employee} in {month}/{year}")]
    DuplicatePayroll {
        /// The employee with the existing record.
        employee: Uuid,
        /// The period month (1-12).
        month: u32,
        /// The period year.
        year: i32,
    },

    /// A personal allowance or bonus was already consumed for the period.
    #[error("Benefit entry {entry} already used in payroll for {month}/{year}")]
    BenefitAlreadyUsed {
        /// The personal allowance or bonus entry id.
        entry: Uuid,
        /// The period month the entry was consumed for.
        month: u32,
        /// The period year the entry was consumed for.
        year: i32,
    },

    /// A month outside 1-12 or an otherwise unrepresentable period.
    #[error("Invalid pay period {month}/{year}")]
    InvalidPeriod {
        /// The offending month.
        month: u32,
        /// The offending year.
        year: i32,
    },

    /// Tax brackets were malformed at the point of creation.
    #[error("Invalid tax brackets: {message}")]
    InvalidTaxBrackets {
        /// A description of what made the brackets invalid.
        message: String,
    },

    /// A statutory deduction was targeted by a forbidden mutation.
    #[error("Deduction '{name}' is protected: {message}")]
    ProtectedDeduction {
        /// The deduction's name.
        name: String,
        /// Why the mutation was rejected.
        message: String,
    },

    /// A voluntary deduction is still referenced by pending payroll.
    #[error("Deduction '{name}' is referenced by pending payroll and cannot be deleted")]
    DeductionInUse {
        /// The deduction's name.
        name: String,
    },

    /// A payroll status change violated the approval workflow.
    #[error("Invalid payroll status transition from {from} to {to}")]
    InvalidStatusTransition {
        /// The record's current status.
        from: String,
        /// The rejected target status.
        to: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },

    /// A data store operation failed.
    #[error("Store error: {message}")]
    Store {
        /// A description of the store failure.
        message: String,
    },
}

impl EngineError {
    /// Returns true for benign precondition failures.
    ///
    /// The batch runner reports these outcomes as "skipped" rather than
    /// "failed": an employee who has not finished onboarding, already has a
    /// record for the period, is inactive, or has no department should not
    /// poison a batch.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            EngineError::OnboardingIncomplete { .. }
                | EngineError::DuplicatePayroll { .. }
                | EngineError::MissingDepartment { .. }
                | EngineError::InactiveEmployee { .. }
        )
    }

    /// Returns a stable machine-readable code for this error.
    ///
    /// Batch summaries carry these codes in their error entries so that
    /// downstream reporting does not have to parse display strings.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::EmployeeNotFound { .. } => "EMPLOYEE_NOT_FOUND",
            EngineError::InactiveEmployee { .. } => "INACTIVE_EMPLOYEE",
            EngineError::MissingDepartment { .. } => "MISSING_DEPARTMENT",
            EngineError::OnboardingIncomplete { .. } => "ONBOARDING_INCOMPLETE",
            EngineError::SalaryGradeNotFound { .. } => "SALARY_GRADE_NOT_FOUND",
            EngineError::InvalidBasicSalary { .. } => "INVALID_BASIC_SALARY",
            EngineError::DuplicatePayroll { .. } => "DUPLICATE_PAYROLL",
            EngineError::BenefitAlreadyUsed { .. } => "BENEFIT_ALREADY_USED",
            EngineError::InvalidPeriod { .. } => "INVALID_PERIOD",
            EngineError::InvalidTaxBrackets { .. } => "INVALID_TAX_BRACKETS",
            EngineError::ProtectedDeduction { .. } => "PROTECTED_DEDUCTION",
            EngineError::DeductionInUse { .. } => "DEDUCTION_IN_USE",
            EngineError::InvalidStatusTransition { .. } => "INVALID_STATUS_TRANSITION",
            EngineError::ConfigNotFound { .. } => "CONFIG_NOT_FOUND",
            EngineError::ConfigParseError { .. } => "CONFIG_PARSE_ERROR",
            EngineError::CalculationError { .. } => "CALCULATION_ERROR",
            EngineError::Store { .. } => "STORE_ERROR",
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
