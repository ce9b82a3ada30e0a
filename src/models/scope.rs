//! Applicability scope for allowances, bonuses and deductions.
//!
//! Scope is modeled as a closed tagged variant with a single resolution
//! function, rather than ad-hoc field presence checks on the definitions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The applicability breadth of an allowance, bonus or deduction definition.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{BenefitScope, ScopeFilter};
/// use uuid::Uuid;
///
/// let department = Uuid::new_v4();
/// let scope = BenefitScope::Department(department);
/// let filter = ScopeFilter {
///     employee: Uuid::new_v4(),
///     department: Some(department),
///     grade_level: None,
/// };
/// assert!(scope.applies_to(&filter));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenefitScope {
    /// Applies to every employee in the company.
    Company,
    /// Applies to employees of the referenced department.
    Department(Uuid),
    /// Applies to employees on the referenced salary grade level.
    Grade(String),
    /// Applies to the single referenced employee.
    Individual(Uuid),
}

/// The employee-side coordinates a scope is resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeFilter {
    /// The employee being processed.
    pub employee: Uuid,
    /// The employee's department, if assigned.
    pub department: Option<Uuid>,
    /// The employee's salary grade level, if resolved.
    pub grade_level: Option<String>,
}

impl BenefitScope {
    /// Returns true if a definition with this scope applies to the employee
    /// described by `filter`.
    pub fn applies_to(&self, filter: &ScopeFilter) -> bool {
        match self {
            BenefitScope::Company => true,
            BenefitScope::Department(id) => filter.department == Some(*id),
            BenefitScope::Grade(level) => filter.grade_level.as_deref() == Some(level.as_str()),
            BenefitScope::Individual(id) => filter.employee == *id,
        }
    }
}
