//! Employee and department models.
//!
//! The engine treats employees and departments as externally-owned records:
//! it only reads the fields needed to validate and compute a payroll run.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A department an employee belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Unique identifier for the department.
    pub id: Uuid,
    /// The department's display name.
    pub name: String,
}

/// An employee subject to payroll processing.
///
/// # Example
///
/// ```
/// use payroll_engine::models::Employee;
/// use uuid::Uuid;
///
/// let employee = Employee {
///     id: Uuid::new_v4(),
///     name: "Adaeze Obi".to_string(),
///     department: Some(Uuid::new_v4()),
///     salary_grade: Some(Uuid::new_v4()),
///     is_active: true,
///     onboarding_complete: true,
/// };
/// assert!(employee.is_payable());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: Uuid,
    /// The employee's full name.
    pub name: String,
    /// The department the employee belongs to, if assigned.
    pub department: Option<Uuid>,
    /// The employee's default salary grade, if assigned.
    pub salary_grade: Option<Uuid>,
    /// Whether the employee is currently active.
    pub is_active: bool,
    /// Whether the employee has completed onboarding.
    pub onboarding_complete: bool,
}

impl Employee {
    /// Returns true if the employee passes every payroll precondition:
    /// active, department assigned, onboarding complete.
    pub fn is_payable(&self) -> bool {
        self.is_active && self.department.is_some() && self.onboarding_complete
    }
}
