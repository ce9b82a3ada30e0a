//! Salary grade and grade-level component models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

/// How a component or allowance value turns into an amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationMethod {
    /// The value is the amount.
    Fixed,
    /// The value is a percentage of basic salary.
    Percentage,
    /// The amount is delegated to a performance calculator.
    PerformanceBased,
}

/// A grade-level allowance component (e.g. housing, transport).
///
/// Percentage components apply against basic salary, never against gross.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryComponent {
    /// The component's name (e.g. "Housing").
    pub name: String,
    /// How the component's value turns into an amount.
    pub method: CalculationMethod,
    /// The fixed amount or percentage, depending on `method`.
    pub value: Decimal,
    /// Whether the component is currently in force.
    pub is_active: bool,
}

/// A salary grade: a basic salary plus grade-level allowance components.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{CalculationMethod, SalaryComponent, SalaryGrade};
/// use rust_decimal::Decimal;
/// use uuid::Uuid;
///
/// let grade = SalaryGrade {
///     id: Uuid::new_v4(),
///     level: "GL-07".to_string(),
///     basic_salary: Decimal::new(250_000, 0),
///     components: vec![SalaryComponent {
///         name: "Housing".to_string(),
///         method: CalculationMethod::Percentage,
///         value: Decimal::new(20, 0),
///         is_active: true,
///     }],
///     department: None,
///     is_active: true,
/// };
/// assert!(grade.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryGrade {
    /// Unique identifier for the grade.
    pub id: Uuid,
    /// The grade's level code, unique across grades (e.g. "GL-07").
    pub level: String,
    /// The monthly basic salary for this grade. Must be positive.
    pub basic_salary: Decimal,
    /// Grade-level allowance components.
    pub components: Vec<SalaryComponent>,
    /// Optional department this grade is scoped to.
    pub department: Option<Uuid>,
    /// Whether the grade is currently assignable.
    pub is_active: bool,
}

impl SalaryGrade {
    /// Validates the grade's invariants.
    ///
    /// Returns `InvalidBasicSalary` when the basic salary is zero or
    /// negative. Level uniqueness is enforced by the grade store on insert,
    /// not here.
    pub fn validate(&self) -> EngineResult<()> {
        if self.basic_salary <= Decimal::ZERO {
            return Err(EngineError::InvalidBasicSalary {
                grade: self.level.clone(),
                value: self.basic_salary,
            });
        }
        Ok(())
    }

    /// Returns the active allowance components of this grade.
    pub fn active_components(&self) -> impl Iterator<Item = &SalaryComponent> {
        self.components.iter().filter(|c| c.is_active)
    }
}
