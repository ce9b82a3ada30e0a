//! Collaborator store interfaces.
//!
//! The engine consumes and exposes plain data records; persistence lives
//! behind these traits. Implementations must be `Send + Sync` so that the
//! batch runner can fan employees out across workers, and the claim and
//! insert operations must be conditional writes: the orchestrator's
//! idempotency and consumption guarantees rest on them.

mod memory;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{
    Allowance, Bonus, Deduction, Department, Employee, PayrollRecord, PayrollStatus,
    PersonalAllowance, PersonalBonus, SalaryGrade, ScopeFilter, TaxBracket,
};

pub use memory::MemoryStore;

/// The result of a conditional claim on a personal allowance or bonus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The entry was unclaimed and is now marked used.
    Claimed,
    /// The entry was already consumed; nothing was written.
    AlreadyUsed,
}

/// Read access to employees and departments.
pub trait EmployeeStore: Send + Sync {
    /// Looks up an employee by id.
    fn find_employee(&self, id: Uuid) -> EngineResult<Option<Employee>>;
    /// Looks up a department by id.
    fn find_department(&self, id: Uuid) -> EngineResult<Option<Department>>;
}

/// Access to salary grades.
pub trait SalaryGradeStore: Send + Sync {
    /// Inserts a grade, enforcing level uniqueness.
    fn insert_grade(&self, grade: SalaryGrade) -> EngineResult<()>;
    /// Looks up a grade by id.
    fn find_grade(&self, id: Uuid) -> EngineResult<Option<SalaryGrade>>;
    /// Looks up a grade by its level code.
    fn find_grade_by_level(&self, level: &str) -> EngineResult<Option<SalaryGrade>>;
}

/// Access to allowance definitions and per-employee allowance entries.
pub trait AllowanceStore: Send + Sync {
    /// Looks up an allowance definition by id.
    fn find_allowance(&self, id: Uuid) -> EngineResult<Option<Allowance>>;
    /// Returns all personal allowance entries for an employee.
    fn personal_allowances_for(&self, employee: Uuid) -> EngineResult<Vec<PersonalAllowance>>;
    /// Conditionally marks an entry used for a period.
    ///
    /// The write must be atomic with respect to concurrent claims: exactly
    /// one caller observes [`ClaimOutcome::Claimed`] for an unclaimed entry.
    fn claim_allowance(
        &self,
        entry: Uuid,
        month: u32,
        year: i32,
        payroll_id: Uuid,
    ) -> EngineResult<ClaimOutcome>;
    /// Reverts a claim made for the given period.
    ///
    /// A marker belonging to a different period is left untouched.
    fn release_allowance(&self, entry: Uuid, month: u32, year: i32) -> EngineResult<()>;
}

/// Access to bonus definitions and per-employee bonus entries.
pub trait BonusStore: Send + Sync {
    /// Looks up a bonus definition by id.
    fn find_bonus(&self, id: Uuid) -> EngineResult<Option<Bonus>>;
    /// Returns all personal bonus entries for an employee.
    fn personal_bonuses_for(&self, employee: Uuid) -> EngineResult<Vec<PersonalBonus>>;
    /// Conditionally marks an entry used for a period. See
    /// [`AllowanceStore::claim_allowance`].
    fn claim_bonus(
        &self,
        entry: Uuid,
        month: u32,
        year: i32,
        payroll_id: Uuid,
    ) -> EngineResult<ClaimOutcome>;
    /// Reverts a claim made for the given period.
    fn release_bonus(&self, entry: Uuid, month: u32, year: i32) -> EngineResult<()>;
}

/// Access to deduction definitions, including the statutory protections.
///
/// Statutory deductions are system-seeded: implementations must reject
/// value edits, deactivation and deletion of statutory definitions, and
/// deletion of voluntary definitions still referenced by pending payroll.
/// Only tax brackets remain editable on PAYE.
pub trait DeductionStore: Send + Sync {
    /// Inserts a definition, validating progressive brackets.
    fn insert_deduction(&self, deduction: Deduction) -> EngineResult<()>;
    /// Looks up a definition by id.
    fn find_deduction(&self, id: Uuid) -> EngineResult<Option<Deduction>>;
    /// Edits a definition's value. Fails with `ProtectedDeduction` for
    /// statutory definitions.
    fn update_deduction_value(&self, id: Uuid, value: Decimal) -> EngineResult<()>;
    /// Replaces a definition's tax brackets after validating them.
    fn update_deduction_brackets(&self, id: Uuid, brackets: Vec<TaxBracket>) -> EngineResult<()>;
    /// Activates or deactivates a definition. Deactivating a statutory
    /// definition fails with `ProtectedDeduction`.
    fn set_deduction_active(&self, id: Uuid, active: bool) -> EngineResult<()>;
    /// Deletes a definition. Fails with `ProtectedDeduction` for statutory
    /// definitions and `DeductionInUse` for voluntary definitions
    /// referenced by pending payroll.
    fn delete_deduction(&self, id: Uuid) -> EngineResult<()>;
    /// Returns the active statutory definitions.
    fn statutory_deductions(&self) -> EngineResult<Vec<Deduction>>;
    /// Returns the active voluntary definitions whose scope matches the
    /// filter.
    fn active_voluntary_matching(&self, filter: &ScopeFilter) -> EngineResult<Vec<Deduction>>;
}

/// Access to payroll records.
pub trait PayrollStore: Send + Sync {
    /// Looks up the record for an employee and period, if any.
    fn find_payroll_for_period(
        &self,
        employee: Uuid,
        month: u32,
        year: i32,
    ) -> EngineResult<Option<PayrollRecord>>;
    /// Inserts a record, enforcing at most one per (employee, month, year).
    ///
    /// The uniqueness check and the insert must be one atomic operation;
    /// concurrent inserts for the same period resolve to exactly one
    /// winner, the rest failing with `DuplicatePayroll`.
    fn insert_payroll(&self, record: PayrollRecord) -> EngineResult<()>;
    /// Looks up a record by id.
    fn find_payroll(&self, id: Uuid) -> EngineResult<Option<PayrollRecord>>;
    /// Transitions a record's status through the approval workflow.
    fn update_payroll_status(
        &self,
        id: Uuid,
        status: PayrollStatus,
        processed_by: Option<Uuid>,
    ) -> EngineResult<()>;
    /// Removes a record. Used to unwind a failed orchestration.
    fn delete_payroll(&self, id: Uuid) -> EngineResult<()>;
}
