//! In-memory store implementations.
//!
//! Backs the test suites and serves as the reference semantics for real
//! backends: every claim and insert below is a conditional write performed
//! under one lock acquisition, which is what makes the orchestrator's
//! idempotency and consumption guarantees hold under concurrency.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::StatutoryConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Allowance, BenefitScope, Bonus, Deduction, DeductionKind, DeductionMethod, Department,
    Employee, PayrollRecord, PayrollStatus, PayrollUsage, PersonalAllowance, PersonalBonus,
    SalaryGrade, ScopeFilter, StatutoryCode, TaxBracket, status_transition_allowed,
    validate_brackets,
};

use super::{
    AllowanceStore, BonusStore, ClaimOutcome, DeductionStore, EmployeeStore, PayrollStore,
    SalaryGradeStore,
};

/// An in-memory implementation of every store trait.
///
/// Collections live behind `RwLock`s; cross-collection checks (such as
/// rejecting the deletion of a deduction referenced by pending payroll)
/// are possible because one struct owns all collections.
#[derive(Debug, Default)]
pub struct MemoryStore {
    employees: RwLock<HashMap<Uuid, Employee>>,
    departments: RwLock<HashMap<Uuid, Department>>,
    grades: RwLock<HashMap<Uuid, SalaryGrade>>,
    allowance_definitions: RwLock<HashMap<Uuid, Allowance>>,
    personal_allowances: RwLock<HashMap<Uuid, PersonalAllowance>>,
    bonus_definitions: RwLock<HashMap<Uuid, Bonus>>,
    personal_bonuses: RwLock<HashMap<Uuid, PersonalBonus>>,
    deductions: RwLock<HashMap<Uuid, Deduction>>,
    payrolls: RwLock<HashMap<Uuid, PayrollRecord>>,
}

fn read<T>(lock: &RwLock<T>) -> EngineResult<RwLockReadGuard<'_, T>> {
    lock.read().map_err(|_| EngineError::Store {
        message: "store lock poisoned".to_string(),
    })
}

fn write<T>(lock: &RwLock<T>) -> EngineResult<RwLockWriteGuard<'_, T>> {
    lock.write().map_err(|_| EngineError::Store {
        message: "store lock poisoned".to_string(),
    })
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with the statutory deductions already seeded.
    pub fn with_statutory(config: &StatutoryConfig) -> EngineResult<Self> {
        let store = Self::new();
        store.seed_statutory(config)?;
        Ok(store)
    }

    /// Seeds the three statutory deductions from the configuration.
    ///
    /// A no-op when statutory deductions are already present, so repeated
    /// startup seeding cannot duplicate them.
    pub fn seed_statutory(&self, config: &StatutoryConfig) -> EngineResult<()> {
        if !self.statutory_deductions()?.is_empty() {
            return Ok(());
        }

        self.insert_deduction(Deduction {
            id: Uuid::new_v4(),
            name: "PAYE".to_string(),
            kind: DeductionKind::Statutory,
            method: DeductionMethod::Progressive,
            value: Decimal::ZERO,
            tax_brackets: config.paye_brackets.clone(),
            scope: BenefitScope::Company,
            statutory_code: Some(StatutoryCode::Paye),
            is_active: true,
        })?;
        self.insert_deduction(Deduction {
            id: Uuid::new_v4(),
            name: "Pension".to_string(),
            kind: DeductionKind::Statutory,
            method: DeductionMethod::Percentage,
            value: config.pension_rate,
            tax_brackets: vec![],
            scope: BenefitScope::Company,
            statutory_code: Some(StatutoryCode::Pension),
            is_active: true,
        })?;
        self.insert_deduction(Deduction {
            id: Uuid::new_v4(),
            name: "NHF".to_string(),
            kind: DeductionKind::Statutory,
            method: DeductionMethod::Percentage,
            value: config.nhf_rate,
            tax_brackets: vec![],
            scope: BenefitScope::Company,
            statutory_code: Some(StatutoryCode::Nhf),
            is_active: true,
        })
    }

    /// Inserts an employee.
    pub fn insert_employee(&self, employee: Employee) {
        if let Ok(mut employees) = self.employees.write() {
            employees.insert(employee.id, employee);
        }
    }

    /// Inserts a department.
    pub fn insert_department(&self, department: Department) {
        if let Ok(mut departments) = self.departments.write() {
            departments.insert(department.id, department);
        }
    }

    /// Inserts an allowance definition.
    pub fn insert_allowance_definition(&self, allowance: Allowance) {
        if let Ok(mut definitions) = self.allowance_definitions.write() {
            definitions.insert(allowance.id, allowance);
        }
    }

    /// Inserts a personal allowance entry.
    pub fn insert_personal_allowance(&self, entry: PersonalAllowance) {
        if let Ok(mut entries) = self.personal_allowances.write() {
            entries.insert(entry.id, entry);
        }
    }

    /// Inserts a bonus definition.
    pub fn insert_bonus_definition(&self, bonus: Bonus) {
        if let Ok(mut definitions) = self.bonus_definitions.write() {
            definitions.insert(bonus.id, bonus);
        }
    }

    /// Inserts a personal bonus entry.
    pub fn insert_personal_bonus(&self, entry: PersonalBonus) {
        if let Ok(mut entries) = self.personal_bonuses.write() {
            entries.insert(entry.id, entry);
        }
    }

    /// Returns a personal allowance entry by id.
    pub fn personal_allowance(&self, id: Uuid) -> EngineResult<Option<PersonalAllowance>> {
        Ok(read(&self.personal_allowances)?.get(&id).cloned())
    }

    /// Returns a personal bonus entry by id.
    pub fn personal_bonus(&self, id: Uuid) -> EngineResult<Option<PersonalBonus>> {
        Ok(read(&self.personal_bonuses)?.get(&id).cloned())
    }

    /// Returns the number of persisted payroll records.
    pub fn payroll_count(&self) -> EngineResult<usize> {
        Ok(read(&self.payrolls)?.len())
    }
}

impl EmployeeStore for MemoryStore {
    fn find_employee(&self, id: Uuid) -> EngineResult<Option<Employee>> {
        Ok(read(&self.employees)?.get(&id).cloned())
    }

    fn find_department(&self, id: Uuid) -> EngineResult<Option<Department>> {
        Ok(read(&self.departments)?.get(&id).cloned())
    }
}

impl SalaryGradeStore for MemoryStore {
    fn insert_grade(&self, grade: SalaryGrade) -> EngineResult<()> {
        grade.validate()?;
        let mut grades = write(&self.grades)?;
        if grades
            .values()
            .any(|existing| existing.level == grade.level && existing.id != grade.id)
        {
            return Err(EngineError::Store {
                message: format!("salary grade level '{}' already exists", grade.level),
            });
        }
        grades.insert(grade.id, grade);
        Ok(())
    }

    fn find_grade(&self, id: Uuid) -> EngineResult<Option<SalaryGrade>> {
        Ok(read(&self.grades)?.get(&id).cloned())
    }

    fn find_grade_by_level(&self, level: &str) -> EngineResult<Option<SalaryGrade>> {
        Ok(read(&self.grades)?
            .values()
            .find(|grade| grade.level == level)
            .cloned())
    }
}

impl AllowanceStore for MemoryStore {
    fn find_allowance(&self, id: Uuid) -> EngineResult<Option<Allowance>> {
        Ok(read(&self.allowance_definitions)?.get(&id).cloned())
    }

    fn personal_allowances_for(&self, employee: Uuid) -> EngineResult<Vec<PersonalAllowance>> {
        Ok(read(&self.personal_allowances)?
            .values()
            .filter(|entry| entry.employee == employee)
            .cloned()
            .collect())
    }

    fn claim_allowance(
        &self,
        entry: Uuid,
        month: u32,
        year: i32,
        payroll_id: Uuid,
    ) -> EngineResult<ClaimOutcome> {
        let mut entries = write(&self.personal_allowances)?;
        let record = entries.get_mut(&entry).ok_or_else(|| EngineError::Store {
            message: format!("personal allowance {} not found", entry),
        })?;

        if record.used_in_payroll.is_some() {
            return Ok(ClaimOutcome::AlreadyUsed);
        }

        record.used_in_payroll = Some(PayrollUsage {
            month,
            year,
            payroll_id: Some(payroll_id),
        });
        Ok(ClaimOutcome::Claimed)
    }

    fn release_allowance(&self, entry: Uuid, month: u32, year: i32) -> EngineResult<()> {
        let mut entries = write(&self.personal_allowances)?;
        if let Some(record) = entries.get_mut(&entry) {
            if record.is_used_for(month, year) {
                record.used_in_payroll = None;
            }
        }
        Ok(())
    }
}

impl BonusStore for MemoryStore {
    fn find_bonus(&self, id: Uuid) -> EngineResult<Option<Bonus>> {
        Ok(read(&self.bonus_definitions)?.get(&id).cloned())
    }

    fn personal_bonuses_for(&self, employee: Uuid) -> EngineResult<Vec<PersonalBonus>> {
        Ok(read(&self.personal_bonuses)?
            .values()
            .filter(|entry| entry.employee == employee)
            .cloned()
            .collect())
    }

    fn claim_bonus(
        &self,
        entry: Uuid,
        month: u32,
        year: i32,
        payroll_id: Uuid,
    ) -> EngineResult<ClaimOutcome> {
        let mut entries = write(&self.personal_bonuses)?;
        let record = entries.get_mut(&entry).ok_or_else(|| EngineError::Store {
            message: format!("personal bonus {} not found", entry),
        })?;

        if record.used_in_payroll.is_some() {
            return Ok(ClaimOutcome::AlreadyUsed);
        }

        record.used_in_payroll = Some(PayrollUsage {
            month,
            year,
            payroll_id: Some(payroll_id),
        });
        Ok(ClaimOutcome::Claimed)
    }

    fn release_bonus(&self, entry: Uuid, month: u32, year: i32) -> EngineResult<()> {
        let mut entries = write(&self.personal_bonuses)?;
        if let Some(record) = entries.get_mut(&entry) {
            if record.is_used_for(month, year) {
                record.used_in_payroll = None;
            }
        }
        Ok(())
    }
}

impl DeductionStore for MemoryStore {
    fn insert_deduction(&self, deduction: Deduction) -> EngineResult<()> {
        if deduction.method == DeductionMethod::Progressive {
            validate_brackets(&deduction.tax_brackets)?;
        }
        write(&self.deductions)?.insert(deduction.id, deduction);
        Ok(())
    }

    fn find_deduction(&self, id: Uuid) -> EngineResult<Option<Deduction>> {
        Ok(read(&self.deductions)?.get(&id).cloned())
    }

    fn update_deduction_value(&self, id: Uuid, value: Decimal) -> EngineResult<()> {
        let mut deductions = write(&self.deductions)?;
        let deduction = deductions.get_mut(&id).ok_or_else(|| EngineError::Store {
            message: format!("deduction {} not found", id),
        })?;

        if deduction.is_statutory() {
            return Err(EngineError::ProtectedDeduction {
                name: deduction.name.clone(),
                message: "value cannot be edited directly".to_string(),
            });
        }

        deduction.value = value;
        Ok(())
    }

    fn update_deduction_brackets(&self, id: Uuid, brackets: Vec<TaxBracket>) -> EngineResult<()> {
        validate_brackets(&brackets)?;
        let mut deductions = write(&self.deductions)?;
        let deduction = deductions.get_mut(&id).ok_or_else(|| EngineError::Store {
            message: format!("deduction {} not found", id),
        })?;
        deduction.tax_brackets = brackets;
        Ok(())
    }

    fn set_deduction_active(&self, id: Uuid, active: bool) -> EngineResult<()> {
        let mut deductions = write(&self.deductions)?;
        let deduction = deductions.get_mut(&id).ok_or_else(|| EngineError::Store {
            message: format!("deduction {} not found", id),
        })?;

        if deduction.is_statutory() && !active {
            return Err(EngineError::ProtectedDeduction {
                name: deduction.name.clone(),
                message: "statutory deductions cannot be deactivated".to_string(),
            });
        }

        deduction.is_active = active;
        Ok(())
    }

    fn delete_deduction(&self, id: Uuid) -> EngineResult<()> {
        let mut deductions = write(&self.deductions)?;
        let deduction = deductions.get(&id).ok_or_else(|| EngineError::Store {
            message: format!("deduction {} not found", id),
        })?;

        if deduction.is_statutory() {
            return Err(EngineError::ProtectedDeduction {
                name: deduction.name.clone(),
                message: "statutory deductions cannot be deleted".to_string(),
            });
        }

        let referenced = read(&self.payrolls)?.values().any(|record| {
            record.is_pending()
                && record
                    .deductions
                    .voluntary
                    .iter()
                    .any(|line| line.source == Some(id))
        });
        if referenced {
            return Err(EngineError::DeductionInUse {
                name: deduction.name.clone(),
            });
        }

        deductions.remove(&id);
        Ok(())
    }

    fn statutory_deductions(&self) -> EngineResult<Vec<Deduction>> {
        Ok(read(&self.deductions)?
            .values()
            .filter(|d| d.is_statutory() && d.is_active)
            .cloned()
            .collect())
    }

    fn active_voluntary_matching(&self, filter: &ScopeFilter) -> EngineResult<Vec<Deduction>> {
        Ok(read(&self.deductions)?
            .values()
            .filter(|d| {
                d.kind == DeductionKind::Voluntary && d.is_active && d.scope.applies_to(filter)
            })
            .cloned()
            .collect())
    }
}

impl PayrollStore for MemoryStore {
    fn find_payroll_for_period(
        &self,
        employee: Uuid,
        month: u32,
        year: i32,
    ) -> EngineResult<Option<PayrollRecord>> {
        Ok(read(&self.payrolls)?
            .values()
            .find(|record| {
                record.employee == employee && record.month == month && record.year == year
            })
            .cloned())
    }

    fn insert_payroll(&self, record: PayrollRecord) -> EngineResult<()> {
        let mut payrolls = write(&self.payrolls)?;
        if payrolls.values().any(|existing| {
            existing.employee == record.employee
                && existing.month == record.month
                && existing.year == record.year
        }) {
            return Err(EngineError::DuplicatePayroll {
                employee: record.employee,
                month: record.month,
                year: record.year,
            });
        }
        payrolls.insert(record.id, record);
        Ok(())
    }

    fn find_payroll(&self, id: Uuid) -> EngineResult<Option<PayrollRecord>> {
        Ok(read(&self.payrolls)?.get(&id).cloned())
    }

    fn update_payroll_status(
        &self,
        id: Uuid,
        status: PayrollStatus,
        processed_by: Option<Uuid>,
    ) -> EngineResult<()> {
        let mut payrolls = write(&self.payrolls)?;
        let record = payrolls.get_mut(&id).ok_or_else(|| EngineError::Store {
            message: format!("payroll record {} not found", id),
        })?;

        if !status_transition_allowed(record.status, status) {
            return Err(EngineError::InvalidStatusTransition {
                from: format!("{:?}", record.status),
                to: format!("{:?}", status),
            });
        }

        record.status = status;
        if processed_by.is_some() {
            record.processed_by = processed_by;
        }
        Ok(())
    }

    fn delete_payroll(&self, id: Uuid) -> EngineResult<()> {
        write(&self.payrolls)?.remove(&id);
        Ok(())
    }
}
