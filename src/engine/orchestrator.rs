//! Per-employee payroll orchestration.
//!
//! The orchestrator composes the pure calculators into one employee's
//! payroll record and owns the consumption invariant: personal allowances
//! and bonuses are claimed through conditional writes, and any failure
//! after claiming releases every claim, so a failed run leaves no marks.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    FullValuePerformance, PerformanceCalculator, SalaryBreakdown, calculate_total_salary,
    resolve_allowances, resolve_bonuses, resolve_deductions, round_money, rounded_sum,
};
use crate::config::StatutoryConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    PayFrequency, PayPeriod, PayrollDeductions, PayrollEarnings, PayrollRecord, PayrollStatus,
    PayrollTotals, ScopeFilter,
};
use crate::store::{
    AllowanceStore, BonusStore, ClaimOutcome, DeductionStore, EmployeeStore, MemoryStore,
    PayrollStore, SalaryGradeStore,
};

/// A request to compute payroll for one employee and period.
#[derive(Debug, Clone)]
pub struct CalculationRequest {
    /// The employee to process.
    pub employee_id: Uuid,
    /// Overrides the employee's assigned salary grade when set.
    pub salary_grade_id: Option<Uuid>,
    /// Overrides the employee's department when set.
    pub department_id: Option<Uuid>,
    /// The period month (1-12).
    pub month: u32,
    /// The period year.
    pub year: i32,
    /// The payroll frequency for the run.
    pub frequency: PayFrequency,
    /// Who requested the run.
    pub created_by: Option<Uuid>,
    /// Skip the onboarding-completeness precondition.
    pub bypass_onboarding_check: bool,
}

impl CalculationRequest {
    /// Creates a request with default knobs: the employee's assigned grade,
    /// onboarding enforced, no creator recorded.
    pub fn new(employee_id: Uuid, month: u32, year: i32, frequency: PayFrequency) -> Self {
        Self {
            employee_id,
            salary_grade_id: None,
            department_id: None,
            month,
            year,
            frequency,
            created_by: None,
            bypass_onboarding_check: false,
        }
    }
}

/// The payroll engine: stores, statutory configuration, and the pluggable
/// performance calculator.
///
/// Cloning is cheap; clones share the underlying stores, which is how the
/// batch runner fans one engine out across workers.
#[derive(Clone)]
pub struct PayrollEngine {
    employees: Arc<dyn EmployeeStore>,
    grades: Arc<dyn SalaryGradeStore>,
    allowances: Arc<dyn AllowanceStore>,
    bonuses: Arc<dyn BonusStore>,
    deductions: Arc<dyn DeductionStore>,
    payrolls: Arc<dyn PayrollStore>,
    performance: Arc<dyn PerformanceCalculator>,
    config: StatutoryConfig,
}

impl PayrollEngine {
    /// Creates an engine over individual store handles.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        employees: Arc<dyn EmployeeStore>,
        grades: Arc<dyn SalaryGradeStore>,
        allowances: Arc<dyn AllowanceStore>,
        bonuses: Arc<dyn BonusStore>,
        deductions: Arc<dyn DeductionStore>,
        payrolls: Arc<dyn PayrollStore>,
        config: StatutoryConfig,
    ) -> Self {
        Self {
            employees,
            grades,
            allowances,
            bonuses,
            deductions,
            payrolls,
            performance: Arc::new(FullValuePerformance),
            config,
        }
    }

    /// Creates an engine where one [`MemoryStore`] backs every collection.
    pub fn with_memory_store(store: Arc<MemoryStore>, config: StatutoryConfig) -> Self {
        Self::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store,
            config,
        )
    }

    /// Replaces the performance calculator.
    pub fn with_performance_calculator(
        mut self,
        performance: Arc<dyn PerformanceCalculator>,
    ) -> Self {
        self.performance = performance;
        self
    }

    /// Computes a salary grade's structure for preview or reporting,
    /// without touching payroll state.
    pub fn salary_preview(&self, grade_id: Uuid) -> EngineResult<SalaryBreakdown> {
        let grade = self
            .grades
            .find_grade(grade_id)?
            .ok_or_else(|| EngineError::SalaryGradeNotFound {
                grade: grade_id.to_string(),
            })?;
        calculate_total_salary(&grade)
    }

    /// Transitions a payroll record through the approval workflow.
    pub fn update_payroll_status(
        &self,
        payroll_id: Uuid,
        status: PayrollStatus,
        processed_by: Option<Uuid>,
    ) -> EngineResult<()> {
        self.payrolls
            .update_payroll_status(payroll_id, status, processed_by)
    }

    /// Computes and persists the payroll record for one employee and
    /// period.
    ///
    /// Runs the full pipeline: precondition validation, the period
    /// idempotency check, salary structure resolution, allowance and bonus
    /// aggregation, deduction resolution, consumption of the personal
    /// entries, and persistence with status `Pending`. Any failure before
    /// persistence leaves no partial record and no consumed entries.
    pub fn calculate_payroll(&self, request: &CalculationRequest) -> EngineResult<PayrollRecord> {
        let period = PayPeriod::from_month(request.month, request.year)?;

        // Step 1: preconditions.
        let employee = self
            .employees
            .find_employee(request.employee_id)?
            .ok_or(EngineError::EmployeeNotFound {
                id: request.employee_id,
            })?;
        if !employee.is_active {
            return Err(EngineError::InactiveEmployee { id: employee.id });
        }
        let department = request
            .department_id
            .or(employee.department)
            .ok_or(EngineError::MissingDepartment {
                employee: employee.id,
            })?;
        if !request.bypass_onboarding_check && !employee.onboarding_complete {
            return Err(EngineError::OnboardingIncomplete {
                employee: employee.id,
            });
        }

        // Step 2: fail fast on an existing record. The conditional insert
        // at the end is the authoritative check under concurrency.
        if self
            .payrolls
            .find_payroll_for_period(employee.id, period.month, period.year)?
            .is_some()
        {
            return Err(EngineError::DuplicatePayroll {
                employee: employee.id,
                month: period.month,
                year: period.year,
            });
        }

        // Step 3: salary structure.
        let grade_id = request
            .salary_grade_id
            .or(employee.salary_grade)
            .ok_or_else(|| EngineError::SalaryGradeNotFound {
                grade: format!("no salary grade assigned to employee {}", employee.id),
            })?;
        let grade = self
            .grades
            .find_grade(grade_id)?
            .ok_or_else(|| EngineError::SalaryGradeNotFound {
                grade: grade_id.to_string(),
            })?;

        // Steps 4-5: aggregate earnings and compute gross.
        let allowances = resolve_allowances(
            &employee,
            &grade,
            &period,
            request.frequency,
            self.allowances.as_ref(),
            self.performance.as_ref(),
        )?;
        let bonuses = resolve_bonuses(
            employee.id,
            &period,
            grade.basic_salary,
            self.bonuses.as_ref(),
        )?;
        let gross = rounded_sum([grade.basic_salary, allowances.total, bonuses.total]);

        // Step 6: deductions against the full gross.
        let filter = ScopeFilter {
            employee: employee.id,
            department: Some(department),
            grade_level: Some(grade.level.clone()),
        };
        let deductions = resolve_deductions(
            grade.basic_salary,
            gross,
            &filter,
            &self.config,
            self.deductions.as_ref(),
        )?;

        // Step 7: net pay.
        let net = round_money(gross - deductions.total);

        // Step 8: consume the personal entries the aggregation selected.
        let payroll_id = Uuid::new_v4();
        let allowance_entries: Vec<Uuid> = allowances
            .personal_allowances
            .iter()
            .filter_map(|line| line.source)
            .collect();
        let bonus_entries: Vec<Uuid> = bonuses
            .items
            .iter()
            .filter_map(|line| line.source)
            .collect();
        let (claimed_allowances, claimed_bonuses) =
            self.claim_entries(&allowance_entries, &bonus_entries, &period, payroll_id)?;

        // Step 9: persist. A concurrent run for the same period loses here
        // and unwinds its claims.
        let record = PayrollRecord {
            id: payroll_id,
            employee: employee.id,
            department,
            salary_grade: grade.id,
            month: period.month,
            year: period.year,
            frequency: request.frequency,
            basic_salary: grade.basic_salary,
            components: allowances.grade_allowances.clone(),
            earnings: PayrollEarnings {
                allowances: allowances.personal_allowances.clone(),
                bonuses: bonuses.items.clone(),
                total_earnings: rounded_sum([allowances.personal_total, bonuses.total]),
            },
            deductions: PayrollDeductions {
                statutory: deductions.statutory.clone(),
                voluntary: deductions.voluntary.clone(),
                total_deductions: deductions.total,
            },
            totals: PayrollTotals {
                gross_earnings: gross,
                total_deductions: deductions.total,
                net_pay: net,
            },
            status: PayrollStatus::Pending,
            created_by: request.created_by,
            processed_by: None,
            period_start: period.start,
            period_end: period.end,
            created_at: Utc::now(),
        };

        if let Err(err) = self.payrolls.insert_payroll(record.clone()) {
            self.release_claims(&claimed_allowances, &claimed_bonuses, &period);
            warn!(
                employee = %employee.id,
                month = period.month,
                year = period.year,
                error = %err,
                "Payroll persistence failed, claims released"
            );
            return Err(err);
        }

        info!(
            employee = %employee.id,
            payroll = %record.id,
            month = period.month,
            year = period.year,
            gross = %record.totals.gross_earnings,
            net = %record.totals.net_pay,
            "Payroll record created"
        );
        Ok(record)
    }

    /// Claims every entry, unwinding all prior claims on the first denial
    /// or store failure.
    fn claim_entries(
        &self,
        allowance_entries: &[Uuid],
        bonus_entries: &[Uuid],
        period: &PayPeriod,
        payroll_id: Uuid,
    ) -> EngineResult<(Vec<Uuid>, Vec<Uuid>)> {
        let mut claimed_allowances = Vec::new();
        let mut claimed_bonuses = Vec::new();

        for &entry in allowance_entries {
            match self
                .allowances
                .claim_allowance(entry, period.month, period.year, payroll_id)
            {
                Ok(ClaimOutcome::Claimed) => claimed_allowances.push(entry),
                Ok(ClaimOutcome::AlreadyUsed) => {
                    self.release_claims(&claimed_allowances, &claimed_bonuses, period);
                    return Err(EngineError::BenefitAlreadyUsed {
                        entry,
                        month: period.month,
                        year: period.year,
                    });
                }
                Err(err) => {
                    self.release_claims(&claimed_allowances, &claimed_bonuses, period);
                    return Err(err);
                }
            }
        }

        for &entry in bonus_entries {
            match self
                .bonuses
                .claim_bonus(entry, period.month, period.year, payroll_id)
            {
                Ok(ClaimOutcome::Claimed) => claimed_bonuses.push(entry),
                Ok(ClaimOutcome::AlreadyUsed) => {
                    self.release_claims(&claimed_allowances, &claimed_bonuses, period);
                    return Err(EngineError::BenefitAlreadyUsed {
                        entry,
                        month: period.month,
                        year: period.year,
                    });
                }
                Err(err) => {
                    self.release_claims(&claimed_allowances, &claimed_bonuses, period);
                    return Err(err);
                }
            }
        }

        Ok((claimed_allowances, claimed_bonuses))
    }

    /// Releases claims made for this period. Release failures are logged
    /// and swallowed; there is nothing further to unwind.
    fn release_claims(&self, allowance_entries: &[Uuid], bonus_entries: &[Uuid], period: &PayPeriod) {
        for &entry in allowance_entries {
            if let Err(err) = self
                .allowances
                .release_allowance(entry, period.month, period.year)
            {
                warn!(entry = %entry, error = %err, "Failed to release allowance claim");
            }
        }
        for &entry in bonus_entries {
            if let Err(err) = self.bonuses.release_bonus(entry, period.month, period.year) {
                warn!(entry = %entry, error = %err, "Failed to release bonus claim");
            }
        }
    }

    /// The statutory configuration the engine was built with.
    pub fn statutory_config(&self) -> &StatutoryConfig {
        &self.config
    }
}

impl std::fmt::Debug for PayrollEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayrollEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
