//! Batch payroll processing.
//!
//! Drives the orchestrator over a cohort of employees, fanning out to a
//! bounded set of workers. One employee's failure never aborts the batch;
//! the caller always receives a [`PayrollSummary`], even when every
//! employee fails.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::BatchConfig;
use crate::error::EngineResult;
use crate::models::{
    BatchCounts, BatchError, BatchOutcomeStatus, BatchTotals, BatchWarning, EmployeeOutcome,
    PayrollRecord, PayrollSummary,
};

use super::orchestrator::{CalculationRequest, PayrollEngine};

impl PayrollEngine {
    /// Runs payroll for a cohort of employees and period.
    ///
    /// Employees process concurrently up to `config.max_concurrency`;
    /// outcomes are reported in submission order. Successful runs count as
    /// processed, benign precondition failures as skipped (with a warning
    /// naming the employee), anything else as failed (with a typed error
    /// entry preserving the full message for audit).
    pub async fn run_batch(&self, employee_ids: &[Uuid], config: &BatchConfig) -> PayrollSummary {
        let batch_id = Uuid::new_v4();
        let started = Instant::now();
        info!(
            batch = %batch_id,
            employees = employee_ids.len(),
            month = config.month,
            year = config.year,
            "Starting batch payroll run"
        );

        let semaphore = Arc::new(Semaphore::new(config.max_concurrency.max(1)));
        let mut join_set: JoinSet<(usize, EngineResult<PayrollRecord>)> = JoinSet::new();

        for (index, &employee_id) in employee_ids.iter().enumerate() {
            let engine = self.clone();
            let semaphore = Arc::clone(&semaphore);
            let request = CalculationRequest {
                employee_id,
                salary_grade_id: None,
                department_id: None,
                month: config.month,
                year: config.year,
                frequency: config.frequency,
                created_by: config.created_by,
                bypass_onboarding_check: config.bypass_onboarding_check,
            };
            join_set.spawn(async move {
                // The semaphore is never closed, so acquisition only fails
                // if the runtime is tearing down.
                let _permit = semaphore.acquire_owned().await.ok();
                (index, engine.calculate_payroll(&request))
            });
        }

        let mut results: Vec<Option<EngineResult<PayrollRecord>>> =
            employee_ids.iter().map(|_| None).collect();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, result)) => results[index] = Some(result),
                Err(join_error) => {
                    warn!(batch = %batch_id, error = %join_error, "Batch worker terminated");
                }
            }
        }

        let mut counts = BatchCounts {
            total_attempted: employee_ids.len(),
            ..BatchCounts::default()
        };
        let mut totals = BatchTotals::default();
        let mut outcomes = Vec::with_capacity(employee_ids.len());
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        for (index, result) in results.into_iter().enumerate() {
            let employee = employee_ids[index];
            match result {
                Some(Ok(record)) => {
                    counts.processed += 1;
                    totals.gross_pay += record.totals.gross_earnings;
                    totals.deductions += record.totals.total_deductions;
                    totals.net_pay += record.totals.net_pay;
                    outcomes.push(EmployeeOutcome {
                        employee,
                        status: BatchOutcomeStatus::Processed,
                        payroll_id: Some(record.id),
                        detail: None,
                    });
                }
                Some(Err(err)) if err.is_precondition() => {
                    counts.skipped += 1;
                    warnings.push(BatchWarning {
                        employee: Some(employee),
                        message: err.to_string(),
                    });
                    outcomes.push(EmployeeOutcome {
                        employee,
                        status: BatchOutcomeStatus::Skipped,
                        payroll_id: None,
                        detail: Some(err.to_string()),
                    });
                }
                Some(Err(err)) => {
                    counts.failed += 1;
                    errors.push(BatchError {
                        employee: Some(employee),
                        code: err.code().to_string(),
                        message: err.to_string(),
                    });
                    outcomes.push(EmployeeOutcome {
                        employee,
                        status: BatchOutcomeStatus::Failed,
                        payroll_id: None,
                        detail: Some(err.to_string()),
                    });
                }
                None => {
                    counts.failed += 1;
                    errors.push(BatchError {
                        employee: Some(employee),
                        code: "WORKER_FAILED".to_string(),
                        message: "batch worker terminated unexpectedly".to_string(),
                    });
                    outcomes.push(EmployeeOutcome {
                        employee,
                        status: BatchOutcomeStatus::Failed,
                        payroll_id: None,
                        detail: Some("batch worker terminated unexpectedly".to_string()),
                    });
                }
            }
        }

        let processing_time_ms = started.elapsed().as_millis() as u64;
        info!(
            batch = %batch_id,
            processed = counts.processed,
            skipped = counts.skipped,
            failed = counts.failed,
            duration_ms = processing_time_ms,
            "Batch payroll run complete"
        );

        PayrollSummary {
            batch_id,
            month: config.month,
            year: config.year,
            frequency: config.frequency,
            counts,
            totals,
            outcomes,
            errors,
            warnings,
            processing_time_ms,
        }
    }
}
