//! Integration tests for the Payroll Calculation Engine.
//!
//! This suite covers the full pipeline end to end:
//! - The worked example (basic 250,000 with a 20% housing component)
//! - Frequency proration of personal allowances
//! - Period idempotency and duplicate rejection
//! - Exactly-once consumption of personal allowances and bonuses
//! - Batch semantics (partial failure isolation, skip classification)
//! - Concurrent orchestration for the same employee and period
//! - Property tests: tax monotonicity, boundary continuity, rounding
//!   reconciliation

use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use payroll_engine::calculation::{compute_progressive_tax, round_money};
use payroll_engine::config::{BatchConfig, StatutoryConfig};
use payroll_engine::engine::{CalculationRequest, PayrollEngine};
use payroll_engine::error::EngineError;
use payroll_engine::models::{
    Allowance, AllowanceFrequency, ApprovalStatus, BenefitScope, Bonus, BonusType,
    CalculationMethod, Department, Employee, PayFrequency, PersonalAllowance, PersonalBonus,
    SalaryComponent, SalaryGrade, TaxBracket,
};
use payroll_engine::store::{MemoryStore, PayrollStore, SalaryGradeStore};

// =============================================================================
// Test Helpers
// =============================================================================

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

struct World {
    store: Arc<MemoryStore>,
    engine: PayrollEngine,
    department: Uuid,
    grade: Uuid,
}

fn create_world() -> World {
    let store = Arc::new(MemoryStore::with_statutory(&StatutoryConfig::default()).unwrap());

    let department = Department {
        id: Uuid::new_v4(),
        name: "Engineering".to_string(),
    };
    store.insert_department(department.clone());

    let grade = SalaryGrade {
        id: Uuid::new_v4(),
        level: "GL-07".to_string(),
        basic_salary: dec("250000"),
        components: vec![SalaryComponent {
            name: "Housing".to_string(),
            method: CalculationMethod::Percentage,
            value: dec("20"),
            is_active: true,
        }],
        department: None,
        is_active: true,
    };
    store.insert_grade(grade.clone()).unwrap();

    let engine = PayrollEngine::with_memory_store(store.clone(), StatutoryConfig::default());

    World {
        store,
        engine,
        department: department.id,
        grade: grade.id,
    }
}

fn hire(world: &World, name: &str) -> Uuid {
    let employee = Employee {
        id: Uuid::new_v4(),
        name: name.to_string(),
        department: Some(world.department),
        salary_grade: Some(world.grade),
        is_active: true,
        onboarding_complete: true,
    };
    let id = employee.id;
    world.store.insert_employee(employee);
    id
}

fn grant_allowance(
    world: &World,
    employee: Uuid,
    name: &str,
    method: CalculationMethod,
    value: &str,
    frequency: AllowanceFrequency,
) -> Uuid {
    let definition = Allowance {
        id: Uuid::new_v4(),
        name: name.to_string(),
        method,
        value: dec(value),
        frequency,
        scope: BenefitScope::Individual(employee),
        effective_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        expiry_date: None,
        is_active: true,
    };
    let entry = PersonalAllowance {
        id: Uuid::new_v4(),
        employee,
        allowance: definition.id,
        status: ApprovalStatus::Approved,
        used_in_payroll: None,
    };
    let entry_id = entry.id;
    world.store.insert_allowance_definition(definition);
    world.store.insert_personal_allowance(entry);
    entry_id
}

fn grant_bonus(
    world: &World,
    employee: Uuid,
    name: &str,
    bonus_type: BonusType,
    amount: &str,
    payment_date: NaiveDate,
) -> Uuid {
    let definition = Bonus {
        id: Uuid::new_v4(),
        name: name.to_string(),
        bonus_type,
        amount: dec(amount),
        performance: None,
    };
    let entry = PersonalBonus {
        id: Uuid::new_v4(),
        employee,
        bonus: definition.id,
        status: ApprovalStatus::Approved,
        payment_date,
        used_in_payroll: None,
    };
    let entry_id = entry.id;
    world.store.insert_bonus_definition(definition);
    world.store.insert_personal_bonus(entry);
    entry_id
}

fn march(employee: Uuid) -> CalculationRequest {
    CalculationRequest::new(employee, 3, 2025, PayFrequency::Monthly)
}

// =============================================================================
// Worked Example
// =============================================================================

#[test]
fn test_worked_example_end_to_end() {
    let world = create_world();
    let employee = hire(&world, "Adaeze Obi");

    let record = world.engine.calculate_payroll(&march(employee)).unwrap();

    // Basic 250,000; Housing 20% -> 50,000; gross 300,000.
    assert_eq!(record.basic_salary, dec("250000"));
    assert_eq!(record.components.len(), 1);
    assert_eq!(record.components[0].amount, dec("50000"));
    assert_eq!(record.totals.gross_earnings, dec("300000"));

    // Annualized 3,600,000 over the seeded brackets:
    // 21,000 + 33,000 + 75,000 + 95,000 + 336,000 + 96,000 = 656,000 a year,
    // 54,666.67 a month. Pension 8% and NHF 2.5% of basic.
    let statutory: Vec<(&str, Decimal)> = record
        .deductions
        .statutory
        .iter()
        .map(|line| (line.name.as_str(), line.amount))
        .collect();
    assert!(statutory.contains(&("PAYE", dec("54666.67"))));
    assert!(statutory.contains(&("Pension", dec("20000"))));
    assert!(statutory.contains(&("NHF", dec("6250"))));

    assert_eq!(record.totals.total_deductions, dec("80916.67"));
    assert_eq!(record.totals.net_pay, dec("219083.33"));
}

#[test]
fn test_bonus_enters_gross_and_annualization() {
    let world = create_world();
    let employee = hire(&world, "Tunde Alade");
    grant_bonus(
        &world,
        employee,
        "Spot Award",
        BonusType::Special,
        "60000",
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
    );

    let record = world.engine.calculate_payroll(&march(employee)).unwrap();

    assert_eq!(record.earnings.bonuses.len(), 1);
    assert_eq!(record.totals.gross_earnings, dec("360000"));

    // PAYE is computed on the bonus-inclusive gross annualized.
    let annual_tax =
        compute_progressive_tax(dec("4320000"), &StatutoryConfig::default().paye_brackets);
    let expected_paye = round_money(annual_tax / dec("12"));
    let paye = record
        .deductions
        .statutory
        .iter()
        .find(|line| line.name == "PAYE")
        .unwrap();
    assert_eq!(paye.amount, expected_paye);
}

// =============================================================================
// Frequency Proration
// =============================================================================

#[test]
fn test_quarterly_allowance_prorates_to_monthly() {
    let world = create_world();
    let employee = hire(&world, "Ngozi Eze");
    grant_allowance(
        &world,
        employee,
        "Training Fund",
        CalculationMethod::Fixed,
        "30000",
        AllowanceFrequency::Quarterly,
    );

    let record = world.engine.calculate_payroll(&march(employee)).unwrap();

    let line = record
        .earnings
        .allowances
        .iter()
        .find(|line| line.name == "Training Fund")
        .unwrap();
    assert_eq!(line.amount, dec("10000"));
}

#[test]
fn test_annual_allowance_on_weekly_payroll() {
    let world = create_world();
    let employee = hire(&world, "Bayo Okon");
    grant_allowance(
        &world,
        employee,
        "Leave Grant",
        CalculationMethod::Fixed,
        "120000",
        AllowanceFrequency::Annual,
    );

    let mut request = march(employee);
    request.frequency = PayFrequency::Weekly;
    let record = world.engine.calculate_payroll(&request).unwrap();

    // 120000 / 12 = 10000 monthly, / 4.33 = 2309.47 weekly.
    let line = record
        .earnings
        .allowances
        .iter()
        .find(|line| line.name == "Leave Grant")
        .unwrap();
    assert_eq!(line.amount, dec("2309.47"));
}

#[test]
fn test_one_time_allowance_pays_in_full() {
    let world = create_world();
    let employee = hire(&world, "Chika Ude");
    grant_allowance(
        &world,
        employee,
        "Relocation",
        CalculationMethod::Fixed,
        "75000",
        AllowanceFrequency::OneTime,
    );

    let mut request = march(employee);
    request.frequency = PayFrequency::Biweekly;
    let record = world.engine.calculate_payroll(&request).unwrap();

    let line = record
        .earnings
        .allowances
        .iter()
        .find(|line| line.name == "Relocation")
        .unwrap();
    assert_eq!(line.amount, dec("75000"));
}

// =============================================================================
// Idempotency and Consumption
// =============================================================================

#[test]
fn test_second_run_for_same_period_is_rejected() {
    let world = create_world();
    let employee = hire(&world, "Femi Ade");

    let first = world.engine.calculate_payroll(&march(employee)).unwrap();
    let second = world.engine.calculate_payroll(&march(employee));

    match second.unwrap_err() {
        EngineError::DuplicatePayroll { employee: id, month, year } => {
            assert_eq!(id, employee);
            assert_eq!(month, 3);
            assert_eq!(year, 2025);
        }
        other => panic!("Expected DuplicatePayroll, got {:?}", other),
    }

    // The first record is untouched.
    let stored = world.store.find_payroll(first.id).unwrap().unwrap();
    assert_eq!(stored, first);
    assert_eq!(world.store.payroll_count().unwrap(), 1);
}

#[test]
fn test_consumed_allowance_is_not_reincluded_in_later_period() {
    let world = create_world();
    let employee = hire(&world, "Halima Bello");
    let consumed = grant_allowance(
        &world,
        employee,
        "Wardrobe",
        CalculationMethod::Fixed,
        "25000",
        AllowanceFrequency::OneTime,
    );

    let first = world.engine.calculate_payroll(&march(employee)).unwrap();
    assert_eq!(first.earnings.allowances.len(), 1);

    // A fresh entry for April; the consumed one must not reappear.
    let fresh = grant_allowance(
        &world,
        employee,
        "Data Stipend",
        CalculationMethod::Fixed,
        "10000",
        AllowanceFrequency::Monthly,
    );

    let april = CalculationRequest::new(employee, 4, 2025, PayFrequency::Monthly);
    let second = world.engine.calculate_payroll(&april).unwrap();

    let sources: Vec<Option<Uuid>> = second
        .earnings
        .allowances
        .iter()
        .map(|line| line.source)
        .collect();
    assert_eq!(sources, vec![Some(fresh)]);

    // Both consumption markers point at their consuming records.
    let first_entry = world.store.personal_allowance(consumed).unwrap().unwrap();
    assert_eq!(
        first_entry.used_in_payroll.unwrap().payroll_id,
        Some(first.id)
    );
    let second_entry = world.store.personal_allowance(fresh).unwrap().unwrap();
    assert_eq!(
        second_entry.used_in_payroll.unwrap().payroll_id,
        Some(second.id)
    );
}

#[test]
fn test_bonus_consumed_exactly_once() {
    let world = create_world();
    let employee = hire(&world, "Sola Martins");
    let entry = grant_bonus(
        &world,
        employee,
        "Thirteenth Month",
        BonusType::ThirteenthMonth,
        "0",
        NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
    );

    let record = world.engine.calculate_payroll(&march(employee)).unwrap();
    assert_eq!(record.earnings.bonuses[0].amount, dec("250000"));

    let stored = world.store.personal_bonus(entry).unwrap().unwrap();
    assert_eq!(stored.used_in_payroll.unwrap().payroll_id, Some(record.id));
}

#[test]
fn test_concurrent_runs_for_same_employee_have_one_winner() {
    let world = create_world();
    let employee = hire(&world, "Emeka Obi");
    grant_allowance(
        &world,
        employee,
        "Wardrobe",
        CalculationMethod::Fixed,
        "25000",
        AllowanceFrequency::OneTime,
    );

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let engine = world.engine.clone();
            std::thread::spawn(move || engine.calculate_payroll(&march(employee)))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one concurrent run must win");

    for result in &results {
        if let Err(err) = result {
            assert!(
                matches!(
                    err,
                    EngineError::DuplicatePayroll { .. } | EngineError::BenefitAlreadyUsed { .. }
                ),
                "losing runs must fail with a period conflict, got {:?}",
                err
            );
        }
    }

    assert_eq!(world.store.payroll_count().unwrap(), 1);
}

// =============================================================================
// Batch Semantics
// =============================================================================

#[tokio::test]
async fn test_batch_with_one_unassigned_employee() {
    let world = create_world();
    let employees: Vec<Uuid> = (0..5)
        .map(|i| hire(&world, &format!("Employee {}", i)))
        .collect();

    // The third employee loses their department assignment.
    world.store.insert_employee(Employee {
        id: employees[2],
        name: "Employee 2".to_string(),
        department: None,
        salary_grade: Some(world.grade),
        is_active: true,
        onboarding_complete: true,
    });

    let config = BatchConfig::new(3, 2025, PayFrequency::Monthly);
    let summary = world.engine.run_batch(&employees, &config).await;

    assert_eq!(summary.counts.processed, 4);
    assert_eq!(summary.counts.skipped, 1);
    assert_eq!(summary.counts.failed, 0);
    assert!(
        summary
            .warnings
            .iter()
            .any(|w| w.employee == Some(employees[2]))
    );
    assert_eq!(world.store.payroll_count().unwrap(), 4);
}

#[tokio::test]
async fn test_batch_mixed_outcomes() {
    let world = create_world();
    let processed = hire(&world, "Processed");
    let unknown = Uuid::new_v4();

    let skipped = Employee {
        id: Uuid::new_v4(),
        name: "Not Onboarded".to_string(),
        department: Some(world.department),
        salary_grade: Some(world.grade),
        is_active: true,
        onboarding_complete: false,
    };
    world.store.insert_employee(skipped.clone());

    let config = BatchConfig::new(3, 2025, PayFrequency::Monthly);
    let summary = world
        .engine
        .run_batch(&[processed, skipped.id, unknown], &config)
        .await;

    assert_eq!(summary.counts.total_attempted, 3);
    assert_eq!(summary.counts.processed, 1);
    assert_eq!(summary.counts.skipped, 1);
    assert_eq!(summary.counts.failed, 1);

    let error = summary.errors.first().unwrap();
    assert_eq!(error.employee, Some(unknown));
    assert_eq!(error.code, "EMPLOYEE_NOT_FOUND");

    // Totals only cover the processed employee.
    assert_eq!(summary.totals.gross_pay, dec("300000"));
}

#[tokio::test]
async fn test_batch_never_throws_even_when_everything_fails() {
    let world = create_world();
    let ghosts: Vec<Uuid> = (0..10).map(|_| Uuid::new_v4()).collect();

    let config = BatchConfig::new(3, 2025, PayFrequency::Monthly);
    let summary = world.engine.run_batch(&ghosts, &config).await;

    assert_eq!(summary.counts.failed, 10);
    assert_eq!(summary.errors.len(), 10);
    assert_eq!(summary.outcomes.len(), 10);
}

#[tokio::test]
async fn test_batch_consumes_each_allowance_once_across_cohort() {
    let world = create_world();
    let employees: Vec<Uuid> = (0..6)
        .map(|i| hire(&world, &format!("Employee {}", i)))
        .collect();
    let entries: Vec<Uuid> = employees
        .iter()
        .map(|&employee| {
            grant_allowance(
                &world,
                employee,
                "Data Stipend",
                CalculationMethod::Fixed,
                "10000",
                AllowanceFrequency::Monthly,
            )
        })
        .collect();

    let config = BatchConfig::new(3, 2025, PayFrequency::Monthly);
    let summary = world.engine.run_batch(&employees, &config).await;
    assert_eq!(summary.counts.processed, 6);

    for entry in entries {
        let stored = world.store.personal_allowance(entry).unwrap().unwrap();
        let usage = stored.used_in_payroll.expect("entry must be consumed");
        assert_eq!(usage.month, 3);
        assert_eq!(usage.year, 2025);
    }
}

// =============================================================================
// Property Tests
// =============================================================================

fn paye_brackets() -> Vec<TaxBracket> {
    StatutoryConfig::default().paye_brackets
}

proptest! {
    #[test]
    fn prop_tax_is_monotonic_in_income(a in 0i64..20_000_000, b in 0i64..20_000_000) {
        let brackets = paye_brackets();
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let tax_low = compute_progressive_tax(Decimal::new(low, 0), &brackets);
        let tax_high = compute_progressive_tax(Decimal::new(high, 0), &brackets);
        prop_assert!(tax_low <= tax_high);
    }

    #[test]
    fn prop_tax_is_continuous_at_unit_steps(income in 0i64..20_000_000) {
        let brackets = paye_brackets();
        let tax = compute_progressive_tax(Decimal::new(income, 0), &brackets);
        let tax_next = compute_progressive_tax(Decimal::new(income + 1, 0), &brackets);
        let jump = tax_next - tax;
        // The marginal unit is taxed at most at the top rate.
        prop_assert!(jump >= Decimal::ZERO);
        prop_assert!(jump <= Decimal::new(24, 2));
    }

    #[test]
    fn prop_rounded_subtotals_reconcile(
        basic_cents in 5_000_000i64..100_000_000,
        housing_pct in 1i64..40,
        transport_cents in 0i64..5_000_000,
        stipend_cents in 0i64..10_000_000,
    ) {
        let store = Arc::new(
            MemoryStore::with_statutory(&StatutoryConfig::default()).unwrap(),
        );
        let department = Department { id: Uuid::new_v4(), name: "QA".to_string() };
        store.insert_department(department.clone());

        let grade = SalaryGrade {
            id: Uuid::new_v4(),
            level: "GL-P".to_string(),
            basic_salary: Decimal::new(basic_cents, 2),
            components: vec![
                SalaryComponent {
                    name: "Housing".to_string(),
                    method: CalculationMethod::Percentage,
                    value: Decimal::new(housing_pct, 0),
                    is_active: true,
                },
                SalaryComponent {
                    name: "Transport".to_string(),
                    method: CalculationMethod::Fixed,
                    value: Decimal::new(transport_cents, 2),
                    is_active: true,
                },
            ],
            department: None,
            is_active: true,
        };
        store.insert_grade(grade.clone()).unwrap();

        let employee = Employee {
            id: Uuid::new_v4(),
            name: "Prop Employee".to_string(),
            department: Some(department.id),
            salary_grade: Some(grade.id),
            is_active: true,
            onboarding_complete: true,
        };
        store.insert_employee(employee.clone());

        let definition = Allowance {
            id: Uuid::new_v4(),
            name: "Stipend".to_string(),
            method: CalculationMethod::Fixed,
            value: Decimal::new(stipend_cents, 2),
            frequency: AllowanceFrequency::Monthly,
            scope: BenefitScope::Individual(employee.id),
            effective_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            expiry_date: None,
            is_active: true,
        };
        store.insert_allowance_definition(definition.clone());
        store.insert_personal_allowance(PersonalAllowance {
            id: Uuid::new_v4(),
            employee: employee.id,
            allowance: definition.id,
            status: ApprovalStatus::Approved,
            used_in_payroll: None,
        });

        let engine = PayrollEngine::with_memory_store(store, StatutoryConfig::default());
        let record = engine
            .calculate_payroll(&CalculationRequest::new(
                employee.id,
                3,
                2025,
                PayFrequency::Monthly,
            ))
            .unwrap();

        // No penny drift: every sub-total equals the sum of its lines, and
        // the grand totals chain exactly.
        let component_sum: Decimal = record.components.iter().map(|l| l.amount).sum();
        let allowance_sum: Decimal =
            record.earnings.allowances.iter().map(|l| l.amount).sum();
        let bonus_sum: Decimal = record.earnings.bonuses.iter().map(|l| l.amount).sum();
        let statutory_sum: Decimal =
            record.deductions.statutory.iter().map(|l| l.amount).sum();
        let voluntary_sum: Decimal =
            record.deductions.voluntary.iter().map(|l| l.amount).sum();

        prop_assert_eq!(record.earnings.total_earnings, allowance_sum + bonus_sum);
        prop_assert_eq!(
            record.deductions.total_deductions,
            statutory_sum + voluntary_sum
        );
        prop_assert_eq!(
            record.totals.gross_earnings,
            record.basic_salary + component_sum + record.earnings.total_earnings
        );
        prop_assert_eq!(
            record.totals.net_pay,
            record.totals.gross_earnings - record.totals.total_deductions
        );
    }
}
