//! Deduction resolution.
//!
//! Resolves the statutory deductions (PAYE, Pension, NHF) and the voluntary
//! deductions whose scope matches the employee. Pure read + compute: no
//! side effects.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::StatutoryConfig;
use crate::error::EngineResult;
use crate::models::{PayLine, ScopeFilter, StatutoryCode};
use crate::store::DeductionStore;

use super::methods::{deduction_amount, percentage_of};
use super::rounding::rounded_sum;
use super::tax::monthly_paye;

/// The deductions applicable to one employee for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionResolution {
    /// Statutory deduction lines.
    pub statutory: Vec<PayLine>,
    /// Voluntary deduction lines.
    pub voluntary: Vec<PayLine>,
    /// Sum of statutory lines, rounded.
    pub statutory_total: Decimal,
    /// Sum of voluntary lines, rounded.
    pub voluntary_total: Decimal,
    /// Sum of all lines, rounded.
    pub total: Decimal,
}

/// Resolves all deductions for an employee.
///
/// Statutory amounts come from the store's seeded definitions: PAYE as
/// monthly progressive tax over annualized gross, pension and NHF as
/// percentages of basic salary. When the store carries no statutory
/// definitions the configured rates apply directly, so a misconfigured
/// deployment can never produce a payroll without statutory deductions.
/// Voluntary amounts come from active definitions whose scope matches the
/// employee, valued by their calculation method against gross salary.
pub fn resolve_deductions(
    basic_salary: Decimal,
    gross_salary: Decimal,
    filter: &ScopeFilter,
    config: &StatutoryConfig,
    store: &dyn DeductionStore,
) -> EngineResult<DeductionResolution> {
    let mut statutory = Vec::new();

    let seeded = store.statutory_deductions()?;
    if seeded.is_empty() {
        statutory.push(PayLine {
            name: "PAYE".to_string(),
            amount: monthly_paye(gross_salary, &config.paye_brackets),
            source: None,
        });
        statutory.push(PayLine {
            name: "Pension".to_string(),
            amount: percentage_of(basic_salary, config.pension_rate),
            source: None,
        });
        statutory.push(PayLine {
            name: "NHF".to_string(),
            amount: percentage_of(basic_salary, config.nhf_rate),
            source: None,
        });
    } else {
        for definition in &seeded {
            let amount = match definition.statutory_code {
                Some(StatutoryCode::Paye) => monthly_paye(gross_salary, &definition.tax_brackets),
                Some(StatutoryCode::Pension) | Some(StatutoryCode::Nhf) => {
                    percentage_of(basic_salary, definition.value)
                }
                None => deduction_amount(
                    definition.method,
                    definition.value,
                    gross_salary,
                    &definition.tax_brackets,
                ),
            };
            statutory.push(PayLine {
                name: definition.name.clone(),
                amount,
                source: Some(definition.id),
            });
        }
    }

    let mut voluntary = Vec::new();
    for definition in store.active_voluntary_matching(filter)? {
        voluntary.push(PayLine {
            name: definition.name.clone(),
            amount: deduction_amount(
                definition.method,
                definition.value,
                gross_salary,
                &definition.tax_brackets,
            ),
            source: Some(definition.id),
        });
    }

    let statutory_total = rounded_sum(statutory.iter().map(|line| line.amount));
    let voluntary_total = rounded_sum(voluntary.iter().map(|line| line.amount));
    let total = rounded_sum([statutory_total, voluntary_total]);

    Ok(DeductionResolution {
        statutory,
        voluntary,
        statutory_total,
        voluntary_total,
        total,
    })
}
