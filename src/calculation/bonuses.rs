//! Bonus aggregation.
//!
//! Resolves the employee's approved personal bonuses payable within the
//! period. Read-only; consumption is handled by the orchestrator.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{Bonus, BonusType, PayLine, PayPeriod};
use crate::store::BonusStore;

use super::rounding::{round_money, rounded_sum};

/// The bonuses payable to one employee for one period.
///
/// Lines carry the personal entry id in their `source` field; the
/// orchestrator claims exactly those entries during consumption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusResolution {
    /// Bonus lines payable this period.
    pub items: Vec<PayLine>,
    /// Sum of the lines, rounded.
    pub total: Decimal,
}

/// Resolves the amount a bonus definition pays.
///
/// Performance bonuses pay `base_amount * score / target` when the target
/// is met and nothing otherwise; thirteenth-month bonuses pay one month's
/// basic salary; every other kind pays the stored amount.
fn bonus_payout(definition: &Bonus, basic_salary: Decimal) -> EngineResult<Decimal> {
    let amount = match definition.bonus_type {
        BonusType::Performance => {
            let params = definition
                .performance
                .as_ref()
                .ok_or_else(|| EngineError::CalculationError {
                    message: format!(
                        "performance bonus '{}' has no performance parameters",
                        definition.name
                    ),
                })?;
            if params.target_score <= Decimal::ZERO {
                return Err(EngineError::CalculationError {
                    message: format!(
                        "performance bonus '{}' has non-positive target score",
                        definition.name
                    ),
                });
            }
            if params.performance_score >= params.target_score {
                params.base_amount * params.performance_score / params.target_score
            } else {
                Decimal::ZERO
            }
        }
        BonusType::ThirteenthMonth => basic_salary,
        _ => definition.amount,
    };
    Ok(round_money(amount))
}

/// Resolves all bonuses payable to an employee within the period.
pub fn resolve_bonuses(
    employee: Uuid,
    period: &PayPeriod,
    basic_salary: Decimal,
    store: &dyn BonusStore,
) -> EngineResult<BonusResolution> {
    let mut items = Vec::new();

    for entry in store.personal_bonuses_for(employee)? {
        if !entry.is_payable_in(period) {
            continue;
        }

        let definition = store
            .find_bonus(entry.bonus)?
            .ok_or_else(|| EngineError::Store {
                message: format!(
                    "personal bonus {} references missing definition {}",
                    entry.id, entry.bonus
                ),
            })?;

        items.push(PayLine {
            name: definition.name.clone(),
            amount: bonus_payout(&definition, basic_salary)?,
            source: Some(entry.id),
        });
    }

    let total = rounded_sum(items.iter().map(|line| line.amount));
    Ok(BonusResolution { items, total })
}
