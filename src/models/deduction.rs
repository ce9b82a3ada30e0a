//! Deduction definitions and progressive tax brackets.
//!
//! Statutory deductions (PAYE, Pension, NHF) are system-seeded and
//! protected: their kind never changes, their rates are not editable through
//! the generic update path, and they cannot be deactivated or deleted. Only
//! PAYE's tax brackets remain editable.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

use super::scope::BenefitScope;

/// Whether a deduction is mandatory or opt-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionKind {
    /// Mandatory, system-seeded (tax, pension, housing fund).
    Statutory,
    /// Opt-in (loan repayment, union dues, insurance).
    Voluntary,
}

/// How a deduction's amount is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeductionMethod {
    /// The value is the amount.
    Fixed,
    /// The value is a percentage of the computation base.
    Percentage,
    /// Progressive tax over the deduction's own brackets.
    Progressive,
}

/// Identifies which system-seeded statutory deduction a definition is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatutoryCode {
    /// Pay-As-You-Earn income tax, computed over progressive brackets.
    Paye,
    /// Pension contribution, a percentage of basic salary.
    Pension,
    /// National Housing Fund contribution, a percentage of basic salary.
    Nhf,
}

/// One band of a progressive tax table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// The band's lower bound (inclusive).
    pub min: Decimal,
    /// The band's upper bound (exclusive); `None` for the unbounded top band.
    pub max: Option<Decimal>,
    /// The band's rate as a percentage in [0, 100].
    pub rate: Decimal,
}

impl TaxBracket {
    /// The width of the band, or `None` for the unbounded top band.
    pub fn span(&self) -> Option<Decimal> {
        self.max.map(|max| max - self.min)
    }
}

/// Validates a progressive tax table at the point of creation.
///
/// The calculator assumes, and does not re-validate, ordering; this function
/// is the single enforcement point. Brackets must be non-empty, start at a
/// non-negative minimum, ascend without overlapping or leaving gaps, carry
/// rates in [0, 100], and have at most one unbounded band, which must be
/// last.
pub fn validate_brackets(brackets: &[TaxBracket]) -> EngineResult<()> {
    if brackets.is_empty() {
        return Err(EngineError::InvalidTaxBrackets {
            message: "bracket table is empty".to_string(),
        });
    }

    if brackets[0].min < Decimal::ZERO {
        return Err(EngineError::InvalidTaxBrackets {
            message: format!("first bracket starts below zero: {}", brackets[0].min),
        });
    }

    for (index, bracket) in brackets.iter().enumerate() {
        if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::from(100) {
            return Err(EngineError::InvalidTaxBrackets {
                message: format!("bracket {} has rate {} outside [0, 100]", index, bracket.rate),
            });
        }

        match bracket.max {
            Some(max) if max <= bracket.min => {
                return Err(EngineError::InvalidTaxBrackets {
                    message: format!("bracket {} has max {} <= min {}", index, max, bracket.min),
                });
            }
            None if index != brackets.len() - 1 => {
                return Err(EngineError::InvalidTaxBrackets {
                    message: format!("unbounded bracket {} is not the last bracket", index),
                });
            }
            _ => {}
        }

        if index > 0 {
            // The previous bracket is bounded (checked above), so unwrap of
            // its max cannot fail here.
            let previous_max = brackets[index - 1].max.unwrap_or_default();
            if bracket.min != previous_max {
                return Err(EngineError::InvalidTaxBrackets {
                    message: format!(
                        "bracket {} starts at {} but the previous bracket ends at {}",
                        index, bracket.min, previous_max
                    ),
                });
            }
        }
    }

    Ok(())
}

/// A statutory or voluntary deduction definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deduction {
    /// Unique identifier for the definition.
    pub id: Uuid,
    /// The deduction's name (e.g. "PAYE", "Union Dues").
    pub name: String,
    /// Mandatory or opt-in.
    pub kind: DeductionKind,
    /// How the amount is computed.
    pub method: DeductionMethod,
    /// The fixed amount or percentage, depending on `method`.
    pub value: Decimal,
    /// Progressive bands, used when `method` is `Progressive`.
    pub tax_brackets: Vec<TaxBracket>,
    /// Who the deduction applies to.
    pub scope: BenefitScope,
    /// Which statutory deduction this is, for system-seeded definitions.
    pub statutory_code: Option<StatutoryCode>,
    /// Whether the definition is currently in force.
    pub is_active: bool,
}

impl Deduction {
    /// Returns true for system-seeded statutory deductions.
    pub fn is_statutory(&self) -> bool {
        self.kind == DeductionKind::Statutory
    }
}
