//! Configuration types for payroll processing.
//!
//! Statutory rates and the PAYE bracket table are system configuration,
//! seeded at startup and deliberately outside the generic deduction update
//! path. Batch behavior is configured per invocation through
//! [`BatchConfig`] so that runs are reproducible without ambient state.

use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::{PayFrequency, TaxBracket};

/// Default bound on concurrent per-employee orchestrations in a batch.
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Statutory deduction configuration: the PAYE bracket table plus the fixed
/// pension and housing-fund rates.
#[derive(Debug, Clone, Deserialize)]
pub struct StatutoryConfig {
    /// Annual progressive PAYE brackets, ascending and non-overlapping.
    pub paye_brackets: Vec<TaxBracket>,
    /// Pension contribution as a percentage of basic salary.
    pub pension_rate: Decimal,
    /// National Housing Fund contribution as a percentage of basic salary.
    pub nhf_rate: Decimal,
}

impl Default for StatutoryConfig {
    /// The seeded statutory table: the standard six-band annual PAYE
    /// schedule, pension at 8% and NHF at 2.5% of basic salary.
    fn default() -> Self {
        let bracket = |min: i64, max: Option<i64>, rate_hundredths: i64| TaxBracket {
            min: Decimal::new(min, 0),
            max: max.map(|m| Decimal::new(m, 0)),
            rate: Decimal::new(rate_hundredths, 2),
        };

        Self {
            paye_brackets: vec![
                bracket(0, Some(300_000), 700),
                bracket(300_000, Some(600_000), 1_100),
                bracket(600_000, Some(1_100_000), 1_500),
                bracket(1_100_000, Some(1_600_000), 1_900),
                bracket(1_600_000, Some(3_200_000), 2_100),
                bracket(3_200_000, None, 2_400),
            ],
            pension_rate: Decimal::new(8, 0),
            nhf_rate: Decimal::new(25, 1),
        }
    }
}

/// Per-invocation configuration for a batch payroll run.
///
/// Passed explicitly into the batch runner rather than read from ambient
/// settings, so two runs with the same config and data produce the same
/// summary.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// The period month (1-12).
    pub month: u32,
    /// The period year.
    pub year: i32,
    /// The payroll frequency for the run.
    pub frequency: PayFrequency,
    /// Who requested the run, recorded on each created record.
    pub created_by: Option<Uuid>,
    /// Skip the onboarding-completeness precondition.
    pub bypass_onboarding_check: bool,
    /// Bound on concurrent per-employee orchestrations.
    pub max_concurrency: usize,
}

impl BatchConfig {
    /// Creates a batch config for a period with default knobs: onboarding
    /// enforced, concurrency at [`DEFAULT_MAX_CONCURRENCY`].
    pub fn new(month: u32, year: i32, frequency: PayFrequency) -> Self {
        Self {
            month,
            year,
            frequency,
            created_by: None,
            bypass_onboarding_check: false,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::validate_brackets;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_default_brackets_are_valid() {
        let config = StatutoryConfig::default();
        assert!(validate_brackets(&config.paye_brackets).is_ok());
        assert_eq!(config.paye_brackets.len(), 6);
    }

    #[test]
    fn test_default_rates() {
        let config = StatutoryConfig::default();
        assert_eq!(config.pension_rate, dec("8"));
        assert_eq!(config.nhf_rate, dec("2.5"));
    }

    #[test]
    fn test_default_top_bracket_is_unbounded() {
        let config = StatutoryConfig::default();
        let top = config.paye_brackets.last().unwrap();
        assert_eq!(top.min, dec("3200000"));
        assert!(top.max.is_none());
        assert_eq!(top.rate, dec("24"));
    }

    #[test]
    fn test_batch_config_defaults() {
        let config = BatchConfig::new(3, 2025, PayFrequency::Monthly);
        assert_eq!(config.month, 3);
        assert_eq!(config.year, 2025);
        assert!(!config.bypass_onboarding_check);
        assert!(config.created_by.is_none());
        assert_eq!(config.max_concurrency, DEFAULT_MAX_CONCURRENCY);
    }

    #[test]
    fn test_statutory_config_deserializes_from_yaml() {
        let yaml = r#"
pension_rate: "8"
nhf_rate: "2.5"
paye_brackets:
  - min: "0"
    max: "300000"
    rate: "7"
  - min: "300000"
    max: ~
    rate: "11"
"#;
        let config: StatutoryConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.paye_brackets.len(), 2);
        assert_eq!(config.pension_rate, dec("8"));
        assert!(config.paye_brackets[1].max.is_none());
    }
}
