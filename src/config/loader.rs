//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the statutory
//! configuration from a YAML file and validating it before it reaches any
//! calculation.

use rust_decimal::Decimal;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::{TaxBracket, validate_brackets};

use super::types::StatutoryConfig;

/// Loads and provides access to the statutory configuration.
///
/// # File format
///
/// The loader reads a single `statutory.yaml`:
/// ```text
/// pension_rate: "8"
/// nhf_rate: "2.5"
/// paye_brackets:
///   - min: "0"
///     max: "300000"
///     rate: "7"
///   ...
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config")?;
/// println!("Pension rate: {}%", loader.pension_rate());
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: StatutoryConfig,
}

impl ConfigLoader {
    /// Loads `statutory.yaml` from the specified directory.
    ///
    /// Returns an error if the file is missing (`ConfigNotFound`), contains
    /// invalid YAML (`ConfigParseError`), or fails validation
    /// (`InvalidTaxBrackets`).
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let statutory_path = path.as_ref().join("statutory.yaml");
        let config = Self::load_yaml::<StatutoryConfig>(&statutory_path)?;
        Self::from_config(config)
    }

    /// Wraps an already-built configuration, validating it first.
    pub fn from_config(config: StatutoryConfig) -> EngineResult<Self> {
        validate_brackets(&config.paye_brackets)?;
        Self::validate_rate("pension_rate", config.pension_rate)?;
        Self::validate_rate("nhf_rate", config.nhf_rate)?;
        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn validate_rate(name: &str, rate: Decimal) -> EngineResult<()> {
        if rate < Decimal::ZERO || rate > Decimal::from(100) {
            return Err(EngineError::ConfigParseError {
                path: "statutory.yaml".to_string(),
                message: format!("{} {} outside [0, 100]", name, rate),
            });
        }
        Ok(())
    }

    /// Returns the underlying statutory configuration.
    pub fn config(&self) -> &StatutoryConfig {
        &self.config
    }

    /// Returns the annual PAYE bracket table.
    pub fn paye_brackets(&self) -> &[TaxBracket] {
        &self.config.paye_brackets
    }

    /// Returns the pension rate as a percentage of basic salary.
    pub fn pension_rate(&self) -> Decimal {
        self.config.pension_rate
    }

    /// Returns the NHF rate as a percentage of basic salary.
    pub fn nhf_rate(&self) -> Decimal {
        self.config.nhf_rate
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        // The seeded table always validates.
        Self {
            config: StatutoryConfig::default(),
        }
    }
}
