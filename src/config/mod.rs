//! Configuration handling for the Payroll Calculation Engine.
//!
//! This module provides loading of the statutory configuration from YAML
//! files and the per-invocation batch configuration.

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{BatchConfig, DEFAULT_MAX_CONCURRENCY, StatutoryConfig};
