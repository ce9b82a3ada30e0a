//! The payroll engine: per-employee orchestration and batch processing.

mod batch;
mod orchestrator;

pub use orchestrator::{CalculationRequest, PayrollEngine};
