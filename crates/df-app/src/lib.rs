//! Shared application service layer for ductflow.
//!
//! One interface for front ends: project loading and validation, running the
//! critical path calculation of a system, and writing the resulting
//! coefficients back transactionally.

pub mod error;
pub mod project_service;
pub mod run_service;
pub mod writeback;

// Re-export key types for convenience
pub use error::{AppError, AppResult};
pub use project_service::{
    get_system, list_systems, load_project, validate_project, SystemSummary,
};
pub use run_service::{run_from_file, run_system, RunRequest, RunResponse, SettingsOverride};
pub use writeback::{
    write_coefficients, JsonFileSink, MemorySink, ParameterSink, COEFFICIENT_PARAMETER,
};
