//! df-report: path report assembly.
//!
//! Walks the critical path of one system in flow order and produces one row
//! per observable element (length, size, flow, velocity, coefficient,
//! pressure drop, running total), then groups and collapses duct runs for
//! presentation.

pub mod assemble;
pub mod format;
pub mod group;
pub mod types;

pub use assemble::assemble;
pub use format::render_table;
pub use group::group_rows;
pub use types::*;

use df_fittings::FittingError;
use df_network::NetworkError;

pub type ReportResult<T> = Result<T, ReportError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ReportError {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Fitting(#[from] FittingError),
}

impl ReportError {
    /// The element the failure is about, for pointing the user at it.
    pub fn element(&self) -> Option<df_core::ElementId> {
        match self {
            ReportError::Network(e) => e.element(),
            ReportError::Fitting(e) => e.element(),
        }
    }
}
