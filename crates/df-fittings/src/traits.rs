//! Seam between classification and coefficient models.

use crate::classification::FittingClassification;
use crate::error::FittingResult;

/// A model that turns a classified fitting into a dimensionless local
/// resistance coefficient ξ, referred to the velocity of the fitting's
/// reference connector.
///
/// Models are pure functions of the classification, so one instance serves a
/// whole run.
pub trait ResistanceModel: Send + Sync {
    /// Model name for logging.
    fn name(&self) -> &str;

    /// Local resistance coefficient of one fitting.
    fn coefficient(&self, fitting: &FittingClassification) -> FittingResult<f64>;
}
