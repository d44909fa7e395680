//! Common helpers for classification and coefficient calculations.

use df_core::numeric::ensure_finite;
use df_core::ElementId;

use crate::error::{FittingError, FittingResult};

/// Deflections below this are treated as a straight passage, degrees.
pub const STRAIGHT_DEFLECTION_DEG: f64 = 5.0;

/// Relative junction mass imbalance tolerated without a warning.
pub const MASS_BALANCE_TOLERANCE: f64 = 0.05;

/// Ensure a value is finite, returning a `NonPhysical` error if not.
pub fn check_finite(value: f64, element: ElementId, what: &'static str) -> FittingResult<f64> {
    ensure_finite(value, what).map_err(|_| FittingError::NonPhysical { element, what })
}

/// Angle bucket used in display names: 30, 45, 60 or 90 degrees.
pub fn angle_bucket(angle_deg: f64) -> u32 {
    if angle_deg <= 30.0 {
        30
    } else if angle_deg <= 45.0 {
        45
    } else if angle_deg <= 60.0 {
        60
    } else {
        90
    }
}
