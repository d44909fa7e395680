//! df-core: stable foundation for ductflow.
//!
//! Contains:
//! - units (uom SI types, host internal unit conversion)
//! - numeric (Real + tolerances + rounding helpers)
//! - ids (host element identifiers)
//! - geometry (points/vectors and angle measurement)
//! - settings (calculation configuration)
//! - error (shared error types)

pub mod error;
pub mod geometry;
pub mod ids;
pub mod numeric;
pub mod settings;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{DfError, DfResult};
pub use geometry::{Point, Vector};
pub use ids::*;
pub use numeric::*;
pub use settings::CalcSettings;
pub use units::*;
