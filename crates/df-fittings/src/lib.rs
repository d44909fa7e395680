//! df-fittings: fitting classification and local resistance coefficients.
//!
//! Classification turns a host element plus its connectors and the topology
//! index into a [`FittingClassification`]: elbow, transition, tee, cross or
//! tap, with its orientation (input, output, branch, pass) resolved. A
//! [`ResistanceModel`] then maps the classification to a coefficient ξ.

pub mod classification;
pub mod classify;
pub mod common;
pub mod engine;
pub mod error;
pub mod resolve;
pub mod tables;
pub mod traits;

pub use classification::{
    Elbow, FittingClassification, FlowRatios, Junction, JunctionFamily, PathLeg, Tap, Transition,
};
pub use classify::Classifier;
pub use engine::CoefficientEngine;
pub use error::{FittingError, FittingResult};
pub use resolve::{duct_flow_ends, fitting_flow_ends, FlowEnds};
pub use traits::ResistanceModel;
