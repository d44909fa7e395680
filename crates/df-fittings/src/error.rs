//! Error types for fitting classification and coefficient computation.

use df_core::ElementId;
use df_network::NetworkError;
use thiserror::Error;

/// Errors that can occur while classifying a fitting or computing its
/// coefficient. All of them abort the report of the current system.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FittingError {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("Cannot determine flow input/output of element {element}")]
    UnresolvedFlowDirection { element: ElementId },

    #[error("Element {element} matches no fitting type: {what}")]
    UnknownFittingType { element: ElementId, what: String },

    #[error("Non-physical value at element {element}: {what}")]
    NonPhysical {
        element: ElementId,
        what: &'static str,
    },
}

pub type FittingResult<T> = Result<T, FittingError>;

impl FittingError {
    /// The element the error is about, when there is one.
    pub fn element(&self) -> Option<ElementId> {
        match self {
            FittingError::Network(e) => e.element(),
            FittingError::UnresolvedFlowDirection { element }
            | FittingError::UnknownFittingType { element, .. }
            | FittingError::NonPhysical { element, .. } => Some(*element),
        }
    }
}
