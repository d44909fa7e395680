//! Network-layer error types.

use df_core::{ElementId, SectionNumber};
use thiserror::Error;

/// Errors raised while describing connectors or indexing the host network.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// A connector has a shape the area formula cannot handle (oval) or a
    /// non-positive cross-section.
    #[error("Element {element} has unsupported connector geometry: {reason}")]
    UnsupportedGeometry {
        element: ElementId,
        reason: &'static str,
    },

    /// The system has no members on its critical path.
    #[error(
        "System '{system}' has an empty critical path (disconnected or unbalanced network?)"
    )]
    EmptyCriticalPath { system: String },

    /// No flow (or pressure) data exists in any probed section for an element.
    #[error("No section data found for element {element}")]
    MissingSectionData { element: ElementId },

    /// The critical path names a section the host cannot return.
    #[error("Critical path section {number} is not available from the host")]
    MissingSection { number: SectionNumber },

    #[error("Element {element} is not part of the system")]
    UnknownElement { element: ElementId },

    #[error("Element {element} is defined more than once")]
    DuplicateElement { element: ElementId },

    #[error("Section {number} is defined more than once")]
    DuplicateSection { number: SectionNumber },

    /// A connector references an element that doesn't exist.
    #[error("Connector of element {element} refers to non-existent element {target}")]
    InvalidConnection {
        element: ElementId,
        target: ElementId,
    },

    #[error("Section {number} lists non-existent element {element}")]
    InvalidSectionMember {
        number: SectionNumber,
        element: ElementId,
    },
}

pub type NetworkResult<T> = Result<T, NetworkError>;

impl NetworkError {
    /// The element the error is about, when there is one.
    pub fn element(&self) -> Option<ElementId> {
        match self {
            NetworkError::UnsupportedGeometry { element, .. }
            | NetworkError::MissingSectionData { element }
            | NetworkError::UnknownElement { element }
            | NetworkError::DuplicateElement { element }
            | NetworkError::InvalidConnection { element, .. }
            | NetworkError::InvalidSectionMember { element, .. } => Some(*element),
            NetworkError::EmptyCriticalPath { .. }
            | NetworkError::MissingSection { .. }
            | NetworkError::DuplicateSection { .. } => None,
        }
    }
}
