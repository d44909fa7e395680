//! Error types for the df-app service layer.

use std::path::PathBuf;

use df_core::ElementId;

/// Application error type that wraps errors from the backend crates and
/// gives front ends one error surface.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Project error: {0}")]
    Project(String),

    #[error("Project validation failed: {0}")]
    Validation(String),

    #[error("System not found: {0}")]
    SystemNotFound(String),

    #[error("Calculation of system {system} failed: {message}")]
    Calculation {
        system: String,
        element: Option<ElementId>,
        message: String,
    },

    #[error("Failed to write parameter of element {element}: {message}")]
    WriteBack { element: ElementId, message: String },

    #[error("Failed to write {path}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for df-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<df_project::ProjectError> for AppError {
    fn from(err: df_project::ProjectError) -> Self {
        match err {
            df_project::ProjectError::Validation(e) => AppError::Validation(e.to_string()),
            other => AppError::Project(other.to_string()),
        }
    }
}

impl AppError {
    /// The element to point the user at, when there is one.
    pub fn element(&self) -> Option<ElementId> {
        match self {
            AppError::Calculation { element, .. } => *element,
            AppError::WriteBack { element, .. } => Some(*element),
            _ => None,
        }
    }
}
