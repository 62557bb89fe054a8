//! Error types for Keel.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KeelError {
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Objective {objective_id} not found in project {project_id}")]
    ObjectiveNotFound {
        project_id: String,
        objective_id: String,
    },

    #[error("No project is focused")]
    NoFocusedProject,

    #[error("Failed to load {}: {reason}", path.display())]
    Load { path: PathBuf, reason: String },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl KeelError {
    /// Whether the error means a referenced project or objective does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            KeelError::ProjectNotFound(_)
                | KeelError::ObjectiveNotFound { .. }
                | KeelError::NoFocusedProject
        )
    }
}
