//! Project error types

use thiserror::Error;

/// Errors surfaced while deserializing or populating a project tree.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// The JSON tree description could not be parsed.
    #[error("invalid project tree: {0}")]
    Parse(#[from] serde_json::Error),

    /// Template content could not be fetched from the configured source.
    #[error("failed to fetch template {name}: {reason}")]
    Fetch {
        /// Node name the fetch was constructed from.
        name: String,
        /// Underlying source diagnostic.
        reason: String,
    },
}

/// Result type for project operations.
pub type ProjectResult<T> = Result<T, ProjectError>;
