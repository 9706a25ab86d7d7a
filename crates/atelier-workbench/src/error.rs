use thiserror::Error;

use atelier_engines::EngineError;

/// Errors surfaced by workbench post-processing.
#[derive(Debug, Error)]
pub enum WorkbenchError {
    /// The path names no file in the project tree.
    #[error("no source file at {0}")]
    MissingSource(String),

    /// The operation needs a binary module artifact.
    #[error("{path} does not hold binary module content")]
    NotBinary { path: String },

    /// The operation needs text content.
    #[error("{path} does not hold text content")]
    NotText { path: String },

    #[error(transparent)]
    Engine(#[from] EngineError),
}

pub type WorkbenchResult<T> = Result<T, WorkbenchError>;
