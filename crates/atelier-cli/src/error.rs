//! CLI error types

use thiserror::Error;

/// CLI error types
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Compile dispatch error
    #[error("Compile error: {0}")]
    Compile(#[from] atelier_compile::CompileError),

    /// Engine registry error
    #[error("Engine error: {0}")]
    Engine(#[from] atelier_engines::EngineError),

    /// Workbench post-processing error
    #[error("Workbench error: {0}")]
    Workbench(#[from] atelier_workbench::WorkbenchError),

    /// Project tree error
    #[error("Project error: {0}")]
    Project(#[from] atelier_project::ProjectError),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
