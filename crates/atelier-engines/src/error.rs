use thiserror::Error;

use crate::id::CapabilityId;

/// Errors surfaced by the engine registry and the engines themselves.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An identifier string that names no known capability.
    #[error("unknown capability: {0}")]
    UnknownCapability(String),

    /// A known capability with no provider registered for it.
    #[error("no provider registered for capability {0}")]
    Unregistered(CapabilityId),

    /// Activation of an engine failed; the capability stays unloaded and a
    /// later request will retry.
    #[error("failed to load {label} engine: {reason}")]
    Load { label: String, reason: String },

    /// A module binary the engine could not make sense of.
    #[error("invalid module: {0}")]
    InvalidModule(String),

    /// Text that did not parse or validate as a module.
    #[error("assembly failed: {0}")]
    Assembly(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
