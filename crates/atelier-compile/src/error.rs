use thiserror::Error;

use crate::language::{Language, ServiceProtocol};

/// Errors surfaced by compile dispatch, in the order a request can hit them.
#[derive(Debug, Error)]
pub enum CompileError {
    /// A language string that names no known language.
    #[error("unknown language: {0}")]
    UnknownLanguage(String),

    /// The only supported compile target is the binary module format; raised
    /// before any service resolution or I/O.
    #[error("unsupported compile target: {0}")]
    UnsupportedTarget(Language),

    /// The service table has no entry for the language pair.
    // A field named `source` would become the thiserror error chain.
    #[error("no compile service for {source_language} -> {target_language}")]
    NoService {
        source_language: Language,
        target_language: Language,
    },

    /// The resolved endpoint speaks the wrong protocol for the operation.
    #[error("service {url} speaks the {actual} protocol, expected {expected}")]
    Protocol {
        url: String,
        expected: ServiceProtocol,
        actual: ServiceProtocol,
    },

    /// The backend reported failure; the message is the backend's console
    /// text, verbatim and in full.
    #[error("{0}")]
    Compilation(String),

    /// Non-2xx response from the service.
    #[error("compile service returned {status}: {message}")]
    Service { status: u16, message: String },

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed service response: {0}")]
    Response(#[from] serde_json::Error),

    /// An output item whose declared encoding did not decode.
    #[error("failed to decode output {name}: {reason}")]
    Payload { name: String, reason: String },
}

pub type CompileResult<T> = Result<T, CompileError>;
