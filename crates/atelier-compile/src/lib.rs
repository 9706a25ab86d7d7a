//! Remote compilation for the Atelier workbench.
//!
//! A [`CompileDispatcher`] turns a set of named source files plus an options
//! string into a request envelope, submits it to the backend resolved for
//! the `(source, target)` language pair, and returns the named outputs the
//! backend produced. [`resolve_bindings`] then picks the conventionally
//! named primary binary and companion glue script out of that mapping. The
//! HTTP layer sits behind [`ServiceTransport`] so tests can script it.

mod bindings;
mod dispatcher;
mod error;
mod language;
mod transport;
mod wire;

pub use bindings::{
    resolve_bindings, Artifact, ArtifactRole, ResolvedBindings, COMPANION_SCRIPT, PRIMARY_BINARY,
};
pub use dispatcher::{CompileDispatcher, CompileRequest};
pub use error::{CompileError, CompileResult};
pub use language::{Language, ServiceEndpoint, ServiceMap, ServiceProtocol, DEFAULT_SERVICE_BASE};
pub use transport::{RemoteTransport, ServiceTransport};
pub use wire::{CompileOutputs, OutputPayload};
