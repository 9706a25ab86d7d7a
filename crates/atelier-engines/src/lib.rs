//! Engine capabilities for the Atelier workbench.
//!
//! Heavyweight transforms (module disassembly/assembly, optimization,
//! markdown rendering) live behind named capabilities. An [`EngineRegistry`]
//! activates the engine for a capability on first use and shares the single
//! activated instance process-wide; concurrent first uses await the same
//! activation. Providers are statically linked and selected by
//! [`CapabilityId`].

mod contract;
mod error;
mod id;
mod lean;
mod markdown;
mod registry;
mod text;

pub use contract::{EngineHandle, EngineProvider, MarkdownRenderer, ModuleCodec, ModuleOptimizer};
pub use error::{EngineError, EngineResult};
pub use id::CapabilityId;
pub use lean::LeanOptimizer;
pub use markdown::CommonMarkRenderer;
pub use registry::{CapabilityStatus, EngineRegistry};
pub use text::WatToolkit;
