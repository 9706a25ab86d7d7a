//! Operation contracts engines implement, and the provider seam the
//! registry activates them through.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use crate::error::EngineResult;
use crate::id::CapabilityId;

/// Disassembles module binaries to text and assembles text back to binary.
pub trait ModuleCodec: Send + Sync {
    /// Binary module to flat text, resolving embedded debug names to
    /// symbolic identifiers when present.
    fn disassemble(&self, module: &[u8]) -> EngineResult<String>;

    /// Text to a validated binary module.
    fn assemble(&self, text: &str) -> EngineResult<Vec<u8>>;
}

/// Optimizes, converts, and validates module binaries.
pub trait ModuleOptimizer: Send + Sync {
    /// Strips non-semantic content; output is never larger than the input.
    fn optimize(&self, module: &[u8]) -> EngineResult<Vec<u8>>;

    /// Binary module to a self-contained scripted form that embeds the
    /// module and re-exports its surface.
    fn to_script(&self, module: &[u8]) -> EngineResult<String>;

    /// Structural validation; the diagnostic names what failed.
    fn validate(&self, module: &[u8]) -> EngineResult<()>;
}

/// Renders markdown to HTML.
pub trait MarkdownRenderer: Send + Sync {
    fn render(&self, markdown: &str) -> String;
}

/// A ready engine instance, shared behind an `Arc`.
#[derive(Clone)]
pub enum EngineHandle {
    Codec(Arc<dyn ModuleCodec>),
    Optimizer(Arc<dyn ModuleOptimizer>),
    Renderer(Arc<dyn MarkdownRenderer>),
}

impl EngineHandle {
    pub fn kind(&self) -> &'static str {
        match self {
            EngineHandle::Codec(_) => "codec",
            EngineHandle::Optimizer(_) => "optimizer",
            EngineHandle::Renderer(_) => "renderer",
        }
    }
}

impl fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EngineHandle").field(&self.kind()).finish()
    }
}

/// Activates the engine backing one capability.
///
/// Activation runs at most once per registry; the returned handle is shared
/// by every subsequent request for the capability.
#[async_trait]
pub trait EngineProvider: Send + Sync {
    fn capability(&self) -> CapabilityId;

    /// Short human-readable engine name, used in logs and provenance
    /// descriptions.
    fn label(&self) -> &str;

    async fn activate(&self) -> EngineResult<EngineHandle>;
}
