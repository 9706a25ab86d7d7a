//! Built-in `module-text` engine: disassembly and assembly of module
//! binaries via the wasm-tools text format crates.

use async_trait::async_trait;
use std::sync::Arc;

use crate::contract::{EngineHandle, EngineProvider, ModuleCodec};
use crate::error::{EngineError, EngineResult};
use crate::id::CapabilityId;

/// Text-format toolkit backing the `module-text` capability.
///
/// Disassembly produces the flat (non-folded) text form; when the module
/// carries a name section the printer resolves indices to the embedded
/// symbolic identifiers. Assembly keeps any symbolic names the text carried
/// in the emitted binary's name section.
pub struct WatToolkit;

impl WatToolkit {
    pub const LABEL: &'static str = "wat toolkit";
}

impl ModuleCodec for WatToolkit {
    fn disassemble(&self, module: &[u8]) -> EngineResult<String> {
        wasmprinter::print_bytes(module).map_err(|err| EngineError::InvalidModule(err.to_string()))
    }

    fn assemble(&self, text: &str) -> EngineResult<Vec<u8>> {
        let module = wat::parse_str(text).map_err(|err| EngineError::Assembly(err.to_string()))?;
        // The text parser only encodes; structural problems surface here.
        wasmparser::validate(&module).map_err(|err| EngineError::Assembly(err.to_string()))?;
        Ok(module)
    }
}

#[async_trait]
impl EngineProvider for WatToolkit {
    fn capability(&self) -> CapabilityId {
        CapabilityId::ModuleText
    }

    fn label(&self) -> &str {
        Self::LABEL
    }

    async fn activate(&self) -> EngineResult<EngineHandle> {
        Ok(EngineHandle::Codec(Arc::new(WatToolkit)))
    }
}
