//! Built-in `module-opt` engine: optimization, script conversion, and
//! structural validation of module binaries.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::collections::HashSet;
use std::sync::Arc;

use crate::contract::{EngineHandle, EngineProvider, ModuleOptimizer};
use crate::error::{EngineError, EngineResult};
use crate::id::CapabilityId;

const HEADER_LEN: usize = 8;
const CUSTOM_SECTION_ID: u8 = 0;

/// Optimizer/converter backing the `module-opt` capability.
///
/// Optimization is conservative: it drops custom sections (names, producers,
/// debug info), which carry no runtime semantics, and leaves every other
/// section byte-for-byte intact. Conversion emits a self-contained script
/// module embedding the binary.
pub struct LeanOptimizer;

impl LeanOptimizer {
    pub const LABEL: &'static str = "lean optimizer";
}

impl ModuleOptimizer for LeanOptimizer {
    fn optimize(&self, module: &[u8]) -> EngineResult<Vec<u8>> {
        self.validate(module)?;
        strip_custom_sections(module)
    }

    fn to_script(&self, module: &[u8]) -> EngineResult<String> {
        self.validate(module)?;
        let exports = module_exports(module)?;
        Ok(emit_script(module, &exports))
    }

    fn validate(&self, module: &[u8]) -> EngineResult<()> {
        wasmparser::validate(module)
            .map(|_| ())
            .map_err(|err| EngineError::InvalidModule(err.to_string()))
    }
}

#[async_trait]
impl EngineProvider for LeanOptimizer {
    fn capability(&self) -> CapabilityId {
        CapabilityId::ModuleOpt
    }

    fn label(&self) -> &str {
        Self::LABEL
    }

    async fn activate(&self) -> EngineResult<EngineHandle> {
        Ok(EngineHandle::Optimizer(Arc::new(LeanOptimizer)))
    }
}

/// Copies every non-custom section verbatim, header included.
fn strip_custom_sections(module: &[u8]) -> EngineResult<Vec<u8>> {
    if module.len() < HEADER_LEN {
        return Err(EngineError::InvalidModule(
            "truncated module header".to_string(),
        ));
    }
    let mut out = Vec::with_capacity(module.len());
    out.extend_from_slice(&module[..HEADER_LEN]);

    let mut pos = HEADER_LEN;
    while pos < module.len() {
        let start = pos;
        let id = module[pos];
        pos += 1;
        let size = read_leb_u32(module, &mut pos)? as usize;
        let end = pos
            .checked_add(size)
            .filter(|&end| end <= module.len())
            .ok_or_else(|| {
                EngineError::InvalidModule("section extends past end of module".to_string())
            })?;
        if id != CUSTOM_SECTION_ID {
            out.extend_from_slice(&module[start..end]);
        }
        pos = end;
    }
    Ok(out)
}

fn read_leb_u32(bytes: &[u8], pos: &mut usize) -> EngineResult<u32> {
    let mut value = 0u32;
    let mut shift = 0;
    loop {
        let byte = *bytes.get(*pos).ok_or_else(|| {
            EngineError::InvalidModule("truncated section header".to_string())
        })?;
        *pos += 1;
        value |= u32::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            return Ok(value);
        }
        shift += 7;
        if shift >= 35 {
            return Err(EngineError::InvalidModule(
                "oversized section length".to_string(),
            ));
        }
    }
}

fn module_exports(module: &[u8]) -> EngineResult<Vec<String>> {
    let mut exports = Vec::new();
    for payload in wasmparser::Parser::new(0).parse_all(module) {
        let payload = payload.map_err(|err| EngineError::InvalidModule(err.to_string()))?;
        if let wasmparser::Payload::ExportSection(reader) = payload {
            for export in reader {
                let export = export.map_err(|err| EngineError::InvalidModule(err.to_string()))?;
                exports.push(export.name.to_string());
            }
        }
    }
    Ok(exports)
}

fn emit_script(module: &[u8], exports: &[String]) -> String {
    let encoded = STANDARD.encode(module);
    let mut script = String::new();
    script.push_str("// Embeds the module binary and re-exports its surface.\n");
    script.push_str("const encoded =\n  ");
    let mut lines = Vec::new();
    let mut rest = encoded.as_str();
    while !rest.is_empty() {
        let (line, remainder) = rest.split_at(rest.len().min(76));
        lines.push(format!("\"{line}\""));
        rest = remainder;
    }
    if lines.is_empty() {
        lines.push(String::from("\"\""));
    }
    script.push_str(&lines.join(" +\n  "));
    script.push_str(";\n");
    script.push_str("const bytes = Uint8Array.from(atob(encoded), (c) => c.charCodeAt(0));\n");
    script.push_str("const { instance } = await WebAssembly.instantiate(bytes, {});\n");

    let mut seen = HashSet::new();
    for name in exports {
        let mut ident = export_identifier(name);
        while !seen.insert(ident.clone()) {
            ident.push('_');
        }
        script.push_str(&format!(
            "export const {ident} = instance.exports[{}];\n",
            js_string(name)
        ));
    }
    script.push_str("export default instance.exports;\n");
    script
}

const JS_RESERVED: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "export", "extends", "finally", "for", "function", "if", "import",
    "in", "instanceof", "let", "new", "return", "static", "super", "switch", "this", "throw",
    "try", "typeof", "var", "void", "while", "with", "yield",
];

/// Maps an arbitrary export name onto a valid script identifier.
fn export_identifier(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '_' || ch == '$' {
                ch
            } else {
                '_'
            }
        })
        .collect();
    let starts_with_digit = ident.chars().next().is_some_and(|ch| ch.is_ascii_digit());
    if ident.is_empty() || starts_with_digit || JS_RESERVED.contains(&ident.as_str()) {
        ident.insert(0, '_');
    }
    ident
}

fn js_string(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('"');
    for ch in name.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}
