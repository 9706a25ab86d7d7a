//! Wire shapes for the compile protocol.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::dispatcher::CompileRequest;
use crate::error::{CompileError, CompileResult};

/// Request envelope: `{ "files": { "<path>": { "content": … } }, "options": … }`.
#[derive(Debug, Serialize)]
pub(crate) struct WireRequest {
    pub files: BTreeMap<String, WireFile>,
    pub options: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct WireFile {
    pub content: String,
}

impl From<&CompileRequest> for WireRequest {
    fn from(request: &CompileRequest) -> Self {
        Self {
            files: request
                .files
                .iter()
                .map(|(path, content)| {
                    (
                        path.clone(),
                        WireFile {
                            content: content.clone(),
                        },
                    )
                })
                .collect(),
            options: request.options.clone(),
        }
    }
}

/// Response envelope. Unknown top-level fields (the legacy `output` text)
/// are tolerated and ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct WireResponse {
    pub success: bool,
    #[serde(default)]
    pub console: String,
    #[serde(default)]
    pub items: BTreeMap<String, WireItem>,
}

/// One named output. Absent `content` marks a declared-but-empty output;
/// `encoding: "base64"` marks binary content.
#[derive(Debug, Deserialize)]
pub(crate) struct WireItem {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub encoding: Option<String>,
}

/// Content of one compile output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputPayload {
    Text(String),
    Binary(Vec<u8>),
}

impl OutputPayload {
    /// Payload as owned bytes; text converts through UTF-8.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            OutputPayload::Text(text) => text.clone().into_bytes(),
            OutputPayload::Binary(bytes) => bytes.clone(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            OutputPayload::Text(text) => Some(text),
            OutputPayload::Binary(_) => None,
        }
    }
}

/// Named outputs with present content, keyed by output name.
pub type CompileOutputs = BTreeMap<String, OutputPayload>;

/// Decodes response items into payloads, silently dropping items with
/// absent content.
pub(crate) fn decode_items(items: BTreeMap<String, WireItem>) -> CompileResult<CompileOutputs> {
    let mut outputs = CompileOutputs::new();
    for (name, item) in items {
        let Some(content) = item.content else {
            continue;
        };
        let payload = match item.encoding.as_deref() {
            Some("base64") => {
                let bytes = STANDARD
                    .decode(content.as_bytes())
                    .map_err(|err| CompileError::Payload {
                        name: name.clone(),
                        reason: err.to_string(),
                    })?;
                OutputPayload::Binary(bytes)
            }
            _ => OutputPayload::Text(content),
        };
        outputs.insert(name, payload);
    }
    Ok(outputs)
}
