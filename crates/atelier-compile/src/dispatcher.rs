//! The compile dispatcher: envelope building, service resolution, and
//! response validation.

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::bindings::resolve_bindings;
use crate::error::{CompileError, CompileResult};
use crate::language::{Language, ServiceEndpoint, ServiceMap, ServiceProtocol};
use crate::transport::{RemoteTransport, ServiceTransport};
use crate::wire::{decode_items, CompileOutputs, WireRequest, WireResponse};

/// Named source files plus a free-form options string.
#[derive(Debug, Clone, Default)]
pub struct CompileRequest {
    /// File path to text content; paths are unique, order carries no
    /// meaning.
    pub files: BTreeMap<String, String>,
    /// Compiler flags, passed through verbatim.
    pub options: String,
}

impl CompileRequest {
    pub fn new(options: impl Into<String>) -> Self {
        Self {
            files: BTreeMap::new(),
            options: options.into(),
        }
    }

    pub fn file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }
}

/// Submits compile requests to the service resolved for a language pair.
pub struct CompileDispatcher {
    services: ServiceMap,
    transport: Arc<dyn ServiceTransport>,
}

impl CompileDispatcher {
    pub fn new(services: ServiceMap) -> CompileResult<Self> {
        Ok(Self {
            services,
            transport: Arc::new(RemoteTransport::new()?),
        })
    }

    /// Builds a dispatcher over a caller-supplied transport.
    pub fn with_transport(services: ServiceMap, transport: Arc<dyn ServiceTransport>) -> Self {
        Self {
            services,
            transport,
        }
    }

    /// Compiles the request for a `(source, target)` pair and returns every
    /// output the backend produced with content present.
    ///
    /// The target check happens first: anything but the binary module format
    /// fails before service resolution and before any transport call. A
    /// backend `success: false` fails with the backend's console text as the
    /// whole message.
    pub async fn compile(
        &self,
        request: &CompileRequest,
        source: Language,
        target: Language,
    ) -> CompileResult<CompileOutputs> {
        if target != Language::Wasm {
            return Err(CompileError::UnsupportedTarget(target));
        }
        let endpoint = self
            .services
            .resolve(source, target)
            .ok_or(CompileError::NoService {
                source_language: source,
                target_language: target,
            })?;
        if endpoint.protocol != ServiceProtocol::Json {
            return Err(CompileError::Protocol {
                url: endpoint.url.clone(),
                expected: ServiceProtocol::Json,
                actual: endpoint.protocol,
            });
        }

        debug!(
            %source,
            %target,
            url = %endpoint.url,
            files = request.files.len(),
            "dispatching compile request"
        );
        let body = serde_json::to_value(WireRequest::from(request))?;
        let raw = self.transport.post_json(&endpoint.url, body).await?;
        let response: WireResponse = serde_json::from_value(raw)?;

        if !response.success {
            warn!(%source, "backend reported compile failure");
            return Err(CompileError::Compilation(response.console));
        }
        decode_items(response.items)
    }

    /// One file in, the resolved primary binary out. Companions and
    /// auxiliary outputs are discarded; `None` means the backend succeeded
    /// without producing a primary.
    pub async fn compile_single(
        &self,
        path: &str,
        content: &str,
        source: Language,
        options: &str,
    ) -> CompileResult<Option<Vec<u8>>> {
        let request = CompileRequest::new(options).file(path, content);
        let outputs = self.compile(&request, source, Language::Wasm).await?;
        let resolved = resolve_bindings(&outputs);
        Ok(resolved.primary.map(|artifact| artifact.payload.to_bytes()))
    }

    /// Generic raw request/response exchange with a form-protocol endpoint.
    pub async fn exchange(&self, endpoint: &ServiceEndpoint, body: String) -> CompileResult<String> {
        if endpoint.protocol != ServiceProtocol::Form {
            return Err(CompileError::Protocol {
                url: endpoint.url.clone(),
                expected: ServiceProtocol::Form,
                actual: endpoint.protocol,
            });
        }
        debug!(url = %endpoint.url, "dispatching raw exchange");
        self.transport.post_form(&endpoint.url, body).await
    }
}
