//! Languages and the pure `(source, target)` service table.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::CompileError;

/// Default origin for the hosted compile services.
pub const DEFAULT_SERVICE_BASE: &str = "https://compile.atelier.dev";

/// Source and target languages the dispatcher knows by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    C,
    Cpp,
    Rust,
    Wat,
    Wasm,
    X86,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Rust => "rust",
            Language::Wat => "wat",
            Language::Wasm => "wasm",
            Language::X86 => "x86",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "c" => Ok(Language::C),
            "cpp" | "c++" => Ok(Language::Cpp),
            "rust" | "rs" => Ok(Language::Rust),
            "wat" | "wast" => Ok(Language::Wat),
            "wasm" => Ok(Language::Wasm),
            "x86" => Ok(Language::X86),
            other => Err(CompileError::UnknownLanguage(other.to_string())),
        }
    }
}

/// Wire protocol a service endpoint speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceProtocol {
    /// JSON request envelope, JSON response; the compile protocol.
    Json,
    /// Raw string body posted as a form, response returned verbatim.
    Form,
}

impl fmt::Display for ServiceProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ServiceProtocol::Json => "json",
            ServiceProtocol::Form => "form",
        })
    }
}

/// Where and how to reach one compile service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoint {
    pub url: String,
    pub protocol: ServiceProtocol,
}

impl ServiceEndpoint {
    pub fn json(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            protocol: ServiceProtocol::Json,
        }
    }

    pub fn form(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            protocol: ServiceProtocol::Form,
        }
    }
}

/// Pure lookup table from `(source, target)` to a service endpoint.
#[derive(Debug, Clone, Default)]
pub struct ServiceMap {
    routes: HashMap<(Language, Language), ServiceEndpoint>,
}

impl ServiceMap {
    /// An empty table with no routes.
    pub fn new() -> Self {
        Self::default()
    }

    /// The shipped defaults: the hosted services for `c`, `cpp`, and `rust`
    /// to the binary module target.
    pub fn with_defaults() -> Self {
        let mut map = Self::new();
        for source in [Language::C, Language::Cpp, Language::Rust] {
            map.insert(
                source,
                Language::Wasm,
                ServiceEndpoint::json(format!("{DEFAULT_SERVICE_BASE}/compile/{source}")),
            );
        }
        map
    }

    /// Adds or replaces the route for a language pair.
    pub fn insert(&mut self, source: Language, target: Language, endpoint: ServiceEndpoint) {
        self.routes.insert((source, target), endpoint);
    }

    pub fn resolve(&self, source: Language, target: Language) -> Option<&ServiceEndpoint> {
        self.routes.get(&(source, target))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Every route, for display; no ordering guarantee.
    pub fn routes(&self) -> impl Iterator<Item = (Language, Language, &ServiceEndpoint)> {
        self.routes
            .iter()
            .map(|((source, target), endpoint)| (*source, *target, endpoint))
    }
}
