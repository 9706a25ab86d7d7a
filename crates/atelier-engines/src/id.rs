use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

/// Identifies one engine capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityId {
    /// Disassembles and assembles module binaries.
    ModuleText,
    /// Optimizes, converts, and validates module binaries.
    ModuleOpt,
    /// Renders markdown to HTML.
    Markdown,
}

impl CapabilityId {
    pub const ALL: [CapabilityId; 3] = [
        CapabilityId::ModuleText,
        CapabilityId::ModuleOpt,
        CapabilityId::Markdown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityId::ModuleText => "module-text",
            CapabilityId::ModuleOpt => "module-opt",
            CapabilityId::Markdown => "markdown",
        }
    }
}

impl fmt::Display for CapabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CapabilityId {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "module-text" => Ok(CapabilityId::ModuleText),
            "module-opt" => Ok(CapabilityId::ModuleOpt),
            "markdown" => Ok(CapabilityId::Markdown),
            other => Err(EngineError::UnknownCapability(other.to_string())),
        }
    }
}
