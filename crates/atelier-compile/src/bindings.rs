//! Resolves conventionally named artifacts out of a raw output mapping.

use crate::wire::{CompileOutputs, OutputPayload};

/// Conventional name of the compiled binary module.
pub const PRIMARY_BINARY: &str = "a.wasm";

/// Conventional name of the auxiliary glue script.
pub const COMPANION_SCRIPT: &str = "a.glue.js";

/// Role of a resolved artifact within a compile result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactRole {
    /// The compiled binary module.
    Primary,
    /// The auxiliary glue/bindings script.
    Companion,
}

/// A named output with its resolved role.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub name: String,
    pub role: ArtifactRole,
    pub payload: OutputPayload,
}

/// What [`resolve_bindings`] found. Either slot may be empty; callers check.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedBindings {
    pub primary: Option<Artifact>,
    pub companion: Option<Artifact>,
}

/// Picks the primary binary and companion script out of a compile result by
/// their fixed conventional names. Identity comes from those names alone:
/// the backend never declares roles. Other entries are ignored here and stay
/// reachable through the raw mapping. An absent primary is not an error.
pub fn resolve_bindings(outputs: &CompileOutputs) -> ResolvedBindings {
    let pick = |name: &str, role: ArtifactRole| {
        outputs.get(name).map(|payload| Artifact {
            name: name.to_string(),
            role,
            payload: payload.clone(),
        })
    };
    ResolvedBindings {
        primary: pick(PRIMARY_BINARY, ArtifactRole::Primary),
        companion: pick(COMPANION_SCRIPT, ArtifactRole::Companion),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outputs(entries: &[(&str, OutputPayload)]) -> CompileOutputs {
        entries
            .iter()
            .map(|(name, payload)| (name.to_string(), payload.clone()))
            .collect()
    }

    #[test]
    fn both_conventional_names_resolve() {
        let outputs = outputs(&[
            (PRIMARY_BINARY, OutputPayload::Binary(vec![0, 97, 115, 109])),
            (COMPANION_SCRIPT, OutputPayload::Text("glue".to_string())),
            ("listing.txt", OutputPayload::Text("ignored".to_string())),
        ]);

        let resolved = resolve_bindings(&outputs);
        let primary = resolved.primary.unwrap();
        assert_eq!(primary.name, PRIMARY_BINARY);
        assert_eq!(primary.role, ArtifactRole::Primary);
        let companion = resolved.companion.unwrap();
        assert_eq!(companion.role, ArtifactRole::Companion);
        assert_eq!(companion.payload.as_text(), Some("glue"));
    }

    #[test]
    fn primary_only_results_resolve_without_error() {
        let outputs = outputs(&[(PRIMARY_BINARY, OutputPayload::Binary(vec![1]))]);
        let resolved = resolve_bindings(&outputs);
        assert!(resolved.primary.is_some());
        assert!(resolved.companion.is_none());
    }

    #[test]
    fn empty_results_resolve_to_nothing() {
        let resolved = resolve_bindings(&CompileOutputs::new());
        assert_eq!(resolved, ResolvedBindings::default());
    }

    #[test]
    fn text_primary_still_yields_bytes() {
        let outputs = outputs(&[(PRIMARY_BINARY, OutputPayload::Text("asm".to_string()))]);
        let resolved = resolve_bindings(&outputs);
        assert_eq!(resolved.primary.unwrap().payload.to_bytes(), b"asm");
    }
}
