//! Post-processors that tie the engine capabilities to a project tree.
//!
//! Each sibling-emitting operation ensures its capability through the
//! registry, runs the engine transform on the source artifact's content, and
//! upserts a sibling next to the source: derived name (source name plus a
//! fixed suffix), provenance description naming the engine. Re-running an
//! operation replaces the sibling's content instead of stacking duplicates.
//! `optimize` is the one operation that rewrites its source in place;
//! `validate` and `render_markdown` have no tree side effect.

mod error;

pub use error::{WorkbenchError, WorkbenchResult};

use std::sync::Arc;
use tracing::{debug, info};

use atelier_engines::{CapabilityId, EngineRegistry};
use atelier_project::{Directory, FileContent, FileType, Project, SourceFile};

/// Suffix appended to a source name by [`Workbench::disassemble`].
pub const DISASSEMBLY_SUFFIX: &str = ".wat";
/// Suffix appended to a source name by [`Workbench::assemble`].
pub const ASSEMBLY_SUFFIX: &str = ".wasm";
/// Suffix appended to a source name by [`Workbench::convert`].
pub const SCRIPT_SUFFIX: &str = ".js";

/// Applies engine transforms to files in a project tree.
pub struct Workbench {
    engines: Arc<EngineRegistry>,
}

impl Workbench {
    pub fn new(engines: Arc<EngineRegistry>) -> Self {
        Self { engines }
    }

    pub fn engines(&self) -> &EngineRegistry {
        &self.engines
    }

    /// Disassembles the binary module at `path` into a `.wat` sibling.
    /// Returns the sibling's name.
    pub async fn disassemble(&self, project: &mut Project, path: &str) -> WorkbenchResult<String> {
        let codec = self.engines.codec().await?;
        let label = self.engines.label(CapabilityId::ModuleText)?.to_string();

        let (parent, leaf) = locate(project, path)?;
        let source = parent
            .file(leaf)
            .ok_or_else(|| WorkbenchError::MissingSource(path.to_string()))?;
        let text = codec.disassemble(module_bytes(source, path)?)?;

        let name = format!("{leaf}{DISASSEMBLY_SUFFIX}");
        let description = format!("Disassembled from {leaf} with the {label} engine");
        parent.upsert_file(
            SourceFile::text(name.clone(), FileType::Wat, text).with_description(description),
        );
        info!(source = %path, artifact = %name, "disassembly artifact written");
        Ok(name)
    }

    /// Assembles the text at `path` into a validated `.wasm` sibling.
    /// Returns the sibling's name.
    pub async fn assemble(&self, project: &mut Project, path: &str) -> WorkbenchResult<String> {
        let codec = self.engines.codec().await?;
        let label = self.engines.label(CapabilityId::ModuleText)?.to_string();

        let (parent, leaf) = locate(project, path)?;
        let source = parent
            .file(leaf)
            .ok_or_else(|| WorkbenchError::MissingSource(path.to_string()))?;
        let module = codec.assemble(text_content(source, path)?)?;

        let name = format!("{leaf}{ASSEMBLY_SUFFIX}");
        let description = format!("Assembled from {leaf} with the {label} engine");
        parent.upsert_file(
            SourceFile::binary(name.clone(), FileType::Wasm, module).with_description(description),
        );
        info!(source = %path, artifact = %name, "assembly artifact written");
        Ok(name)
    }

    /// Converts the binary module at `path` into a scripted `.js` sibling.
    /// The source artifact is never mutated. Returns the sibling's name.
    pub async fn convert(&self, project: &mut Project, path: &str) -> WorkbenchResult<String> {
        let optimizer = self.engines.optimizer().await?;
        let label = self.engines.label(CapabilityId::ModuleOpt)?.to_string();

        let (parent, leaf) = locate(project, path)?;
        let source = parent
            .file(leaf)
            .ok_or_else(|| WorkbenchError::MissingSource(path.to_string()))?;
        let script = optimizer.to_script(module_bytes(source, path)?)?;

        let name = format!("{leaf}{SCRIPT_SUFFIX}");
        let description = format!("Converted from {leaf} with the {label} engine");
        parent.upsert_file(
            SourceFile::text(name.clone(), FileType::JavaScript, script)
                .with_description(description),
        );
        info!(source = %path, artifact = %name, "script artifact written");
        Ok(name)
    }

    /// Optimizes the binary module at `path`, rewriting its content in
    /// place. No sibling is created.
    pub async fn optimize(&self, project: &mut Project, path: &str) -> WorkbenchResult<()> {
        let optimizer = self.engines.optimizer().await?;

        let (parent, leaf) = locate(project, path)?;
        let file = parent
            .file_mut(leaf)
            .ok_or_else(|| WorkbenchError::MissingSource(path.to_string()))?;
        let optimized = optimizer.optimize(module_bytes(file, path)?)?;

        debug!(
            source = %path,
            before = file.content.len(),
            after = optimized.len(),
            "optimized module in place"
        );
        file.content = FileContent::Binary(optimized);
        Ok(())
    }

    /// Validates the binary module at `path`; no tree side effect.
    pub async fn validate(&self, project: &Project, path: &str) -> WorkbenchResult<()> {
        let optimizer = self.engines.optimizer().await?;
        let file = project
            .find_file(path)
            .ok_or_else(|| WorkbenchError::MissingSource(path.to_string()))?;
        optimizer.validate(module_bytes(file, path)?)?;
        Ok(())
    }

    /// Renders markdown to HTML with the GitHub-flavored extensions. Pure;
    /// callers decide whether to store the result.
    pub async fn render_markdown(&self, markdown: &str) -> WorkbenchResult<String> {
        let renderer = self.engines.renderer().await?;
        Ok(renderer.render(markdown))
    }
}

fn locate<'p, 'a>(
    project: &'p mut Project,
    path: &'a str,
) -> WorkbenchResult<(&'p mut Directory, &'a str)> {
    project
        .file_parent_mut(path)
        .ok_or_else(|| WorkbenchError::MissingSource(path.to_string()))
}

fn module_bytes<'f>(file: &'f SourceFile, path: &str) -> WorkbenchResult<&'f [u8]> {
    match &file.content {
        FileContent::Binary(bytes) => Ok(bytes),
        FileContent::Text(_) => Err(WorkbenchError::NotBinary {
            path: path.to_string(),
        }),
    }
}

fn text_content<'f>(file: &'f SourceFile, path: &str) -> WorkbenchResult<&'f str> {
    file.content.as_text().ok_or_else(|| WorkbenchError::NotText {
        path: path.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_project::Node;

    fn workbench() -> Workbench {
        Workbench::new(Arc::new(EngineRegistry::with_defaults()))
    }

    #[tokio::test]
    async fn missing_sources_are_reported_by_path() {
        let mut project = Project::new("demo");
        let err = workbench()
            .disassemble(&mut project, "out/a.wasm")
            .await
            .unwrap_err();
        assert!(matches!(err, WorkbenchError::MissingSource(path) if path == "out/a.wasm"));
    }

    #[tokio::test]
    async fn disassembling_text_content_is_a_shape_error() {
        let mut project = Project::new("demo");
        project.root.push(Node::File(SourceFile::text(
            "a.wasm",
            FileType::Wasm,
            "not a module",
        )));

        let err = workbench()
            .disassemble(&mut project, "a.wasm")
            .await
            .unwrap_err();
        assert!(matches!(err, WorkbenchError::NotBinary { .. }));
    }

    #[tokio::test]
    async fn assembling_binary_content_is_a_shape_error() {
        let mut project = Project::new("demo");
        project.root.push(Node::File(SourceFile::binary(
            "a.wat",
            FileType::Wat,
            vec![0, 1, 2],
        )));

        let err = workbench().assemble(&mut project, "a.wat").await.unwrap_err();
        assert!(matches!(err, WorkbenchError::NotText { .. }));
    }
}
