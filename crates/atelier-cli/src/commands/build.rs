//! Remote compile command

use std::path::Path;
use tokio::fs;

use atelier_compile::{resolve_bindings, CompileDispatcher, CompileRequest, Language, ServiceMap};

use crate::error::{CliError, CliResult};
use crate::output::{print_info, print_success, print_warning};

/// Compiles the given files through the routed service and writes every
/// returned output under `out_dir`.
pub async fn execute(
    services: ServiceMap,
    files: Vec<String>,
    source: Option<Language>,
    target: Language,
    options: String,
    out_dir: String,
) -> CliResult<()> {
    let source = match source {
        Some(language) => language,
        None => infer_source(&files[0])?,
    };

    let mut request = CompileRequest::new(options);
    for path in &files {
        let content = fs::read_to_string(path).await?;
        request.files.insert(path.clone(), content);
    }

    let dispatcher = CompileDispatcher::new(services)?;
    let outputs = dispatcher.compile(&request, source, target).await?;

    if outputs.is_empty() {
        print_warning("Backend produced no outputs");
        return Ok(());
    }

    fs::create_dir_all(&out_dir).await?;
    for (name, payload) in &outputs {
        let dest = Path::new(&out_dir).join(name);
        fs::write(&dest, payload.to_bytes()).await?;
        print_info(&format!("Wrote {}", dest.display()));
    }

    match resolve_bindings(&outputs).primary {
        Some(primary) => print_success(&format!(
            "Compiled {source} -> {} ({} bytes)",
            primary.name,
            primary.payload.to_bytes().len()
        )),
        None => print_warning("No primary module among the outputs"),
    }
    Ok(())
}

/// Infers the source language from the first file's extension.
fn infer_source(path: &str) -> CliResult<Language> {
    Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| ext.parse::<Language>().ok())
        .ok_or_else(|| {
            CliError::Config(format!(
                "cannot infer source language from {path}; pass --source"
            ))
        })
}
