//! Markdown rendering command

use tokio::fs;

use atelier_engines::EngineRegistry;

use crate::error::CliResult;
use crate::output::print_success;

pub async fn execute(
    engines: &EngineRegistry,
    file: &str,
    output: Option<String>,
) -> CliResult<()> {
    let markdown = fs::read_to_string(file).await?;
    let html = engines.renderer().await?.render(&markdown);
    let dest = output.unwrap_or_else(|| format!("{file}.html"));
    fs::write(&dest, html).await?;
    print_success(&format!("Rendered {file} -> {dest}"));
    Ok(())
}
