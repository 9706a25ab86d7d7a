//! Module file commands: disassemble, assemble, convert, optimize,
//! validate. All of them go through the engine registry.

use tokio::fs;

use atelier_engines::EngineRegistry;

use crate::error::CliResult;
use crate::output::print_success;

pub async fn disassemble(
    engines: &EngineRegistry,
    file: &str,
    output: Option<String>,
) -> CliResult<()> {
    let module = fs::read(file).await?;
    let text = engines.codec().await?.disassemble(&module)?;
    let dest = output.unwrap_or_else(|| format!("{file}.wat"));
    fs::write(&dest, text).await?;
    print_success(&format!("Disassembled {file} -> {dest}"));
    Ok(())
}

pub async fn assemble(
    engines: &EngineRegistry,
    file: &str,
    output: Option<String>,
) -> CliResult<()> {
    let text = fs::read_to_string(file).await?;
    let module = engines.codec().await?.assemble(&text)?;
    let dest = output.unwrap_or_else(|| format!("{file}.wasm"));
    fs::write(&dest, module).await?;
    print_success(&format!("Assembled {file} -> {dest}"));
    Ok(())
}

pub async fn to_script(
    engines: &EngineRegistry,
    file: &str,
    output: Option<String>,
) -> CliResult<()> {
    let module = fs::read(file).await?;
    let script = engines.optimizer().await?.to_script(&module)?;
    let dest = output.unwrap_or_else(|| format!("{file}.js"));
    fs::write(&dest, script).await?;
    print_success(&format!("Converted {file} -> {dest}"));
    Ok(())
}

/// Optimizes the module file in place.
pub async fn optimize(engines: &EngineRegistry, file: &str) -> CliResult<()> {
    let module = fs::read(file).await?;
    let optimized = engines.optimizer().await?.optimize(&module)?;
    let (before, after) = (module.len(), optimized.len());
    fs::write(file, optimized).await?;
    print_success(&format!("Optimized {file}: {before} -> {after} bytes"));
    Ok(())
}

pub async fn validate(engines: &EngineRegistry, file: &str) -> CliResult<()> {
    let module = fs::read(file).await?;
    engines.optimizer().await?.validate(&module)?;
    print_success(&format!("{file} is a valid module"));
    Ok(())
}
