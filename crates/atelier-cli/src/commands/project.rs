//! Project tree commands

use clap::Subcommand;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tracing::debug;

use atelier_engines::EngineRegistry;
use atelier_project::{load_project, DirTemplateSource, Directory, Node, Project};
use atelier_workbench::Workbench;

use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::print_success;

/// Project subcommands
#[derive(Subcommand)]
pub enum ProjectCommands {
    /// Load a project tree description and list its contents
    Open {
        /// Path to the tree JSON
        file: String,

        /// Directory template content is fetched from; defaults to the
        /// config's template base, then the JSON file's directory
        #[arg(short, long)]
        base: Option<String>,

        /// Disassemble this file after loading and print the text
        #[arg(long)]
        disasm: Option<String>,
    },
}

/// Execute a project command
pub async fn execute(
    command: ProjectCommands,
    config: &CliConfig,
    engines: Arc<EngineRegistry>,
) -> CliResult<()> {
    match command {
        ProjectCommands::Open { file, base, disasm } => {
            let json = fs::read_to_string(&file).await?;
            let base = base
                .or_else(|| config.template_base.clone())
                .unwrap_or_else(|| containing_dir(&file));
            debug!(%base, "fetching template content relative to base");
            let source = DirTemplateSource::new(base);

            let mut project = Project::new("untitled");
            load_project(&json, &mut project, &source).await?;
            print_success(&format!("Loaded project {}", project.name));
            print_tree(&project.root, 0);

            if let Some(path) = disasm {
                let bench = Workbench::new(engines);
                let artifact = bench.disassemble(&mut project, &path).await?;
                let sibling = match path.rsplit_once('/') {
                    Some((dir, _)) => format!("{dir}/{artifact}"),
                    None => artifact,
                };
                if let Some(text) = project
                    .find_file(&sibling)
                    .and_then(|file| file.content.as_text())
                {
                    println!("{text}");
                }
            }
            Ok(())
        }
    }
}

fn containing_dir(file: &str) -> String {
    Path::new(file)
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(|parent| parent.display().to_string())
        .unwrap_or_else(|| ".".to_string())
}

fn print_tree(dir: &Directory, depth: usize) {
    let indent = "  ".repeat(depth);
    for node in dir.children() {
        match node {
            Node::Directory(sub) => {
                println!("{indent}{}/", sub.name);
                print_tree(sub, depth + 1);
            }
            Node::File(file) => {
                println!(
                    "{indent}{} ({}, {} bytes)",
                    file.name,
                    file.kind,
                    file.content.len()
                );
            }
        }
    }
}
