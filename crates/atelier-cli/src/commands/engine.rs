//! Engine capability commands

use clap::Subcommand;
use colored::*;

use atelier_engines::{CapabilityId, EngineRegistry};

use crate::error::CliResult;
use crate::output::print_success;

/// Engine subcommands
#[derive(Subcommand)]
pub enum EngineCommands {
    /// List capabilities and their status
    List,

    /// Activate the engine for a capability
    Ensure {
        /// Capability id (module-text, module-opt, markdown)
        capability: String,
    },
}

/// Execute an engine command
pub async fn execute(command: EngineCommands, engines: &EngineRegistry) -> CliResult<()> {
    match command {
        EngineCommands::List => {
            for status in engines.capabilities() {
                let state = if status.ready {
                    "ready".green()
                } else {
                    "unloaded".dimmed()
                };
                println!("{:<12} {:<22} {}", status.id.to_string(), status.label, state);
            }
            Ok(())
        }

        EngineCommands::Ensure { capability } => {
            let id: CapabilityId = capability.parse()?;
            engines.ensure(id).await?;
            print_success(&format!("{id} engine ready"));
            Ok(())
        }
    }
}
