//! Atelier CLI - terminal interface to the compile and workbench services
//!
//! This CLI lets developers:
//! - Compile source files through the routed remote services
//! - Disassemble, assemble, convert, optimize, and validate module files
//! - Render markdown descriptions to HTML
//! - Load project tree descriptions and inspect them
//! - List and activate engine capabilities

use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod output;

use atelier_compile::Language;
use atelier_engines::EngineRegistry;
use commands::{build, engine, module, project, render};
use config::CliConfig;
use error::CliResult;
use output::print_error;

/// Atelier CLI application
#[derive(Parser)]
#[command(name = "atelier")]
#[command(about = "Atelier - remote compilation and module workbench", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "ATELIER_CONFIG")]
    config: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Compile source files with the routed remote service
    Compile {
        /// Source files
        #[arg(required = true)]
        files: Vec<String>,

        /// Source language (inferred from the first file when omitted)
        #[arg(short, long)]
        source: Option<Language>,

        /// Compile target
        #[arg(short, long, default_value = "wasm")]
        target: Language,

        /// Compiler options, passed through verbatim
        #[arg(short, long, default_value = "")]
        options: String,

        /// Directory to write outputs into
        #[arg(long, default_value = ".")]
        out_dir: String,
    },

    /// Disassemble a module file to text
    Wat {
        /// Module file
        file: String,

        /// Output path (defaults to the input plus `.wat`)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Assemble a text file to a module
    Wasm {
        /// Text file
        file: String,

        /// Output path (defaults to the input plus `.wasm`)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Convert a module file to a scripted form
    Script {
        /// Module file
        file: String,

        /// Output path (defaults to the input plus `.js`)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Optimize a module file in place
    Opt {
        /// Module file
        file: String,
    },

    /// Validate a module file
    Validate {
        /// Module file
        file: String,
    },

    /// Render a markdown file to HTML
    Render {
        /// Markdown file
        file: String,

        /// Output path (defaults to the input plus `.html`)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show the compile service routes
    Services,

    /// Project tree operations
    Project {
        #[command(subcommand)]
        command: project::ProjectCommands,
    },

    /// Engine capability management
    Engine {
        #[command(subcommand)]
        command: engine::EngineCommands,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        print_error(&err.to_string());
        std::process::exit(1);
    }
}

async fn run() -> CliResult<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    // Load config and build the engine registry
    let config = CliConfig::load(cli.config.as_deref())?;
    let engines = Arc::new(EngineRegistry::with_defaults());

    // Execute command
    match cli.command {
        Commands::Compile {
            files,
            source,
            target,
            options,
            out_dir,
        } => build::execute(config.service_map()?, files, source, target, options, out_dir).await,
        Commands::Wat { file, output } => module::disassemble(&engines, &file, output).await,
        Commands::Wasm { file, output } => module::assemble(&engines, &file, output).await,
        Commands::Script { file, output } => module::to_script(&engines, &file, output).await,
        Commands::Opt { file } => module::optimize(&engines, &file).await,
        Commands::Validate { file } => module::validate(&engines, &file).await,
        Commands::Render { file, output } => render::execute(&engines, &file, output).await,
        Commands::Services => {
            let services = config.service_map()?;
            let mut routes: Vec<_> = services.routes().collect();
            routes.sort_by_key(|(source, target, _)| (source.as_str(), target.as_str()));
            for (source, target, endpoint) in routes {
                let pair = format!("{source} -> {target}");
                println!("{pair:<14} {} ({})", endpoint.url, endpoint.protocol);
            }
            Ok(())
        }
        Commands::Project { command } => project::execute(command, &config, engines).await,
        Commands::Engine { command } => engine::execute(command, &engines).await,
    }
}
