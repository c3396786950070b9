//! modfetch CLI - Command-line interface
//!
//! Resolves modules through the remote-fallback resolver chain and inspects
//! the local module cache.

mod commands;
mod error;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::commands::common::GlobalArgs;
use crate::error::CliError;

#[derive(Debug, Parser)]
#[command(name = "modfetch", version, about = "Resolve and cache modules from a remote repository")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a module, fetching it from the repository if needed
    Resolve {
        /// Module identifier (name or name:slot)
        module: String,
    },

    /// Fetch a module into the cache and report each artifact
    Fetch {
        /// Module identifier (name or name:slot)
        module: String,
    },

    /// Show the local and remote locations of a module
    Paths {
        /// Module identifier (name or name:slot)
        module: String,
    },

    /// Show the effective configuration
    Config,
}

fn run(cli: Cli) -> Result<(), CliError> {
    let _guard = logging::init(cli.verbose, cli.log_file.as_deref())?;

    match cli.command {
        Commands::Resolve { module } => commands::resolve::run(&cli.global, &module),
        Commands::Fetch { module } => commands::fetch::run(&cli.global, &module),
        Commands::Paths { module } => commands::paths::run(&cli.global, &module),
        Commands::Config => commands::config::run(&cli.global),
    }
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
