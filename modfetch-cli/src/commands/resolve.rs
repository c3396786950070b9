//! `resolve` command.

use modfetch::{ModuleResolver, RemoteModuleResolver};

use super::common::{load_config, parse_module, GlobalArgs};
use crate::error::CliError;

/// Resolve a module and print its descriptor and resource files.
pub fn run(args: &GlobalArgs, module: &str) -> Result<(), CliError> {
    let id = parse_module(module)?;
    let config = load_config(args)?;
    let resolver = RemoteModuleResolver::from_config(&config)?;

    let descriptor = resolver
        .find_module(&id)?
        .ok_or_else(|| CliError::NotFound(id.clone()))?;

    match descriptor.location() {
        Some(path) => println!("{} -> {}", id, path.display()),
        None => println!("{} (in-process)", id),
    }
    for file in descriptor.resource_files() {
        let state = if file.is_file() { "present" } else { "missing" };
        println!("  {:<8} {}", state, file.display());
    }

    Ok(())
}
