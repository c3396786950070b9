//! `fetch` command.

use modfetch::{DescriptorSource, RemoteModuleResolver};

use super::common::{load_config, parse_module, GlobalArgs};
use crate::error::CliError;

/// Fetch a module into the cache and print the outcome for every artifact.
pub fn run(args: &GlobalArgs, module: &str) -> Result<(), CliError> {
    let id = parse_module(module)?;
    let config = load_config(args)?;
    let resolver = RemoteModuleResolver::from_config(&config)?;

    let report = resolver
        .fetcher()
        .fetch(&id)?
        .ok_or_else(|| CliError::NotFound(id.clone()))?;

    let descriptor = match report.descriptor {
        DescriptorSource::Cached => "cached",
        DescriptorSource::Fetched => "fetched",
    };
    println!("{}: descriptor {}", id, descriptor);

    for resource in &report.resources {
        println!(
            "  {}: {} (index: {})",
            resource.path, resource.resource, resource.index
        );
    }

    let missing = report.missing_resources().count();
    if missing > 0 {
        println!("{} resource(s) could not be cached", missing);
    }

    Ok(())
}
