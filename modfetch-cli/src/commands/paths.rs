//! `paths` command.

use modfetch::naming::{self, DESCRIPTOR_NAME};

use super::common::{load_config, parse_module, GlobalArgs};
use crate::error::CliError;

/// Print where a module is cached and where it is fetched from.
pub fn run(args: &GlobalArgs, module: &str) -> Result<(), CliError> {
    let id = parse_module(module)?;
    let config = load_config(args)?;

    let local = config.cache_root.join(naming::local_path(&id));
    let remote = format!(
        "{}{}",
        config.root_url,
        naming::remote_path(&config.repository_version, &id)
    );

    println!("Local:  {}", local.display());
    println!("Remote: {}", remote);
    println!("Descriptor: {}", local.join(DESCRIPTOR_NAME).display());

    Ok(())
}
