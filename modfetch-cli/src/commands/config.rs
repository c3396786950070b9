//! `config` command.

use super::common::{load_config, GlobalArgs};
use crate::error::CliError;

/// Print the effective configuration.
pub fn run(args: &GlobalArgs) -> Result<(), CliError> {
    let config = load_config(args)?;

    println!("root_url           = {}", config.root_url);
    println!("repository_version = {}", config.repository_version);
    println!("cache_root         = {}", config.cache_root.display());
    println!("timeout_secs       = {}", config.timeout.as_secs());
    println!("max_retries        = {}", config.retry.max_retries);
    println!(
        "retry_backoff_ms   = {}",
        config.retry.initial_backoff.as_millis()
    );

    Ok(())
}
