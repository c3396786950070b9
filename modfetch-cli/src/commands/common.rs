//! Common types and utilities shared across CLI commands.

use std::path::PathBuf;

use clap::Args;
use modfetch::config::{ENV_CACHE_ROOT, ENV_REPOSITORY_VERSION, ENV_ROOT_URL};
use modfetch::{default_config_path, ModuleIdentifier, RemoteConfig};

use crate::error::CliError;

/// Settings accepted by every subcommand.
#[derive(Debug, Default, Args)]
pub struct GlobalArgs {
    /// Configuration file (default: ~/.modfetch/config.ini if present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Local module cache directory
    #[arg(long, global = true, value_name = "DIR")]
    pub cache_root: Option<PathBuf>,

    /// Repository root URL
    #[arg(long, global = true, value_name = "URL")]
    pub root_url: Option<String>,

    /// Repository version tag (e.g. trunk)
    #[arg(long, global = true, value_name = "TAG")]
    pub repository_version: Option<String>,
}

impl GlobalArgs {
    /// Value given on the command line for a configuration variable.
    fn flag_value(&self, key: &str) -> Option<String> {
        match key {
            ENV_CACHE_ROOT => self
                .cache_root
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
            ENV_ROOT_URL => self.root_url.clone(),
            ENV_REPOSITORY_VERSION => self.repository_version.clone(),
            _ => None,
        }
    }
}

/// Build the effective configuration.
///
/// Command-line flags take precedence, then the environment, then the
/// configuration file.
pub fn load_config(args: &GlobalArgs) -> Result<RemoteConfig, CliError> {
    let path = args
        .config
        .clone()
        .or_else(|| default_config_path().filter(|p| p.is_file()));

    let config = RemoteConfig::load_with_vars(path.as_deref(), |key| {
        args.flag_value(key).or_else(|| std::env::var(key).ok())
    })?;

    tracing::debug!(
        config_file = ?path,
        root_url = %config.root_url,
        repository_version = %config.repository_version,
        cache_root = %config.cache_root.display(),
        timeout_secs = config.timeout.as_secs(),
        max_retries = config.retry.max_retries,
        "Effective configuration"
    );
    Ok(config)
}

/// Parse a module identifier argument.
pub fn parse_module(module: &str) -> Result<ModuleIdentifier, CliError> {
    Ok(module.parse()?)
}
