//! CLI error types.

use std::fmt;

use modfetch::{ConfigError, IdentifierError, ModuleIdentifier, ModuleLoadError};

/// Errors surfaced to the command line.
#[derive(Debug)]
pub enum CliError {
    /// Configuration could not be built.
    Config(ConfigError),

    /// The module identifier could not be parsed.
    Identifier(IdentifierError),

    /// Resolution failed with a hard error.
    Module(ModuleLoadError),

    /// The module is neither cached nor available remotely.
    NotFound(ModuleIdentifier),

    /// Logging could not be initialized.
    Logging(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Identifier(e) => write!(f, "Invalid module identifier: {}", e),
            CliError::Module(e) => write!(f, "{}", e),
            CliError::NotFound(id) => {
                write!(f, "Module {} not found locally or in the repository", id)
            }
            CliError::Logging(msg) => write!(f, "Failed to initialize logging: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Identifier(e) => Some(e),
            CliError::Module(e) => Some(e),
            CliError::NotFound(_) | CliError::Logging(_) => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<IdentifierError> for CliError {
    fn from(e: IdentifierError) -> Self {
        CliError::Identifier(e)
    }
}

impl From<ModuleLoadError> for CliError {
    fn from(e: ModuleLoadError) -> Self {
        CliError::Module(e)
    }
}
