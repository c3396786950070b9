//! Error types for module resolution.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::cache::CacheError;
use crate::identifier::ModuleIdentifier;

/// Result type for resolution and fetch operations.
pub type ResolverResult<T> = Result<T, ModuleLoadError>;

/// Errors that can occur while loading a module.
///
/// Transport-level absence is never an error: a module that cannot be found
/// locally or remotely is reported as `Ok(None)` / `false`. These variants
/// cover hard failures, plus `NotFound` for primary resolvers that prefer to
/// signal a miss as an error.
#[derive(Debug, Error)]
pub enum ModuleLoadError {
    /// The resolver has no entry for the module.
    #[error("module not found: {0}")]
    NotFound(ModuleIdentifier),

    /// A descriptor asserted to be present locally could not be read.
    #[error("cannot read descriptor of {identifier} at {}: {source}", path.display())]
    Read {
        identifier: ModuleIdentifier,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A fetched artifact could not be written to the local cache.
    #[error("cannot fetch remote resource for {identifier}: {source}")]
    Persist {
        identifier: ModuleIdentifier,
        #[source]
        source: CacheError,
    },

    /// The remote stream broke while an artifact was being downloaded.
    ///
    /// Nothing is left in the cache for the artifact.
    #[error("transfer of {} for {identifier} was interrupted: {source}", path.display())]
    Transfer {
        identifier: ModuleIdentifier,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The descriptor content could not be parsed.
    #[error("invalid descriptor for {identifier}: {reason}")]
    Parse {
        identifier: ModuleIdentifier,
        reason: String,
    },
}

impl ModuleLoadError {
    /// Whether this error only reports that the module is absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// The identifier the failure relates to.
    pub fn identifier(&self) -> &ModuleIdentifier {
        match self {
            Self::NotFound(identifier)
            | Self::Read { identifier, .. }
            | Self::Persist { identifier, .. }
            | Self::Transfer { identifier, .. }
            | Self::Parse { identifier, .. } => identifier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_not_found_display() {
        let err = ModuleLoadError::NotFound(ModuleIdentifier::new("org.foo", "main"));
        assert_eq!(err.to_string(), "module not found: org.foo:main");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_persist_carries_identifier_and_cause() {
        let err = ModuleLoadError::Persist {
            identifier: ModuleIdentifier::new("org.foo", "main"),
            source: CacheError::Write {
                path: PathBuf::from("/cache/org/foo/main/foo.jar"),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
            },
        };

        assert!(!err.is_not_found());
        assert_eq!(err.identifier().name(), "org.foo");
        assert!(err.to_string().contains("org.foo:main"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_transfer_names_the_artifact() {
        let err = ModuleLoadError::Transfer {
            identifier: ModuleIdentifier::new("org.foo", "main"),
            path: PathBuf::from("/cache/org/foo/main/foo.jar"),
            source: io::Error::new(io::ErrorKind::ConnectionReset, "reset"),
        };

        assert_eq!(err.identifier().slot(), "main");
        assert!(err.to_string().contains("foo.jar"));
        assert!(err.to_string().contains("interrupted"));
    }
}
