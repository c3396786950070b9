//! Module descriptors.
//!
//! A descriptor (`module.xml`) lists the resources a module is made of. The
//! order of that list is significant: resources are fetched in it, and
//! consumers treat it as precedence order.

mod xml;

pub use xml::ModuleXmlParser;

use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::ResolverResult;
use crate::identifier::ModuleIdentifier;

/// Turns descriptor bytes into the ordered list of resource paths.
///
/// The parser borrows the reader and never closes or takes ownership of it.
/// The identifier is only used for error context.
pub trait DescriptorParser: Send + Sync {
    /// Parse the resource paths declared by a descriptor, in document order.
    ///
    /// Paths are relative to the module directory.
    fn parse_resource_paths(
        &self,
        reader: &mut dyn Read,
        identifier: &ModuleIdentifier,
    ) -> ResolverResult<Vec<String>>;
}

/// A resolved module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    identifier: ModuleIdentifier,
    location: Option<PathBuf>,
    resources: Vec<String>,
}

impl ModuleDescriptor {
    /// Create a descriptor read from `location`.
    pub fn new(identifier: ModuleIdentifier, location: PathBuf, resources: Vec<String>) -> Self {
        Self {
            identifier,
            location: Some(location),
            resources,
        }
    }

    /// Create a descriptor for a module that exists only in-process.
    pub fn synthetic(identifier: ModuleIdentifier) -> Self {
        Self {
            identifier,
            location: None,
            resources: Vec::new(),
        }
    }

    /// The module identifier.
    pub fn identifier(&self) -> &ModuleIdentifier {
        &self.identifier
    }

    /// Path of the descriptor file, `None` for synthetic modules.
    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    /// Declared resource paths in descriptor order.
    pub fn resources(&self) -> &[String] {
        &self.resources
    }

    /// Absolute resource paths, next to the descriptor file.
    pub fn resource_files(&self) -> Vec<PathBuf> {
        let Some(dir) = self.location.as_deref().and_then(Path::parent) else {
            return Vec::new();
        };
        self.resources.iter().map(|r| dir.join(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_files_are_relative_to_descriptor() {
        let descriptor = ModuleDescriptor::new(
            ModuleIdentifier::new("org.foo", "main"),
            PathBuf::from("/cache/org/foo/main/module.xml"),
            vec!["a.jar".to_string(), "lib/b.jar".to_string()],
        );

        assert_eq!(
            descriptor.resource_files(),
            vec![
                PathBuf::from("/cache/org/foo/main/a.jar"),
                PathBuf::from("/cache/org/foo/main/lib/b.jar"),
            ]
        );
    }

    #[test]
    fn test_synthetic_descriptor() {
        let descriptor = ModuleDescriptor::synthetic(ModuleIdentifier::system());
        assert!(descriptor.location().is_none());
        assert!(descriptor.resources().is_empty());
        assert!(descriptor.resource_files().is_empty());
    }
}
