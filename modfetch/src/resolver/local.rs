//! Filesystem-only resolver over a module directory tree.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::ModuleResolver;
use crate::descriptor::{DescriptorParser, ModuleDescriptor};
use crate::error::{ModuleLoadError, ResolverResult};
use crate::identifier::ModuleIdentifier;
use crate::naming::{self, DESCRIPTOR_NAME};

/// Resolves modules from descriptors laid out under a root directory.
pub struct LocalModuleResolver {
    root: PathBuf,
    parser: Arc<dyn DescriptorParser>,
}

impl LocalModuleResolver {
    /// Create a resolver over `root`.
    pub fn new(root: impl Into<PathBuf>, parser: Arc<dyn DescriptorParser>) -> Self {
        Self {
            root: root.into(),
            parser,
        }
    }

    /// Root directory searched by this resolver.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute descriptor path for a module.
    pub fn descriptor_path(&self, id: &ModuleIdentifier) -> PathBuf {
        self.root.join(naming::local_file(id, DESCRIPTOR_NAME))
    }
}

impl ModuleResolver for LocalModuleResolver {
    fn find_module(&self, id: &ModuleIdentifier) -> ResolverResult<Option<ModuleDescriptor>> {
        let path = self.descriptor_path(id);

        let mut file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ModuleLoadError::Read {
                    identifier: id.clone(),
                    path,
                    source,
                })
            }
        };

        let resources = self.parser.parse_resource_paths(&mut file, id)?;
        Ok(Some(ModuleDescriptor::new(id.clone(), path, resources)))
    }
}
