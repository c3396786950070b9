//! In-process resolver for the bootstrap module.

use super::ModuleResolver;
use crate::descriptor::ModuleDescriptor;
use crate::error::ResolverResult;
use crate::identifier::ModuleIdentifier;

/// Resolves only [`ModuleIdentifier::system`], without touching disk or
/// network. The descriptor is synthetic and declares no resources.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemModuleResolver;

impl SystemModuleResolver {
    /// Create the resolver.
    pub fn new() -> Self {
        Self
    }
}

impl ModuleResolver for SystemModuleResolver {
    fn find_module(&self, id: &ModuleIdentifier) -> ResolverResult<Option<ModuleDescriptor>> {
        if id.is_system() {
            Ok(Some(ModuleDescriptor::synthetic(id.clone())))
        } else {
            Ok(None)
        }
    }
}
