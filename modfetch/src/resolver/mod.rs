//! Module resolvers.
//!
//! Resolvers are composed rather than subclassed:
//!
//! ```text
//! RemoteModuleResolver (decorator)
//!         │
//!         ├── SystemModuleResolver   (bootstrap identifier only)
//!         ├── primary: dyn ModuleResolver (e.g. LocalModuleResolver)
//!         └── FetchOrchestrator      (fills the primary's cache on a miss)
//! ```

mod local;
mod remote;
mod system;

pub use local::LocalModuleResolver;
pub use remote::RemoteModuleResolver;
pub use system::SystemModuleResolver;

use std::sync::Arc;

use crate::descriptor::ModuleDescriptor;
use crate::error::ResolverResult;
use crate::identifier::ModuleIdentifier;

/// Finds module descriptors.
///
/// A missing module is reported as `Ok(None)`; resolvers may instead return
/// [`crate::ModuleLoadError::NotFound`] and callers must treat both alike.
/// Any other error is a hard failure.
pub trait ModuleResolver: Send + Sync {
    /// Look up the descriptor of `id`.
    fn find_module(&self, id: &ModuleIdentifier) -> ResolverResult<Option<ModuleDescriptor>>;
}

impl<R: ModuleResolver + ?Sized> ModuleResolver for Arc<R> {
    fn find_module(&self, id: &ModuleIdentifier) -> ResolverResult<Option<ModuleDescriptor>> {
        (**self).find_module(id)
    }
}

impl<R: ModuleResolver + ?Sized> ModuleResolver for Box<R> {
    fn find_module(&self, id: &ModuleIdentifier) -> ResolverResult<Option<ModuleDescriptor>> {
        (**self).find_module(id)
    }
}
