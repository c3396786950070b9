//! Remote-fallback resolver.

use std::fmt;
use std::sync::Arc;

use super::{LocalModuleResolver, ModuleResolver, SystemModuleResolver};
use crate::config::{ConfigError, RemoteConfig};
use crate::descriptor::{DescriptorParser, ModuleDescriptor, ModuleXmlParser};
use crate::error::ResolverResult;
use crate::fetch::FetchOrchestrator;
use crate::identifier::ModuleIdentifier;
use crate::remote::HttpRepository;

/// Resolver that falls back to the remote repository.
///
/// Asks the wrapped primary resolver first. When the primary has no answer,
/// the module is fetched into the local cache and the primary is asked once
/// more. The bootstrap identifier is always answered in-process.
pub struct RemoteModuleResolver {
    primary: Arc<dyn ModuleResolver>,
    system: Arc<dyn ModuleResolver>,
    fetcher: FetchOrchestrator,
}

impl RemoteModuleResolver {
    /// Wrap `primary`, filling its cache through `fetcher`.
    pub fn new(primary: Arc<dyn ModuleResolver>, fetcher: FetchOrchestrator) -> Self {
        Self {
            primary,
            system: Arc::new(SystemModuleResolver::new()),
            fetcher,
        }
    }

    /// Replace the resolver used for the bootstrap identifier.
    pub fn with_system_resolver(mut self, system: Arc<dyn ModuleResolver>) -> Self {
        self.system = system;
        self
    }

    /// Build the default chain: a [`LocalModuleResolver`] over the cache
    /// root, an [`HttpRepository`] and the `module.xml` parser.
    pub fn from_config(config: &RemoteConfig) -> Result<Self, ConfigError> {
        let config = config.clone().validate()?;
        let parser: Arc<dyn DescriptorParser> = Arc::new(ModuleXmlParser::new());

        let repository = HttpRepository::new(&config.root_url, config.timeout, config.retry)
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        let fetcher = FetchOrchestrator::new(&config, Arc::new(repository), Arc::clone(&parser))?;
        let primary = LocalModuleResolver::new(&config.cache_root, parser);

        Ok(Self::new(Arc::new(primary), fetcher))
    }

    /// The fetch orchestrator backing this resolver.
    pub fn fetcher(&self) -> &FetchOrchestrator {
        &self.fetcher
    }

    fn ask_primary(&self, id: &ModuleIdentifier) -> ResolverResult<Option<ModuleDescriptor>> {
        match self.primary.find_module(id) {
            Err(e) if e.is_not_found() => Ok(None),
            other => other,
        }
    }
}

impl ModuleResolver for RemoteModuleResolver {
    fn find_module(&self, id: &ModuleIdentifier) -> ResolverResult<Option<ModuleDescriptor>> {
        if id.is_system() {
            return self.system.find_module(id);
        }

        if let Some(descriptor) = self.ask_primary(id)? {
            return Ok(Some(descriptor));
        }

        tracing::debug!(module = %id, repository = %self.fetcher.repository().describe(), "Falling back to remote fetch");
        if self.fetcher.fetch_module(id)? {
            self.ask_primary(id)
        } else {
            Ok(None)
        }
    }
}

impl fmt::Display for RemoteModuleResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "remote module resolver ({})",
            self.fetcher.repository().describe()
        )
    }
}
