//! Remote-fallback fetch and cache of module artifacts.
//!
//! The [`FetchOrchestrator`] makes a module's descriptor available in the
//! local cache, then walks the resources the descriptor declares and caches
//! each one together with its `.index` sidecar.
//!
//! # Policy
//!
//! - Artifacts already in the cache are trusted and never re-fetched.
//! - A descriptor the repository does not have (or cannot serve) is a plain
//!   negative result, not an error.
//! - A resource or sidecar the repository does not have is skipped; the
//!   skip reason is recorded in the [`FetchReport`].
//! - A cache read or write failure is always an error: an artifact that was
//!   fetched but could not be persisted must not be silently dropped.
//! - A download that breaks mid-stream is an error as well, reported as
//!   [`ModuleLoadError::Transfer`]; nothing partial is left in the cache.
//!
//! Fetches of the same identifier are serialized so that concurrent
//! resolutions download each artifact once. The per-identifier lock is
//! dropped from the map once no fetch of that identifier is running.

mod report;

pub use report::{ArtifactOutcome, DescriptorSource, FetchReport, ResourceReport};

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;

use crate::cache::{CacheError, LocalCacheStore};
use crate::config::{ConfigError, RemoteConfig};
use crate::descriptor::DescriptorParser;
use crate::error::{ModuleLoadError, ResolverResult};
use crate::identifier::ModuleIdentifier;
use crate::naming::{self, DESCRIPTOR_NAME};
use crate::remote::{RemoteFetch, RemoteRepository};

/// Drives the fetch-if-absent sequence for modules.
pub struct FetchOrchestrator {
    store: LocalCacheStore,
    repository: Arc<dyn RemoteRepository>,
    parser: Arc<dyn DescriptorParser>,
    repository_version: String,
    in_flight: DashMap<ModuleIdentifier, Arc<Mutex<()>>>,
}

impl FetchOrchestrator {
    /// Create an orchestrator caching into `config.cache_root`.
    pub fn new(
        config: &RemoteConfig,
        repository: Arc<dyn RemoteRepository>,
        parser: Arc<dyn DescriptorParser>,
    ) -> Result<Self, ConfigError> {
        let store = LocalCacheStore::new(&config.cache_root)?;

        Ok(Self {
            store,
            repository,
            parser,
            repository_version: config.repository_version.clone(),
            in_flight: DashMap::new(),
        })
    }

    /// The local cache.
    pub fn store(&self) -> &LocalCacheStore {
        &self.store
    }

    /// The remote repository.
    pub fn repository(&self) -> &dyn RemoteRepository {
        self.repository.as_ref()
    }

    /// Repository version tag prefixed to remote paths.
    pub fn repository_version(&self) -> &str {
        &self.repository_version
    }

    /// Make a module available locally.
    ///
    /// Returns `true` if the descriptor is in the cache afterwards, either
    /// because it already was or because it was fetched.
    pub fn fetch_module(&self, id: &ModuleIdentifier) -> ResolverResult<bool> {
        Ok(self.fetch(id)?.is_some())
    }

    /// Make a module available locally and report what happened to each
    /// artifact.
    ///
    /// Returns `Ok(None)` when the descriptor is neither cached nor
    /// obtainable from the repository; nothing is written in that case.
    pub fn fetch(&self, id: &ModuleIdentifier) -> ResolverResult<Option<FetchReport>> {
        let lock = self.flight_lock(id);
        let result = {
            let _guard = lock.lock();
            self.fetch_locked(id)
        };

        // Only the map and `lock` hold the entry: nobody is waiting on it.
        self.in_flight
            .remove_if(id, |_, entry| Arc::strong_count(entry) == 2);
        result
    }

    fn fetch_locked(&self, id: &ModuleIdentifier) -> ResolverResult<Option<FetchReport>> {
        let local_prefix = naming::local_path(id);
        let remote_prefix = naming::remote_path(&self.repository_version, id);
        let descriptor_name = local_prefix.join(DESCRIPTOR_NAME);

        let (mut descriptor, source) = if self.store.exists(&descriptor_name) {
            tracing::debug!(module = %id, "Descriptor already cached");
            (
                self.open_descriptor(id, &descriptor_name)?,
                DescriptorSource::Cached,
            )
        } else {
            match self.repository.fetch(&remote_prefix, DESCRIPTOR_NAME) {
                RemoteFetch::Found(reader) => {
                    self.persist(id, reader, &descriptor_name)?;
                    // Parse what landed on disk, not the network stream.
                    (
                        self.open_descriptor(id, &descriptor_name)?,
                        DescriptorSource::Fetched,
                    )
                }
                RemoteFetch::NotFound => {
                    tracing::debug!(module = %id, "Module not found in repository");
                    return Ok(None);
                }
                RemoteFetch::Unavailable(reason) => {
                    tracing::warn!(module = %id, reason = %reason, "Cannot fetch module descriptor");
                    return Ok(None);
                }
            }
        };

        let resource_paths = self.parser.parse_resource_paths(&mut descriptor, id)?;
        drop(descriptor);

        let mut resources = Vec::with_capacity(resource_paths.len());
        for path in resource_paths {
            if !naming::is_safe_resource_path(&path) {
                tracing::warn!(module = %id, resource = %path, "Skipping resource outside module directory");
                resources.push(ResourceReport {
                    path,
                    resource: ArtifactOutcome::Rejected,
                    index: ArtifactOutcome::Rejected,
                });
                continue;
            }

            let resource = self.fetch_artifact(id, &local_prefix, &remote_prefix, &path)?;
            let index = self.fetch_artifact(
                id,
                &local_prefix,
                &remote_prefix,
                &naming::index_name(&path),
            )?;
            resources.push(ResourceReport {
                path,
                resource,
                index,
            });
        }

        let report = FetchReport {
            identifier: id.clone(),
            descriptor: source,
            resources,
        };
        tracing::info!(
            module = %id,
            fetched = report.fetched_count(),
            missing = report.missing_resources().count(),
            "Module fetch completed"
        );
        Ok(Some(report))
    }

    /// Cache one artifact unless it is already present.
    fn fetch_artifact(
        &self,
        id: &ModuleIdentifier,
        local_prefix: &Path,
        remote_prefix: &str,
        name: &str,
    ) -> ResolverResult<ArtifactOutcome> {
        let local = local_prefix.join(name);
        if self.store.exists(&local) {
            return Ok(ArtifactOutcome::AlreadyCached);
        }

        match self.repository.fetch(remote_prefix, name) {
            RemoteFetch::Found(reader) => {
                self.persist(id, reader, &local)?;
                Ok(ArtifactOutcome::Fetched)
            }
            RemoteFetch::NotFound => {
                tracing::debug!(module = %id, artifact = %name, "Artifact not in repository");
                Ok(ArtifactOutcome::NotFound)
            }
            RemoteFetch::Unavailable(reason) => {
                tracing::warn!(module = %id, artifact = %name, reason = %reason, "Skipping unavailable artifact");
                Ok(ArtifactOutcome::TransportFailed(reason))
            }
        }
    }

    fn persist(
        &self,
        id: &ModuleIdentifier,
        reader: Box<dyn Read + Send>,
        name: &Path,
    ) -> ResolverResult<()> {
        self.store
            .write(reader, name)
            .map(|_| ())
            .map_err(|err| match err {
                CacheError::Source { path, source } => ModuleLoadError::Transfer {
                    identifier: id.clone(),
                    path,
                    source,
                },
                source => ModuleLoadError::Persist {
                    identifier: id.clone(),
                    source,
                },
            })
    }

    fn open_descriptor(&self, id: &ModuleIdentifier, name: &Path) -> ResolverResult<File> {
        let path = self.store.path_of(name);
        File::open(&path).map_err(|source| ModuleLoadError::Read {
            identifier: id.clone(),
            path,
            source,
        })
    }

    fn flight_lock(&self, id: &ModuleIdentifier) -> Arc<Mutex<()>> {
        self.in_flight.entry(id.clone()).or_default().clone()
    }
}
