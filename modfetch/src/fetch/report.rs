//! Per-artifact outcomes of a module fetch.

use std::fmt;

use crate::identifier::ModuleIdentifier;

/// Where the descriptor came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptorSource {
    /// Already present in the local cache; no network access.
    Cached,
    /// Downloaded and persisted during this fetch.
    Fetched,
}

/// What happened to one artifact (a resource or its index sidecar).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactOutcome {
    /// Present in the cache before the fetch.
    AlreadyCached,
    /// Downloaded and persisted.
    Fetched,
    /// The repository does not have it; skipped.
    NotFound,
    /// The repository could not be reached; skipped.
    TransportFailed(String),
    /// The declared path escapes the module directory; skipped.
    Rejected,
}

impl ArtifactOutcome {
    /// Whether the artifact is present in the cache after the fetch.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::AlreadyCached | Self::Fetched)
    }

    /// Whether the artifact was skipped.
    pub fn is_skipped(&self) -> bool {
        !self.is_available()
    }
}

impl fmt::Display for ArtifactOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyCached => write!(f, "cached"),
            Self::Fetched => write!(f, "fetched"),
            Self::NotFound => write!(f, "not found"),
            Self::TransportFailed(reason) => write!(f, "unavailable ({})", reason),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// Outcome for one declared resource and its sidecar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceReport {
    /// Resource path as declared by the descriptor.
    pub path: String,
    /// The resource itself.
    pub resource: ArtifactOutcome,
    /// Its `.index` sidecar.
    pub index: ArtifactOutcome,
}

/// Result of a fetch whose descriptor is available locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchReport {
    /// Fetched module.
    pub identifier: ModuleIdentifier,
    /// Descriptor origin.
    pub descriptor: DescriptorSource,
    /// One entry per declared resource, in descriptor order.
    pub resources: Vec<ResourceReport>,
}

impl FetchReport {
    /// Number of artifacts downloaded by this fetch, descriptor included.
    pub fn fetched_count(&self) -> usize {
        let descriptor = usize::from(self.descriptor == DescriptorSource::Fetched);
        descriptor
            + self
                .resources
                .iter()
                .map(|r| {
                    usize::from(r.resource == ArtifactOutcome::Fetched)
                        + usize::from(r.index == ArtifactOutcome::Fetched)
                })
                .sum::<usize>()
    }

    /// Resources that are not present in the cache after the fetch.
    pub fn missing_resources(&self) -> impl Iterator<Item = &ResourceReport> {
        self.resources.iter().filter(|r| r.resource.is_skipped())
    }

    /// Whether every declared resource is present (sidecars are optional).
    pub fn is_complete(&self) -> bool {
        self.missing_resources().next().is_none()
    }
}
