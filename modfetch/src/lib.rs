//! modfetch - remote-fallback module resolution
//!
//! Resolves a module identifier (`name:slot`) to a descriptor file and its
//! resources. A primary resolver is consulted first; when it has no answer
//! the module is fetched from a remote repository into a local cache, and
//! the primary is asked again.
//!
//! ```text
//! consumer ─▶ RemoteModuleResolver ─▶ primary resolver (hit? done)
//!                     │
//!                     └─ miss ─▶ FetchOrchestrator
//!                                  ├── naming (local / remote paths)
//!                                  ├── RemoteRepository (HTTP)
//!                                  ├── DescriptorParser (module.xml)
//!                                  └── LocalCacheStore (atomic writes)
//! ```
//!
//! # Example
//!
//! ```no_run
//! use modfetch::{ModuleIdentifier, ModuleResolver, RemoteConfig, RemoteModuleResolver};
//!
//! let config = RemoteConfig::new("/var/cache/modules");
//! let resolver = RemoteModuleResolver::from_config(&config)?;
//!
//! let id: ModuleIdentifier = "org.example.foo:main".parse()?;
//! if let Some(descriptor) = resolver.find_module(&id)? {
//!     for resource in descriptor.resource_files() {
//!         println!("{}", resource.display());
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cache;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod fetch;
pub mod identifier;
pub mod naming;
pub mod remote;
pub mod resolver;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cache::{CacheError, LocalCacheStore};
pub use config::{default_config_path, ConfigError, RemoteConfig};
pub use descriptor::{DescriptorParser, ModuleDescriptor, ModuleXmlParser};
pub use error::{ModuleLoadError, ResolverResult};
pub use fetch::{ArtifactOutcome, DescriptorSource, FetchOrchestrator, FetchReport, ResourceReport};
pub use identifier::{IdentifierError, ModuleIdentifier};
pub use remote::{HttpRepository, RemoteFetch, RemoteRepository, RetryPolicy};
pub use resolver::{LocalModuleResolver, ModuleResolver, RemoteModuleResolver, SystemModuleResolver};
