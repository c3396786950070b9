//! Local artifact cache.
//!
//! A filesystem directory holding descriptors, resources and index sidecars
//! laid out by [`crate::naming`]. Presence of a file is the only state: there
//! is no manifest, and an entry is never updated or evicted once written.
//!
//! # Directory structure
//!
//! ```text
//! <cache_root>/
//! └── org/example/foo/main/
//!     ├── module.xml
//!     ├── foo.jar
//!     └── foo.jar.index
//! ```
//!
//! Writes land in a temporary file next to the target and are renamed into
//! place, so a partially written artifact is never observed as present.

mod store;

pub use store::LocalCacheStore;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The configured root cannot hold a cache.
    #[error("invalid cache root {}: {reason}", path.display())]
    InvalidRoot { path: PathBuf, reason: String },

    /// Failed to create a directory.
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write an artifact.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The source stream failed while its content was being copied.
    #[error("failed to read source for {}: {source}", path.display())]
    Source {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to open an artifact for reading.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
