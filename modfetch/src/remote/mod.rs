//! Remote module repository access.
//!
//! A repository serves module artifacts at
//! `<root_url><version_tag>/<name segments>/<slot>/<resource>`. Callers hand
//! in the composed module prefix (see [`crate::naming::remote_path`]) and a
//! resource name; the repository never raises, it reports every outcome as a
//! [`RemoteFetch`].
//!
//! # Architecture
//!
//! ```text
//! RemoteRepository (trait)
//!         │
//!         └── HttpRepository (blocking reqwest client)
//!                 │
//!                 └── RetryPolicy (bounded exponential backoff)
//! ```

mod http;
mod retry;

pub use http::{HttpRepository, DEFAULT_TIMEOUT_SECS};
pub use retry::RetryPolicy;

use std::fmt;
use std::io::Read;

/// Outcome of a single remote fetch.
pub enum RemoteFetch {
    /// The artifact exists; its content is streamed from the reader.
    Found(Box<dyn Read + Send>),

    /// The repository answered that the artifact does not exist.
    NotFound,

    /// The repository could not be reached or returned an error.
    Unavailable(String),
}

impl RemoteFetch {
    /// Collapse to the "present or absent" view.
    pub fn into_reader(self) -> Option<Box<dyn Read + Send>> {
        match self {
            Self::Found(reader) => Some(reader),
            Self::NotFound | Self::Unavailable(_) => None,
        }
    }

    /// Whether the artifact was found.
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

impl fmt::Debug for RemoteFetch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found(_) => f.write_str("Found(..)"),
            Self::NotFound => f.write_str("NotFound"),
            Self::Unavailable(reason) => f.debug_tuple("Unavailable").field(reason).finish(),
        }
    }
}

/// Source of module artifacts.
///
/// Implementations must be `Send + Sync` so one repository can back
/// resolutions running on several threads.
pub trait RemoteRepository: Send + Sync {
    /// Fetch `resource` under the module prefix `remote_prefix`.
    ///
    /// Blocks until the content is available or the attempt fails. Failure
    /// of any kind is reported through the returned value, never by
    /// panicking.
    fn fetch(&self, remote_prefix: &str, resource: &str) -> RemoteFetch;

    /// Human-readable description of the repository, used in logs.
    fn describe(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_into_reader() {
        let found = RemoteFetch::Found(Box::new(Cursor::new(b"abc".to_vec())));
        assert!(found.is_found());

        let mut content = String::new();
        found
            .into_reader()
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "abc");

        assert!(RemoteFetch::NotFound.into_reader().is_none());
        assert!(RemoteFetch::Unavailable("down".into()).into_reader().is_none());
    }

    #[test]
    fn test_debug_hides_reader() {
        let found = RemoteFetch::Found(Box::new(Cursor::new(Vec::new())));
        assert_eq!(format!("{:?}", found), "Found(..)");
        assert_eq!(
            format!("{:?}", RemoteFetch::Unavailable("timeout".into())),
            "Unavailable(\"timeout\")"
        );
    }
}
