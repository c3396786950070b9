//! Centralized artifact naming conventions.
//!
//! This module is the single source of truth for where a module's artifacts
//! live, both in the local cache and in the remote repository:
//! - Local module directory (e.g., `org/example/foo/main/`)
//! - Remote module prefix (e.g., `trunk/org/example/foo/main/`)
//! - Index sidecar names (e.g., `foo.jar.index`)
//!
//! The same rule drives both layouts, so a cache existence check and the
//! remote fetch that fills it always target the same relative location.

use std::path::{Component, Path, PathBuf};

use crate::identifier::ModuleIdentifier;

/// File name of a module descriptor.
pub const DESCRIPTOR_NAME: &str = "module.xml";

/// Suffix appended to a resource name to form its index sidecar.
pub const INDEX_SUFFIX: &str = ".index";

/// Relative local directory of a module.
///
/// # Format
///
/// `{name segments}/{slot}/` using the platform path separator.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use modfetch::{naming::local_path, ModuleIdentifier};
///
/// let id = ModuleIdentifier::new("org.example.foo", "main");
/// let expected: PathBuf = ["org", "example", "foo", "main"].iter().collect();
/// assert_eq!(local_path(&id), expected);
/// ```
pub fn local_path(id: &ModuleIdentifier) -> PathBuf {
    let mut path: PathBuf = id.name_segments().collect();
    path.push(id.slot());
    path
}

/// Relative local path of a named artifact inside a module's directory.
pub fn local_file(id: &ModuleIdentifier, name: &str) -> PathBuf {
    local_path(id).join(name)
}

/// Remote prefix of a module in the repository.
///
/// Always `/`-separated since it becomes part of a URL, and always ends
/// with `/` so a resource name can be appended directly.
///
/// # Format
///
/// `{version_tag}/{name segments}/{slot}/`
///
/// # Examples
///
/// ```
/// use modfetch::{naming::remote_path, ModuleIdentifier};
///
/// let id = ModuleIdentifier::new("org.example.foo", "main");
/// assert_eq!(remote_path("trunk", &id), "trunk/org/example/foo/main/");
/// ```
pub fn remote_path(version_tag: &str, id: &ModuleIdentifier) -> String {
    let mut path = String::with_capacity(version_tag.len() + id.name().len() + id.slot().len() + 3);
    path.push_str(version_tag);
    path.push('/');
    for segment in id.name_segments() {
        path.push_str(segment);
        path.push('/');
    }
    path.push_str(id.slot());
    path.push('/');
    path
}

/// Name of the index sidecar for a resource.
///
/// ```
/// use modfetch::naming::index_name;
///
/// assert_eq!(index_name("foo.jar"), "foo.jar.index");
/// ```
pub fn index_name(resource: &str) -> String {
    format!("{}{}", resource, INDEX_SUFFIX)
}

/// Whether a descriptor-declared resource path stays inside the module
/// directory.
///
/// Rejects empty, absolute and parent-relative (`..`) paths, and paths that
/// name a directory rather than a file (`.`, `lib/`).
pub fn is_safe_resource_path(resource: &str) -> bool {
    if resource.starts_with(['/', '\\']) {
        return false;
    }

    // `components()` drops trailing separators and inner `.`, so the last
    // segment is checked on the raw string.
    let file_name = resource.rsplit(['/', '\\']).next().unwrap_or_default();
    if matches!(file_name, "" | "." | "..") {
        return false;
    }

    Path::new(resource)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn id() -> ModuleIdentifier {
        ModuleIdentifier::new("org.example.foo", "main")
    }

    #[test]
    fn test_local_path_components() {
        let components: Vec<_> = local_path(&id())
            .iter()
            .map(|c| c.to_string_lossy().into_owned())
            .collect();
        assert_eq!(components, vec!["org", "example", "foo", "main"]);
    }

    #[test]
    fn test_local_file_appends_name() {
        let expected: PathBuf = ["org", "example", "foo", "main", "module.xml"]
            .iter()
            .collect();
        assert_eq!(local_file(&id(), DESCRIPTOR_NAME), expected);
    }

    #[test]
    fn test_remote_path_has_version_prefix() {
        assert_eq!(remote_path("trunk", &id()), "trunk/org/example/foo/main/");
        assert_eq!(
            remote_path("7.0", &ModuleIdentifier::new("single", "x")),
            "7.0/single/x/"
        );
    }

    #[test]
    fn test_index_name() {
        assert_eq!(index_name("lib/foo.jar"), "lib/foo.jar.index");
    }

    #[test]
    fn test_safe_resource_paths() {
        assert!(is_safe_resource_path("foo.jar"));
        assert!(is_safe_resource_path("lib/foo.jar"));
        assert!(is_safe_resource_path("./foo.jar"));
        assert!(!is_safe_resource_path(""));
        assert!(!is_safe_resource_path("/etc/passwd"));
        assert!(!is_safe_resource_path("../other/foo.jar"));
        assert!(!is_safe_resource_path("lib/../../foo.jar"));
        assert!(!is_safe_resource_path("."));
        assert!(!is_safe_resource_path("./"));
        assert!(!is_safe_resource_path("lib/."));
        assert!(!is_safe_resource_path("foo.jar/"));
        assert!(!is_safe_resource_path("lib\\"));
    }

    proptest! {
        #[test]
        fn prop_remote_path_minus_version_matches_local(
            segments in proptest::collection::vec("[a-z][a-z0-9_]{0,8}", 1..5),
            slot in "[a-z0-9][a-z0-9.]{0,6}",
            version in "[a-z0-9][a-z0-9.]{0,6}",
        ) {
            let id = ModuleIdentifier::new(segments.join("."), slot);
            let remote = remote_path(&version, &id);

            let stripped = remote
                .strip_prefix(&format!("{}/", version))
                .expect("remote path starts with the version tag");
            let remote_parts: Vec<&str> = stripped.trim_end_matches('/').split('/').collect();
            let local_parts: Vec<String> = local_path(&id)
                .iter()
                .map(|c| c.to_string_lossy().into_owned())
                .collect();

            prop_assert_eq!(remote_parts, local_parts);
        }
    }
}
