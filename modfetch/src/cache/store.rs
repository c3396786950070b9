//! Filesystem-backed cache store.

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::CacheError;

const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Cache store rooted at a configured directory.
///
/// All names passed to the store are relative to the root.
#[derive(Debug, Clone)]
pub struct LocalCacheStore {
    root: PathBuf,
}

impl LocalCacheStore {
    /// Create a store rooted at `root`.
    ///
    /// The root does not have to exist yet; it is created on the first
    /// write. It must not be empty, and if it exists it must be a directory.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, CacheError> {
        let root = root.into();

        if root.as_os_str().is_empty() {
            return Err(CacheError::InvalidRoot {
                path: root,
                reason: "path is empty".to_string(),
            });
        }
        if root.exists() && !root.is_dir() {
            return Err(CacheError::InvalidRoot {
                path: root,
                reason: "not a directory".to_string(),
            });
        }

        Ok(Self { root })
    }

    /// Get the cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of a relative name.
    pub fn path_of(&self, name: &Path) -> PathBuf {
        self.root.join(name)
    }

    /// Check whether an artifact is present.
    pub fn exists(&self, name: &Path) -> bool {
        self.path_of(name).is_file()
    }

    /// Open a present artifact for reading.
    pub fn open(&self, name: &Path) -> Result<File, CacheError> {
        let path = self.path_of(name);
        File::open(&path).map_err(|source| CacheError::Read { path, source })
    }

    /// Persist the full content of `reader` under `name`.
    ///
    /// Parent directories are created as needed. Content is streamed into a
    /// temporary file in the destination directory and renamed over the
    /// target once flushed, so readers never see a partial artifact. The
    /// reader is consumed and dropped whether or not the write succeeds.
    ///
    /// Returns the absolute path of the written artifact.
    pub fn write<R: Read>(&self, mut reader: R, name: &Path) -> Result<PathBuf, CacheError> {
        let path = self.path_of(name);
        let parent = path.parent().unwrap_or(&self.root).to_path_buf();

        fs::create_dir_all(&parent).map_err(|source| CacheError::CreateDir {
            path: parent.clone(),
            source,
        })?;

        let write_err = |source: io::Error| CacheError::Write {
            path: path.clone(),
            source,
        };

        tracing::debug!(path = %path.display(), "Saving resource");

        let temp = NamedTempFile::new_in(&parent).map_err(write_err)?;
        let mut writer = BufWriter::new(temp);
        let bytes = copy_stream(&mut reader, &mut writer, &path)?;
        let temp = writer
            .into_inner()
            .map_err(|e| write_err(e.into_error()))?;
        temp.as_file().sync_all().map_err(write_err)?;
        temp.persist(&path).map_err(|e| write_err(e.error))?;

        tracing::debug!(path = %path.display(), bytes, "Resource saved");
        Ok(path)
    }
}

/// Copy `reader` into `writer`, telling source failures apart from write
/// failures.
fn copy_stream<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    path: &Path,
) -> Result<u64, CacheError> {
    let mut buf = vec![0u8; COPY_BUFFER_SIZE];
    let mut total = 0u64;

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => return Ok(total),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(CacheError::Source {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        writer
            .write_all(&buf[..n])
            .map_err(|source| CacheError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        total += n as u64;
    }
}
