//! Key/value blob stores
//!
//! [`FileBaselineStore`] keeps one file per key under a root directory:
//!
//! ```text
//! <root>/
//! └── airguard/          namespace
//!     └── last_pub.bin   key
//! ```
//!
//! Writes go to a temporary sibling first and are renamed into place, so a
//! power cut leaves either the old blob or the new one, never a torn file.
//!
//! [`MemoryStore`] is the volatile variant for hosts that do not need the
//! baseline to survive a restart.

use std::collections::HashMap;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use airguard_core::{BaselineStore, StorageError};
use thiserror::Error;

/// File store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Namespace or key would escape the store directory
    #[error("Invalid store name {0:?}")]
    InvalidName(String),

    /// Filesystem failure
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: io::Error,
    },
}

fn validate_name(name: &str) -> Result<(), StoreError> {
    let valid = !name.is_empty()
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidName(name.to_string()))
    }
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> StoreError {
    let path = path.to_path_buf();
    move |source| StoreError::Io { path, source }
}

/// Blob store backed by a directory tree
#[derive(Debug, Clone)]
pub struct FileBaselineStore {
    root: PathBuf,
}

impl FileBaselineStore {
    /// Store rooted at `root`; directories are created on first write
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file holding `(namespace, key)`
    pub fn blob_path(&self, namespace: &str, key: &str) -> Result<PathBuf, StoreError> {
        validate_name(namespace)?;
        validate_name(key)?;
        Ok(self.root.join(namespace).join(format!("{key}.bin")))
    }

    /// Read a blob; `None` when it does not exist
    pub fn read_blob(&self, namespace: &str, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.blob_path(namespace, key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    /// Replace a blob atomically
    pub fn write_blob(&self, namespace: &str, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let path = self.blob_path(namespace, key)?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(io_error(dir))?;
        }

        let tmp = path.with_extension("bin.tmp");
        fs::write(&tmp, value).map_err(io_error(&tmp))?;
        fs::rename(&tmp, &path).map_err(io_error(&path))?;

        log::debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    /// Remove a blob; missing blobs are not an error
    pub fn remove_blob(&self, namespace: &str, key: &str) -> Result<(), StoreError> {
        let path = self.blob_path(namespace, key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }
}

impl BaselineStore for FileBaselineStore {
    fn get(
        &mut self,
        namespace: &str,
        key: &str,
        buf: &mut [u8],
    ) -> Result<Option<usize>, StorageError> {
        match self.read_blob(namespace, key) {
            Ok(blob) => Ok(blob.map(|bytes| copy_prefix(&bytes, buf))),
            Err(err) => {
                log::warn!("Blob read failed: {err}");
                Err(StorageError::ReadFailed { reason: "file store read failed" })
            }
        }
    }

    fn set(&mut self, namespace: &str, key: &str, value: &[u8]) -> Result<(), StorageError> {
        self.write_blob(namespace, key, value).map_err(|err| {
            log::warn!("Blob write failed: {err}");
            StorageError::WriteFailed { reason: "file store write failed" }
        })
    }
}

/// Copy as much of `blob` as fits and return the blob's full length
fn copy_prefix(blob: &[u8], buf: &mut [u8]) -> usize {
    let n = blob.len().min(buf.len());
    buf[..n].copy_from_slice(&blob[..n]);
    blob.len()
}

/// Volatile blob store
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    blobs: HashMap<(String, String), Vec<u8>>,
}

impl MemoryStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored blob, if any
    pub fn blob(&self, namespace: &str, key: &str) -> Option<&[u8]> {
        self.blobs
            .get(&(namespace.to_string(), key.to_string()))
            .map(Vec::as_slice)
    }
}

impl BaselineStore for MemoryStore {
    fn get(
        &mut self,
        namespace: &str,
        key: &str,
        buf: &mut [u8],
    ) -> Result<Option<usize>, StorageError> {
        Ok(self.blob(namespace, key).map(|bytes| copy_prefix(bytes, buf)))
    }

    fn set(&mut self, namespace: &str, key: &str, value: &[u8]) -> Result<(), StorageError> {
        self.blobs
            .insert((namespace.to_string(), key.to_string()), value.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_path_escapes() {
        let store = FileBaselineStore::new("/tmp/unused");
        assert!(matches!(store.blob_path("..", "k"), Err(StoreError::InvalidName(_))));
        assert!(store.blob_path("ns", "a/b").is_err());
        assert!(store.blob_path("", "k").is_err());
        assert!(store.blob_path("airguard", "last_pub").is_ok());
    }

    #[test]
    fn memory_store_reports_full_length() {
        let mut store = MemoryStore::new();
        store.set("ns", "k", &[1, 2, 3, 4]).unwrap();

        let mut buf = [0u8; 2];
        assert_eq!(store.get("ns", "k", &mut buf).unwrap(), Some(4));
        assert_eq!(buf, [1, 2]);
        assert_eq!(store.get("ns", "other", &mut buf).unwrap(), None);
    }
}
