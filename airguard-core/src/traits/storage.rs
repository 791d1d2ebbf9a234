//! Key/value blob storage for the reporting baseline

use crate::errors::StorageError;

/// Namespaced key/value blob store
///
/// Modeled on the NVS-style stores of small devices: a blob is addressed by
/// `(namespace, key)` and read into a caller-provided buffer so no allocation
/// is needed.
pub trait BaselineStore {
    /// Read a blob into `buf`
    ///
    /// Returns `Ok(None)` when nothing is stored under the key, otherwise the
    /// blob's full length. A length larger than `buf.len()` means the blob
    /// did not fit and `buf` holds only its prefix.
    fn get(
        &mut self,
        namespace: &str,
        key: &str,
        buf: &mut [u8],
    ) -> Result<Option<usize>, StorageError>;

    /// Store a blob, replacing any previous value
    fn set(&mut self, namespace: &str, key: &str, value: &[u8]) -> Result<(), StorageError>;
}

impl<S: BaselineStore + ?Sized> BaselineStore for &mut S {
    fn get(
        &mut self,
        namespace: &str,
        key: &str,
        buf: &mut [u8],
    ) -> Result<Option<usize>, StorageError> {
        (**self).get(namespace, key, buf)
    }

    fn set(&mut self, namespace: &str, key: &str, value: &[u8]) -> Result<(), StorageError> {
        (**self).set(namespace, key, value)
    }
}
