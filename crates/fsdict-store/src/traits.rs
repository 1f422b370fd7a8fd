//! The [`FileDictionary`] trait: per-key operations of a file-backed store.

use crate::error::{StoreError, StoreResult};
use crate::route::Route;

/// Key/value operations over a file-backed store.
///
/// Keys are opaque byte strings. Values live in files; [`route`] exposes the
/// file so large values can be streamed instead of loaded whole.
///
/// Implementations provide no isolation between concurrent writers. The
/// store has no way to settle a conflicting write or a missing backing file
/// on the caller's behalf, so every failure is returned as is.
///
/// [`route`]: FileDictionary::route
pub trait FileDictionary {
    /// Whether `key` is stored.
    ///
    /// Requires both an index entry and its backing file. An index entry
    /// without a file counts as absent.
    fn has_key(&self, key: &[u8]) -> StoreResult<bool>;

    /// The entry file for `key`, allocating an index entry if needed.
    ///
    /// Always rewrites the bucket index, even when the key already exists.
    /// The file itself is not created.
    fn route(&self, key: &[u8]) -> StoreResult<Route>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &[u8], value: &[u8]) -> StoreResult<()>;

    /// The value of `key`, or `KeyNotFound`.
    fn get(&self, key: &[u8]) -> StoreResult<Vec<u8>> {
        self.try_get(key)?
            .ok_or_else(|| StoreError::key_not_found(key))
    }

    /// The value of `key`, or `None` if it is not stored.
    fn try_get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>>;

    /// The value of `key`, or `fallback` if it is not stored.
    fn get_or(&self, key: &[u8], fallback: Vec<u8>) -> StoreResult<Vec<u8>> {
        Ok(self.try_get(key)?.unwrap_or(fallback))
    }

    /// Remove `key` and return its value, or `KeyNotFound`.
    fn pop(&self, key: &[u8]) -> StoreResult<Vec<u8>> {
        let value = self.get(key)?;
        self.delete(key)?;
        Ok(value)
    }

    /// Remove `key` and return its value, or `fallback` if it is not stored.
    fn pop_or(&self, key: &[u8], fallback: Vec<u8>) -> StoreResult<Vec<u8>> {
        if !self.has_key(key)? {
            return Ok(fallback);
        }
        self.pop(key)
    }

    /// Remove `key` and its entry file.
    ///
    /// Fails with a not-found error when the bucket has no index, the key is
    /// not indexed, or the entry file is missing. In the last case the index
    /// entry has already been removed when the error is returned.
    fn delete(&self, key: &[u8]) -> StoreResult<()>;

    /// Delete everything and reinitialize with the same addressing.
    fn clear(&self) -> StoreResult<()>;

    /// Store every `(key, value)` pair.
    fn update<I, K, V>(&self, items: I) -> StoreResult<()>
    where
        Self: Sized,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<[u8]>,
        V: AsRef<[u8]>,
    {
        for (key, value) in items {
            self.set(key.as_ref(), value.as_ref())?;
        }
        Ok(())
    }
}
