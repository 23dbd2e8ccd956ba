use crate::error::StoreResult;

/// An ordered key-value pair as returned by [`KvStore::scan`].
pub type KvPair = (Vec<u8>, Vec<u8>);

/// Ordered byte-keyed store.
///
/// All implementations must satisfy these invariants:
/// - Keys are compared byte-wise; `scan` yields them in ascending order.
/// - A `put` or `delete` is visible to the next `get` on the same store.
/// - The store never interprets values.
pub trait KvStore: Send + Sync {
    /// Read the raw value for `key`.
    ///
    /// Returns `Ok(None)` if the key is absent. An empty value is a present
    /// key with zero bytes, which is distinct from absence.
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>>;

    /// Write a raw value, replacing any existing one.
    fn put(&self, key: &[u8], value: &[u8]) -> StoreResult<()>;

    /// Delete a key. Returns `true` if the key existed.
    fn delete(&self, key: &[u8]) -> StoreResult<bool>;

    /// All pairs in ascending key order.
    fn scan(&self) -> StoreResult<Vec<KvPair>>;

    /// Number of keys in the store.
    ///
    /// Default implementation counts a full scan. Backends may override.
    fn len(&self) -> StoreResult<usize> {
        Ok(self.scan()?.len())
    }

    /// Returns `true` if the store holds no keys.
    fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}
