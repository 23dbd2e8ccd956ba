use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::traits::{KvPair, KvStore};

/// In-memory, `BTreeMap`-based ordered store.
///
/// Intended for tests and embedding. Pairs are held behind a `RwLock` and
/// cloned on read.
pub struct InMemoryKvStore {
    pairs: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
    read_only: bool,
}

impl InMemoryKvStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            pairs: RwLock::new(BTreeMap::new()),
            read_only: false,
        }
    }

    /// Create a store pre-populated with `pairs`.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<Vec<u8>>,
        V: Into<Vec<u8>>,
    {
        let map = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            pairs: RwLock::new(map),
            read_only: false,
        }
    }

    /// Freeze the store: every later `put` or `delete` fails with
    /// [`StoreError::ReadOnly`].
    pub fn into_read_only(self) -> Self {
        Self {
            read_only: true,
            ..self
        }
    }

    /// Remove all pairs from the store.
    pub fn clear(&self) {
        self.pairs.write().expect("lock poisoned").clear();
    }

    /// Copy of the full contents, for assertions.
    pub fn snapshot(&self) -> BTreeMap<Vec<u8>, Vec<u8>> {
        self.pairs.read().expect("lock poisoned").clone()
    }
}

impl Default for InMemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore for InMemoryKvStore {
    fn get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        let map = self.pairs.read().expect("lock poisoned");
        Ok(map.get(key).cloned())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }
        let mut map = self.pairs.write().expect("lock poisoned");
        map.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> StoreResult<bool> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }
        let mut map = self.pairs.write().expect("lock poisoned");
        Ok(map.remove(key).is_some())
    }

    fn scan(&self) -> StoreResult<Vec<KvPair>> {
        let map = self.pairs.read().expect("lock poisoned");
        Ok(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }

    fn len(&self) -> StoreResult<usize> {
        Ok(self.pairs.read().expect("lock poisoned").len())
    }
}

impl std::fmt::Debug for InMemoryKvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.pairs.read().expect("lock poisoned").len();
        f.debug_struct("InMemoryKvStore")
            .field("key_count", &count)
            .field("read_only", &self.read_only)
            .finish()
    }
}
