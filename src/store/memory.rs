//! In-memory blob store for tests and embedding callers.

use std::collections::BTreeMap;
use std::sync::Mutex;

use super::{BlobStore, StoreError, StoreResult};

/// In-process blob store backed by a sorted map.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    objects: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn objects(&self) -> StoreResult<std::sync::MutexGuard<'_, BTreeMap<String, Vec<u8>>>> {
        self.objects.lock().map_err(|_| StoreError::Unavailable {
            message: "memory store lock poisoned".to_string(),
        })
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects().map(|o| o.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BlobStore for MemoryBlobStore {
    fn put(&self, key: &str, bytes: &[u8]) -> StoreResult<()> {
        if key.is_empty() {
            return Err(StoreError::InvalidKey { key: key.to_string() });
        }
        self.objects()?.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.objects()?.get(key).cloned())
    }

    fn list(&self, prefix: &str) -> StoreResult<Vec<String>> {
        Ok(self
            .objects()?
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        self.objects()?.remove(key);
        Ok(())
    }
}
