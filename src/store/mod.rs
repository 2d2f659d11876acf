//! Blob store seam.
//!
//! The pipeline only needs a flat, unversioned key space with put/get/list (plus delete, used to
//! roll back a partially written submission). Concurrent writers race with last-writer-wins
//! semantics; nothing here adds locking.

use thiserror::Error;

pub mod fs;
pub mod memory;

pub use fs::FsBlobStore;
pub use memory::MemoryBlobStore;

/// Convenience result type for blob store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failure talking to a blob store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error on '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid object key '{key}'")]
    InvalidKey { key: String },

    #[error("store unavailable: {message}")]
    Unavailable { message: String },
}

/// Minimal object store interface consumed by the intake pipeline.
pub trait BlobStore: Send + Sync {
    /// Create or overwrite the object at `key`.
    fn put(&self, key: &str, bytes: &[u8]) -> StoreResult<()>;

    /// Fetch an object. `Ok(None)` is the distinguishable not-found outcome.
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Keys starting with `prefix`, sorted.
    fn list(&self, prefix: &str) -> StoreResult<Vec<String>>;

    /// Remove an object. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> StoreResult<()>;
}

impl<S: BlobStore + ?Sized> BlobStore for &S {
    fn put(&self, key: &str, bytes: &[u8]) -> StoreResult<()> {
        (**self).put(key, bytes)
    }

    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn list(&self, prefix: &str) -> StoreResult<Vec<String>> {
        (**self).list(prefix)
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        (**self).delete(key)
    }
}

impl<S: BlobStore + ?Sized> BlobStore for std::sync::Arc<S> {
    fn put(&self, key: &str, bytes: &[u8]) -> StoreResult<()> {
        (**self).put(key, bytes)
    }

    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn list(&self, prefix: &str) -> StoreResult<Vec<String>> {
        (**self).list(prefix)
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        (**self).delete(key)
    }
}
