//! In-memory implementation of the BlobStore trait.
//!
//! Same semantics as SQLite, nothing persisted. Primarily for tests and
//! for running the service without a database.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{Result, StoreError};
use crate::traits::{check_content, BlobStore, ContentId};

/// In-memory blob store. Thread-safe via RwLock.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<ContentId, Vec<u8>>>,
}

impl MemoryBlobStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the bytes held under `id` without re-addressing them.
    #[cfg(test)]
    pub(crate) fn overwrite(&self, id: &ContentId, bytes: Vec<u8>) {
        if let Ok(mut blobs) = self.blobs.write() {
            blobs.insert(*id, bytes);
        }
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StoreError {
    StoreError::Lock(format!("memory store lock poisoned: {}", e))
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, bytes: &[u8]) -> Result<ContentId> {
        let id = ContentId::for_bytes(bytes);
        let mut blobs = self.blobs.write().map_err(poisoned)?;
        blobs.entry(id).or_insert_with(|| bytes.to_vec());
        Ok(id)
    }

    async fn get(&self, id: &ContentId) -> Result<Option<Vec<u8>>> {
        let stored = {
            let blobs = self.blobs.read().map_err(poisoned)?;
            blobs.get(id).cloned()
        };
        stored.map(|bytes| check_content(id, bytes)).transpose()
    }

    async fn has(&self, id: &ContentId) -> Result<bool> {
        let blobs = self.blobs.read().map_err(poisoned)?;
        Ok(blobs.contains_key(id))
    }

    async fn count(&self) -> Result<u64> {
        let blobs = self.blobs.read().map_err(poisoned)?;
        Ok(blobs.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get() {
        let store = MemoryBlobStore::new();
        let id = store.put(b"hello").await.unwrap();

        assert_eq!(id, ContentId::for_bytes(b"hello"));
        assert_eq!(store.get(&id).await.unwrap().unwrap(), b"hello");
        assert!(store.has(&id).await.unwrap());
    }

    #[tokio::test]
    async fn test_put_idempotent() {
        let store = MemoryBlobStore::new();
        let a = store.put(b"same").await.unwrap();
        let b = store.put(b"same").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_missing_blob() {
        let store = MemoryBlobStore::new();
        let id = ContentId::for_bytes(b"never stored");
        assert!(store.get(&id).await.unwrap().is_none());
        assert!(!store.has(&id).await.unwrap());
    }

    #[tokio::test]
    async fn test_corrupted_blob_is_reported() {
        let store = MemoryBlobStore::new();
        let id = store.put(b"original").await.unwrap();
        store.overwrite(&id, b"tampered".to_vec());

        let err = store.get(&id).await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupted { .. }));
    }
}
