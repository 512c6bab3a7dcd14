//! SQLite implementation of the BlobStore trait.
//!
//! The primary persistent backend. Uses rusqlite with bundled SQLite,
//! wrapped in async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{check_content, BlobStore, ContentId};

/// SQLite-based blob store.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
#[derive(Clone)]
pub struct SqliteBlobStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteBlobStore {
    /// Open a database at the given path, creating and migrating it if needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        tracing::debug!(path = %path.display(), "opened blob store");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    async fn blocking<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| StoreError::Lock(format!("mutex poisoned: {}", e)))?;
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Task(format!("spawn_blocking failed: {}", e)))?
    }
}

#[async_trait]
impl BlobStore for SqliteBlobStore {
    async fn put(&self, bytes: &[u8]) -> Result<ContentId> {
        let id = ContentId::for_bytes(bytes);
        let content = bytes.to_vec();

        self.blocking(move |conn| {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO blobs (content_id, digest, content, size, stored_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    id.to_string(),
                    id.digest().as_bytes().as_slice(),
                    content.as_slice(),
                    content.len() as i64,
                    chrono::Utc::now().timestamp_millis(),
                ],
            )?;
            if inserted == 0 {
                tracing::trace!(content_id = %id, "blob already stored");
            }
            Ok(id)
        })
        .await
    }

    async fn get(&self, id: &ContentId) -> Result<Option<Vec<u8>>> {
        let id = *id;

        let stored: Option<Vec<u8>> = self
            .blocking(move |conn| {
                conn.query_row(
                    "SELECT content FROM blobs WHERE content_id = ?1",
                    params![id.to_string()],
                    |row| row.get(0),
                )
                .optional()
                .map_err(StoreError::from)
            })
            .await?;

        stored.map(|bytes| check_content(&id, bytes)).transpose()
    }

    async fn has(&self, id: &ContentId) -> Result<bool> {
        let id = *id;

        self.blocking(move |conn| {
            let found: Option<i64> = conn
                .query_row(
                    "SELECT 1 FROM blobs WHERE content_id = ?1",
                    params![id.to_string()],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(found.is_some())
        })
        .await
    }

    async fn count(&self) -> Result<u64> {
        self.blocking(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM blobs", [], |row| row.get(0))?;
            Ok(count as u64)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_and_get() {
        let store = SqliteBlobStore::open_memory().unwrap();
        let id = store.put(b"{\"a\":1}").await.unwrap();

        assert_eq!(store.get(&id).await.unwrap().unwrap(), b"{\"a\":1}");
        assert!(store.has(&id).await.unwrap());
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_put_idempotent() {
        let store = SqliteBlobStore::open_memory().unwrap();
        let a = store.put(b"same").await.unwrap();
        let b = store.put(b"same").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_missing_blob() {
        let store = SqliteBlobStore::open_memory().unwrap();
        let id = ContentId::for_bytes(b"absent");
        assert!(store.get(&id).await.unwrap().is_none());
        assert!(!store.has(&id).await.unwrap());
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blobs.db");

        let id = {
            let store = SqliteBlobStore::open(&path).unwrap();
            store.put(b"durable").await.unwrap()
        };

        let store = SqliteBlobStore::open(&path).unwrap();
        assert_eq!(store.get(&id).await.unwrap().unwrap(), b"durable");
    }

    #[tokio::test]
    async fn test_tampered_row_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blobs.db");
        let store = SqliteBlobStore::open(&path).unwrap();
        let id = store.put(b"original").await.unwrap();

        let raw = Connection::open(&path).unwrap();
        raw.execute(
            "UPDATE blobs SET content = ?1 WHERE content_id = ?2",
            params![b"tampered".as_slice(), id.to_string()],
        )
        .unwrap();

        let err = store.get(&id).await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupted { .. }));
    }
}
