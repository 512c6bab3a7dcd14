//! # Sentinel Store
//!
//! Persistence for Sentinel: content-addressed credential blobs, the
//! issuer's private key, and a bounded feed of recent events.
//!
//! ## Key Types
//!
//! - [`BlobStore`] - Async content-addressed storage trait
//! - [`SqliteBlobStore`] - SQLite-backed blob store
//! - [`MemoryBlobStore`] - In-memory blob store for tests
//! - [`ContentId`] - CIDv1 (raw, sha2-256) of stored bytes
//! - [`FileKeyStore`] - Key file with atomic writes and a creation lock
//! - [`EventFeed`] - Ring buffer of recent events
//!
//! ## Design Notes
//!
//! - **Idempotent puts**: the same bytes always map to the same id
//! - **Verified reads**: `get` re-hashes content and reports corruption

pub mod error;
pub mod feed;
pub mod keystore;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use feed::{EventFeed, EventKind, FeedEvent, DEFAULT_FEED_CAPACITY};
pub use keystore::{FileKeyStore, KeyLock, KeyStore};
pub use memory::MemoryBlobStore;
pub use sqlite::SqliteBlobStore;
pub use traits::{BlobStore, ContentId};
