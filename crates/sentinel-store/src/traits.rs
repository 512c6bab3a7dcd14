//! Blob store trait: content-addressed persistence for credentials.
//!
//! Implementations include SQLite (primary) and in-memory (for tests).

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use sentinel_core::Sha256Hash;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Result, StoreError};

/// Content id of a stored blob: CIDv1, raw codec, sha2-256, base32.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentId(Sha256Hash);

impl ContentId {
    /// Content id of `bytes`.
    pub fn for_bytes(bytes: &[u8]) -> Self {
        Self(Sha256Hash::hash(bytes))
    }

    pub const fn from_digest(digest: Sha256Hash) -> Self {
        Self(digest)
    }

    /// The SHA-256 digest inside the CID.
    pub fn digest(&self) -> &Sha256Hash {
        &self.0
    }

    /// True when `bytes` hash to this id.
    pub fn matches(&self, bytes: &[u8]) -> bool {
        Sha256Hash::hash(bytes) == self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_cid())
    }
}

impl fmt::Debug for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentId({})", self)
    }
}

impl FromStr for ContentId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        Sha256Hash::from_cid(s)
            .map(Self)
            .map_err(|e| StoreError::InvalidContentId(e.to_string()))
    }
}

impl Serialize for ContentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ContentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Async interface for content-addressed blob persistence.
///
/// # Design Notes
///
/// - **Idempotent puts**: storing the same bytes twice yields the same id.
/// - **Verified reads**: `get` re-hashes the stored bytes and returns
///   [`StoreError::Corrupted`] instead of bytes that no longer match.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store bytes, returning their content id.
    async fn put(&self, bytes: &[u8]) -> Result<ContentId>;

    /// Fetch bytes by content id.
    async fn get(&self, id: &ContentId) -> Result<Option<Vec<u8>>>;

    /// Check whether a blob exists.
    async fn has(&self, id: &ContentId) -> Result<bool>;

    /// Number of stored blobs.
    async fn count(&self) -> Result<u64>;
}

/// Check fetched bytes against the id they were fetched under.
pub(crate) fn check_content(id: &ContentId, bytes: Vec<u8>) -> Result<Vec<u8>> {
    let actual = Sha256Hash::hash(&bytes);
    if &actual != id.digest() {
        tracing::warn!(content_id = %id, "stored blob failed its content check");
        return Err(StoreError::Corrupted {
            id: id.to_string(),
            actual: actual.to_cid(),
        });
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_id_display_parse() {
        let id = ContentId::for_bytes(b"credential");
        let text = id.to_string();
        assert!(text.starts_with("bafkrei"));
        assert_eq!(text.parse::<ContentId>().unwrap(), id);
    }

    #[test]
    fn test_content_id_rejects_garbage() {
        assert!(matches!(
            "QmNotACid".parse::<ContentId>(),
            Err(StoreError::InvalidContentId(_))
        ));
    }

    #[test]
    fn test_check_content() {
        let id = ContentId::for_bytes(b"abc");
        assert!(check_content(&id, b"abc".to_vec()).is_ok());
        assert!(matches!(
            check_content(&id, b"abd".to_vec()),
            Err(StoreError::Corrupted { .. })
        ));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_any_digest_survives_text_form(digest in any::<[u8; 32]>()) {
                let id = ContentId::from_digest(Sha256Hash::from_bytes(digest));
                prop_assert_eq!(id.to_string().parse::<ContentId>().unwrap(), id);
            }

            #[test]
            fn test_content_check_rejects_any_other_bytes(
                a in prop::collection::vec(any::<u8>(), 0..256),
                b in prop::collection::vec(any::<u8>(), 0..256),
            ) {
                prop_assume!(a != b);
                let id = ContentId::for_bytes(&a);
                prop_assert!(check_content(&id, b).is_err());
            }
        }
    }
}
