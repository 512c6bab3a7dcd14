//! Key resolvers: map an issuer identifier to its Ed25519 public key.

use std::collections::HashMap;

use async_trait::async_trait;
use sentinel_core::did::public_key_from_did_key;
use sentinel_core::{CoreError, PublicKey};

use crate::error::{ResolveError, Result};

/// Resolves issuer identifiers to verification keys.
///
/// Implementations may do network I/O; callers bound them with a timeout.
#[async_trait]
pub trait KeyResolver: Send + Sync {
    async fn resolve(&self, did: &str) -> Result<PublicKey>;
}

/// Resolves `did:key` identifiers by decoding them. No I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct DidKeyResolver;

#[async_trait]
impl KeyResolver for DidKeyResolver {
    async fn resolve(&self, did: &str) -> Result<PublicKey> {
        public_key_from_did_key(did).map_err(|e| match e {
            CoreError::UnsupportedDid(d) => ResolveError::UnsupportedMethod(d),
            other => ResolveError::InvalidKey(other.to_string()),
        })
    }
}

/// Fixed table of identifier to key, for pinned issuers and tests.
///
/// Lookups ignore any `#fragment` on the identifier.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    keys: HashMap<String, PublicKey>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, did: impl Into<String>, key: PublicKey) {
        self.keys.insert(did.into(), key);
    }

    pub fn with(mut self, did: impl Into<String>, key: PublicKey) -> Self {
        self.insert(did, key);
        self
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[async_trait]
impl KeyResolver for StaticResolver {
    async fn resolve(&self, did: &str) -> Result<PublicKey> {
        let base = did.split('#').next().unwrap_or(did);
        self.keys
            .get(base)
            .copied()
            .ok_or_else(|| ResolveError::NotFound(base.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_core::Identity;

    #[tokio::test]
    async fn test_did_key_resolves_locally() {
        let identity = Identity::from_seed(&[0x21; 32]);
        let key = DidKeyResolver.resolve(identity.did()).await.unwrap();
        assert_eq!(key, identity.public_key());
    }

    #[tokio::test]
    async fn test_did_key_rejects_other_methods() {
        let err = DidKeyResolver.resolve("did:web:example.com").await.unwrap_err();
        assert!(matches!(err, ResolveError::UnsupportedMethod(_)));
    }

    #[tokio::test]
    async fn test_did_key_rejects_garbage_key() {
        let err = DidKeyResolver.resolve("did:key:z111").await.unwrap_err();
        assert!(matches!(err, ResolveError::InvalidKey(_)));
    }

    #[tokio::test]
    async fn test_static_resolver() {
        let identity = Identity::from_seed(&[0x22; 32]);
        let resolver = StaticResolver::new().with("did:web:issuer.example", identity.public_key());

        assert_eq!(
            resolver.resolve("did:web:issuer.example#keys-1").await.unwrap(),
            identity.public_key()
        );
        assert!(matches!(
            resolver.resolve("did:web:other.example").await,
            Err(ResolveError::NotFound(_))
        ));
    }
}
