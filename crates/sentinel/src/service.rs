//! Certificate publication and retrieval.
//!
//! Publishing stores a credential's canonical bytes in the blob store and
//! records the event in the feed. Fetching re-verifies the stored document
//! every time; a stored credential is never trusted because it was stored.

use std::sync::Arc;

use sentinel_core::{Credential, Sha256Hash, VerificationResult};
use sentinel_resolve::{DidKeyResolver, KeyResolver, ResolvingVerifier};
use sentinel_store::{
    BlobStore, ContentId, EventFeed, EventKind, FeedEvent, MemoryBlobStore, SqliteBlobStore,
};
use serde::Serialize;
use serde_json::Value;

use crate::config::SentinelConfig;
use crate::error::{Result, SentinelError};

/// A stored certificate together with a fresh verification of it.
#[derive(Debug, Clone, Serialize)]
pub struct FetchedCertificate {
    pub content_id: ContentId,
    pub document: Value,
    pub verification: VerificationResult,
}

impl FetchedCertificate {
    /// Typed view of the document, if it parses as a credential.
    pub fn credential(&self) -> Option<Credential> {
        serde_json::from_value(self.document.clone()).ok()
    }
}

/// Open the blob store named by the config: SQLite when a path is set,
/// otherwise in memory.
pub fn open_blob_store(config: &SentinelConfig) -> Result<Arc<dyn BlobStore>> {
    Ok(match &config.blob_db_path {
        Some(path) => Arc::new(SqliteBlobStore::open(path)?),
        None => Arc::new(MemoryBlobStore::new()),
    })
}

/// Publishes credentials and serves verified fetches.
pub struct CertificateService<S: BlobStore + ?Sized, R: KeyResolver = DidKeyResolver> {
    store: Arc<S>,
    verifier: ResolvingVerifier<R>,
    feed: EventFeed,
}

impl<S: BlobStore + ?Sized> CertificateService<S, DidKeyResolver> {
    /// Service that authenticates `did:key` issuers only.
    pub fn new(store: Arc<S>, config: &SentinelConfig) -> Self {
        Self::with_resolver(store, DidKeyResolver, config)
    }
}

impl<S: BlobStore + ?Sized, R: KeyResolver> CertificateService<S, R> {
    pub fn with_resolver(store: Arc<S>, resolver: R, config: &SentinelConfig) -> Self {
        Self {
            store,
            verifier: ResolvingVerifier::new(resolver)
                .with_mode(config.trust_mode)
                .with_timeout(config.resolve_timeout()),
            feed: EventFeed::new(config.feed_capacity),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn feed(&self) -> &EventFeed {
        &self.feed
    }

    /// Store a credential's canonical bytes and announce it on the feed.
    pub async fn publish(&self, credential: &Credential) -> Result<ContentId> {
        let bytes = credential.to_canonical_bytes()?;
        let content_id = self.store.put(&bytes).await?;

        self.feed.push(FeedEvent::now(
            content_id,
            credential.trace().model_identity,
            EventKind::Issued,
        ));
        tracing::info!(
            %content_id,
            trace_hash = %credential.trace_hash(),
            "credential published"
        );
        Ok(content_id)
    }

    /// Fetch a stored credential and verify it.
    ///
    /// Verification failures are reported in the result, not as errors.
    /// Errors mean the blob is missing, corrupted in storage, or not JSON.
    pub async fn fetch_and_verify(&self, content_id: &ContentId) -> Result<FetchedCertificate> {
        let bytes = self
            .store
            .get(content_id)
            .await?
            .ok_or(SentinelError::NotFound(*content_id))?;

        let verification = self.verifier.verify_bytes(&bytes).await;
        let document: Value = serde_json::from_slice(&bytes)
            .map_err(|e| SentinelError::InvalidDocument(e.to_string()))?;

        if let Some(model_identity) = model_identity_of(&document) {
            let kind = if verification.valid {
                EventKind::Verified
            } else {
                EventKind::Rejected
            };
            self.feed.push(FeedEvent::now(*content_id, model_identity, kind));
        }

        Ok(FetchedCertificate {
            content_id: *content_id,
            document,
            verification,
        })
    }

    /// Snapshot of the feed, newest first.
    pub fn recent_events(&self) -> Vec<FeedEvent> {
        self.feed.recent()
    }
}

fn model_identity_of(document: &Value) -> Option<Sha256Hash> {
    let hex = document
        .pointer("/credentialSubject/executionTrace/model_identity")?
        .as_str()?;
    Sha256Hash::from_hex(hex).ok()
}
