//! Verification with issuer key resolution.
//!
//! Wraps the core [`Verifier`]: structure and integrity run synchronously,
//! then the issuer key is obtained (`did:key` locally, anything else through
//! a [`KeyResolver`] bounded by a timeout) and the signature is checked.

use std::time::Duration;

use sentinel_core::did::is_did_key;
use sentinel_core::{
    Credential, PublicKey, TrustMode, VerificationReason, VerificationResult, Verifier,
};
use serde_json::Value;

use crate::error::{ResolveError, Result};
use crate::resolver::{DidKeyResolver, KeyResolver};

/// Default bound on a single key resolution.
pub const DEFAULT_RESOLVE_TIMEOUT: Duration = Duration::from_secs(5);

/// Verifier that can authenticate issuers beyond `did:key`.
pub struct ResolvingVerifier<R: KeyResolver> {
    resolver: R,
    verifier: Verifier,
    timeout: Duration,
}

impl<R: KeyResolver> ResolvingVerifier<R> {
    /// Full-trust verifier with the default timeout.
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            verifier: Verifier::default(),
            timeout: DEFAULT_RESOLVE_TIMEOUT,
        }
    }

    pub fn with_mode(mut self, mode: TrustMode) -> Self {
        self.verifier = Verifier::new(mode);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn mode(&self) -> TrustMode {
        self.verifier.mode()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Obtain the issuer's key. `did:key` never touches the resolver.
    pub async fn resolve_issuer(&self, did: &str) -> Result<PublicKey> {
        if is_did_key(did) {
            return DidKeyResolver.resolve(did).await;
        }

        match tokio::time::timeout(self.timeout, self.resolver.resolve(did)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    issuer = %did,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "issuer key resolution timed out"
                );
                Err(ResolveError::Timeout {
                    did: did.to_string(),
                    after: self.timeout,
                })
            }
        }
    }

    /// Verify a typed credential.
    pub async fn verify(&self, credential: &Credential) -> VerificationResult {
        if let Err(failure) = self.verifier.check_integrity(credential) {
            return failure;
        }
        if self.verifier.mode() == TrustMode::IntegrityOnly {
            return VerificationResult::passed(TrustMode::IntegrityOnly);
        }

        match self.resolve_issuer(&credential.issuer).await {
            Ok(key) => self.verifier.check_signature(credential, &key),
            Err(e) => VerificationResult::failed(
                VerificationReason::IssuerUnresolvable,
                self.verifier.mode(),
                e.to_string(),
            ),
        }
    }

    /// Verify a raw JSON document.
    pub async fn verify_document(&self, document: &Value) -> VerificationResult {
        match self.verifier.parse_document(document) {
            Ok(credential) => self.verify(&credential).await,
            Err(failure) => failure,
        }
    }

    /// Verify serialized JSON bytes.
    pub async fn verify_bytes(&self, bytes: &[u8]) -> VerificationResult {
        match self.verifier.parse_bytes(bytes) {
            Ok(credential) => self.verify(&credential).await,
            Err(failure) => failure,
        }
    }
}
