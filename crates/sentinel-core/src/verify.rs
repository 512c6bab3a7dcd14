//! Credential verification.
//!
//! Checks run in order and stop at the first failure:
//!
//! 1. structure: trace and trace hash present, subject id and verification
//!    method consistent with them ([`VerificationReason::Malformed`]);
//! 2. integrity: the trace re-hashes to the stated hash
//!    ([`VerificationReason::TraceTampered`]);
//! 3. authenticity: the proof signature validates under the issuer's key
//!    ([`VerificationReason::SignatureInvalid`], or
//!    [`VerificationReason::IssuerUnresolvable`] if no key can be obtained).
//!
//! [`TrustMode::IntegrityOnly`] stops after step 2 and never reports
//! [`VerificationReason::Verified`].

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::canonical::{hash_value, sign_message};
use crate::credential::{subject_id_for, Credential, PROOF_TYPE};
use crate::crypto::{PublicKey, Sha256Hash};
use crate::did::public_key_from_did_key;

/// How much a verifier checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustMode {
    /// Structure, integrity and issuer signature.
    #[default]
    Full,
    /// Structure and integrity only. The issuer is not authenticated.
    IntegrityOnly,
}

/// Outcome of verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationReason {
    Verified,
    /// Integrity holds; the signature was not checked.
    IntegrityOnly,
    Malformed,
    TraceTampered,
    SignatureInvalid,
    IssuerUnresolvable,
}

impl VerificationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verified => "verified",
            Self::IntegrityOnly => "integrity_only",
            Self::Malformed => "malformed",
            Self::TraceTampered => "trace_tampered",
            Self::SignatureInvalid => "signature_invalid",
            Self::IssuerUnresolvable => "issuer_unresolvable",
        }
    }
}

impl fmt::Display for VerificationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub valid: bool,
    pub reason: VerificationReason,
    pub mode: TrustMode,
    pub detail: Option<String>,
}

impl VerificationResult {
    /// A passing result for `mode`.
    pub fn passed(mode: TrustMode) -> Self {
        let reason = match mode {
            TrustMode::Full => VerificationReason::Verified,
            TrustMode::IntegrityOnly => VerificationReason::IntegrityOnly,
        };
        Self {
            valid: true,
            reason,
            mode,
            detail: None,
        }
    }

    /// A failing result. Logged at `warn`.
    pub fn failed(reason: VerificationReason, mode: TrustMode, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        tracing::warn!(%reason, %detail, "credential failed verification");
        Self {
            valid: false,
            reason,
            mode,
            detail: Some(detail),
        }
    }

    /// True only for a full, successful verification.
    pub fn is_verified(&self) -> bool {
        self.valid && self.reason == VerificationReason::Verified
    }
}

/// Verifies credentials whose issuer key can be derived locally.
///
/// `did:key` issuers are self-certifying. Any other DID method yields
/// [`VerificationReason::IssuerUnresolvable`]; use a resolving verifier
/// for those.
#[derive(Debug, Clone, Copy, Default)]
pub struct Verifier {
    mode: TrustMode,
}

impl Verifier {
    pub fn new(mode: TrustMode) -> Self {
        Self { mode }
    }

    /// Verifier that never checks signatures.
    pub fn integrity_only() -> Self {
        Self::new(TrustMode::IntegrityOnly)
    }

    pub fn mode(&self) -> TrustMode {
        self.mode
    }

    /// Verify a typed credential.
    pub fn verify(&self, credential: &Credential) -> VerificationResult {
        if let Err(failure) = self.check_integrity(credential) {
            return failure;
        }
        if self.mode == TrustMode::IntegrityOnly {
            return VerificationResult::passed(self.mode);
        }

        match public_key_from_did_key(&credential.issuer) {
            Ok(key) => self.check_signature(credential, &key),
            Err(e) => self.fail(VerificationReason::IssuerUnresolvable, e.to_string()),
        }
    }

    /// Verify a raw JSON document.
    ///
    /// Structure and integrity are checked against the document itself, so
    /// a missing `traceHash` is reported as malformed and fields unknown to
    /// [`Credential`] still count towards the trace hash.
    pub fn verify_document(&self, document: &Value) -> VerificationResult {
        match self.parse_document(document) {
            Ok(credential) => self.verify(&credential),
            Err(failure) => failure,
        }
    }

    /// Verify serialized JSON bytes.
    pub fn verify_bytes(&self, bytes: &[u8]) -> VerificationResult {
        match self.parse_bytes(bytes) {
            Ok(credential) => self.verify(&credential),
            Err(failure) => failure,
        }
    }

    /// Parse bytes into a credential, running the document-level checks.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Credential, VerificationResult> {
        let document: Value = serde_json::from_slice(bytes)
            .map_err(|e| self.fail(VerificationReason::Malformed, format!("not JSON: {}", e)))?;
        self.parse_document(&document)
    }

    /// Parse a document into a credential, running the integrity check over
    /// the raw trace before any typed parsing.
    ///
    /// A trace edit that no longer deserializes still fails as
    /// [`VerificationReason::TraceTampered`], since the stated hash cannot
    /// match it. `Malformed` is left for a missing or unreadable envelope.
    pub fn parse_document(&self, document: &Value) -> Result<Credential, VerificationResult> {
        let subject = document
            .get("credentialSubject")
            .and_then(Value::as_object)
            .ok_or_else(|| self.fail(VerificationReason::Malformed, "missing credentialSubject"))?;
        let raw_trace = subject
            .get("executionTrace")
            .filter(|t| t.is_object())
            .ok_or_else(|| self.fail(VerificationReason::Malformed, "missing executionTrace"))?;
        let stated = subject
            .get("traceHash")
            .and_then(Value::as_str)
            .ok_or_else(|| self.fail(VerificationReason::Malformed, "missing traceHash"))?;
        let stated = Sha256Hash::from_hex(stated)
            .map_err(|e| self.fail(VerificationReason::Malformed, e.to_string()))?;

        // Issued traces always canonicalize, so one that does not was edited.
        let recomputed = hash_value(raw_trace).map_err(|e| {
            self.fail(
                VerificationReason::TraceTampered,
                format!("trace does not canonicalize: {}", e),
            )
        })?;
        if recomputed != stated {
            return Err(self.tampered(&stated, &recomputed));
        }

        let credential: Credential = serde_json::from_value(document.clone())
            .map_err(|e| self.fail(VerificationReason::Malformed, e.to_string()))?;
        self.check_structure(&credential)?;

        Ok(credential)
    }

    /// Steps 1 and 2 on a typed credential.
    pub fn check_integrity(&self, credential: &Credential) -> Result<(), VerificationResult> {
        self.check_structure(credential)?;

        let recomputed = credential
            .trace()
            .hash()
            .map_err(|e| self.fail(VerificationReason::Malformed, e.to_string()))?;
        if &recomputed != credential.trace_hash() {
            return Err(self.tampered(credential.trace_hash(), &recomputed));
        }
        Ok(())
    }

    /// Step 3 with an already-resolved issuer key.
    pub fn check_signature(&self, credential: &Credential, key: &PublicKey) -> VerificationResult {
        let signature = match credential.signature() {
            Ok(sig) => sig,
            Err(e) => return self.fail(VerificationReason::SignatureInvalid, e.to_string()),
        };
        let payload = match credential.signing_bytes() {
            Ok(bytes) => bytes,
            Err(e) => return self.fail(VerificationReason::Malformed, e.to_string()),
        };

        match key.verify(&sign_message(&payload), &signature) {
            Ok(()) => VerificationResult::passed(self.mode),
            Err(_) => self.fail(
                VerificationReason::SignatureInvalid,
                format!("signature does not verify for {}", credential.issuer),
            ),
        }
    }

    fn check_structure(&self, credential: &Credential) -> Result<(), VerificationResult> {
        if credential.subject_id() != subject_id_for(credential.trace_hash()) {
            return Err(self.fail(
                VerificationReason::Malformed,
                "subject id does not match traceHash",
            ));
        }
        if credential.proof.proof_type != PROOF_TYPE {
            return Err(self.fail(
                VerificationReason::Malformed,
                format!("unsupported proof type {}", credential.proof.proof_type),
            ));
        }
        let method_owner = credential
            .proof
            .verification_method
            .split('#')
            .next()
            .unwrap_or_default();
        if method_owner != credential.issuer {
            return Err(self.fail(
                VerificationReason::Malformed,
                "verificationMethod does not belong to issuer",
            ));
        }
        Ok(())
    }

    fn tampered(&self, stated: &Sha256Hash, recomputed: &Sha256Hash) -> VerificationResult {
        self.fail(
            VerificationReason::TraceTampered,
            format!("traceHash {} but trace hashes to {}", stated, recomputed),
        )
    }

    fn fail(&self, reason: VerificationReason, detail: impl Into<String>) -> VerificationResult {
        VerificationResult::failed(reason, self.mode, detail)
    }
}
