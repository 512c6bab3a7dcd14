//! Execution credentials: signed, hash-anchored envelopes around a trace.
//!
//! Wire shape (field names and nesting are a compatibility surface):
//!
//! ```text
//! {
//!   "@context": [...], "type": [...],
//!   "issuer": "did:key:z6Mk...",
//!   "issuanceDate": "2026-01-14T12:00:00.000Z",
//!   "credentialSubject": { "id": "urn:sha256:<hex>", "executionTrace": {...}, "traceHash": "<hex>" },
//!   "proof": { "type", "created", "verificationMethod", "proofPurpose", "signature" }
//! }
//! ```
//!
//! The signature covers the canonical encoding of everything except the
//! trace body and the signature itself; the trace is bound through
//! `traceHash`.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::canonical::{canonicalize, sign_message};
use crate::crypto::{Sha256Hash, Signature};
use crate::error::{CanonicalError, CoreError};
use crate::identity::Identity;
use crate::trace::ExecutionTrace;

/// JSON-LD context of a W3C verifiable credential.
pub const CREDENTIALS_CONTEXT: &str = "https://www.w3.org/2018/credentials/v1";

/// Credential type tags.
pub const CREDENTIAL_TYPES: [&str; 2] = ["VerifiableCredential", "ExecutionCertificate"];

/// Proof suite name.
pub const PROOF_TYPE: &str = "Ed25519Signature2020";

/// Proof purpose.
pub const PROOF_PURPOSE: &str = "assertionMethod";

/// Prefix of the subject id derived from the trace hash.
pub const SUBJECT_ID_PREFIX: &str = "urn:sha256:";

/// The subject id for a trace hash.
pub fn subject_id_for(trace_hash: &Sha256Hash) -> String {
    format!("{}{}", SUBJECT_ID_PREFIX, trace_hash.to_hex())
}

/// What the credential asserts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSubject {
    pub id: String,
    pub execution_trace: ExecutionTrace,
    pub trace_hash: Sha256Hash,
}

/// Issuer signature and its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    #[serde(rename = "type")]
    pub proof_type: String,
    pub created: String,
    pub verification_method: String,
    pub proof_purpose: String,
    /// Hex-encoded Ed25519 signature.
    pub signature: String,
}

/// A signed execution certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    #[serde(rename = "@context")]
    pub context: Vec<String>,
    #[serde(rename = "type")]
    pub types: Vec<String>,
    pub issuer: String,
    pub issuance_date: String,
    pub credential_subject: CredentialSubject,
    pub proof: Proof,
}

/// The signed portion of a credential.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SigningPayload<'a> {
    #[serde(rename = "@context")]
    context: &'a [String],
    #[serde(rename = "type")]
    types: &'a [String],
    issuer: &'a str,
    issuance_date: &'a str,
    credential_subject: SubjectBinding<'a>,
    proof: ProofOptions<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubjectBinding<'a> {
    id: &'a str,
    trace_hash: &'a Sha256Hash,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProofOptions<'a> {
    #[serde(rename = "type")]
    proof_type: &'a str,
    created: &'a str,
    verification_method: &'a str,
    proof_purpose: &'a str,
}

impl Credential {
    /// Hash, assemble and sign a credential issued now.
    pub fn build(trace: ExecutionTrace, identity: &Identity) -> Result<Self, CanonicalError> {
        Self::build_at(trace, identity, Utc::now())
    }

    /// Hash, assemble and sign a credential with a fixed issuance time.
    pub fn build_at(
        trace: ExecutionTrace,
        identity: &Identity,
        issued_at: DateTime<Utc>,
    ) -> Result<Self, CanonicalError> {
        let trace_hash = trace.hash()?;
        let issuance_date = issued_at.to_rfc3339_opts(SecondsFormat::Millis, true);

        let mut credential = Self {
            context: vec![CREDENTIALS_CONTEXT.to_string()],
            types: CREDENTIAL_TYPES.iter().map(|t| t.to_string()).collect(),
            issuer: identity.did().to_string(),
            issuance_date: issuance_date.clone(),
            credential_subject: CredentialSubject {
                id: subject_id_for(&trace_hash),
                execution_trace: trace,
                trace_hash,
            },
            proof: Proof {
                proof_type: PROOF_TYPE.to_string(),
                created: issuance_date,
                verification_method: identity.verification_method(),
                proof_purpose: PROOF_PURPOSE.to_string(),
                signature: String::new(),
            },
        };

        let message = sign_message(&credential.signing_bytes()?);
        credential.proof.signature = identity.sign(&message).to_hex();

        tracing::debug!(
            issuer = %credential.issuer,
            trace_hash = %credential.credential_subject.trace_hash,
            "credential signed"
        );

        Ok(credential)
    }

    /// Canonical bytes of the signed portion (without domain prefix).
    pub fn signing_bytes(&self) -> Result<Vec<u8>, CanonicalError> {
        canonicalize(&SigningPayload {
            context: &self.context,
            types: &self.types,
            issuer: &self.issuer,
            issuance_date: &self.issuance_date,
            credential_subject: SubjectBinding {
                id: &self.credential_subject.id,
                trace_hash: &self.credential_subject.trace_hash,
            },
            proof: ProofOptions {
                proof_type: &self.proof.proof_type,
                created: &self.proof.created,
                verification_method: &self.proof.verification_method,
                proof_purpose: &self.proof.proof_purpose,
            },
        })
    }

    pub fn trace(&self) -> &ExecutionTrace {
        &self.credential_subject.execution_trace
    }

    pub fn trace_hash(&self) -> &Sha256Hash {
        &self.credential_subject.trace_hash
    }

    pub fn subject_id(&self) -> &str {
        &self.credential_subject.id
    }

    /// Decode the proof signature.
    pub fn signature(&self) -> Result<Signature, CoreError> {
        Signature::from_hex(&self.proof.signature)
    }

    /// Parse the issuance date.
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.issuance_date)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Canonical bytes of the whole credential, as handed to blob storage.
    pub fn to_canonical_bytes(&self) -> Result<Vec<u8>, CanonicalError> {
        canonicalize(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Sha256Hash;
    use crate::trace::TraceBuilder;
    use chrono::TimeZone;

    fn trace() -> ExecutionTrace {
        TraceBuilder::new(Sha256Hash::hash(b"model"), "hello")
            .output("world")
            .duration_ms(5)
            .timestamp(1_736_870_400_000)
            .build()
    }

    fn issued_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 14, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_build_binds_trace_hash() {
        let identity = Identity::from_seed(&[0x42; 32]);
        let t = trace();
        let expected = t.hash().unwrap();
        let credential = Credential::build_at(t, &identity, issued_at()).unwrap();

        assert_eq!(credential.trace_hash(), &expected);
        assert_eq!(credential.subject_id(), subject_id_for(&expected));
        assert_eq!(credential.issuer, identity.did());
        assert_eq!(credential.proof.verification_method, identity.verification_method());
        assert_eq!(credential.issuance_date, "2026-01-14T12:00:00.000Z");
    }

    #[test]
    fn test_signature_covers_signing_bytes() {
        let identity = Identity::from_seed(&[0x42; 32]);
        let credential = Credential::build_at(trace(), &identity, issued_at()).unwrap();

        let message = sign_message(&credential.signing_bytes().unwrap());
        let signature = credential.signature().unwrap();
        identity.public_key().verify(&message, &signature).unwrap();
    }

    #[test]
    fn test_signing_is_deterministic() {
        let identity = Identity::from_seed(&[0x42; 32]);
        let a = Credential::build_at(trace(), &identity, issued_at()).unwrap();
        let b = Credential::build_at(trace(), &identity, issued_at()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_wire_field_names() {
        let identity = Identity::from_seed(&[0x42; 32]);
        let credential = Credential::build_at(trace(), &identity, issued_at()).unwrap();
        let v = serde_json::to_value(&credential).unwrap();

        assert!(v["issuer"].is_string());
        assert!(v["issuanceDate"].is_string());
        assert!(v["credentialSubject"]["id"].is_string());
        assert!(v["credentialSubject"]["executionTrace"].is_object());
        assert!(v["credentialSubject"]["traceHash"].is_string());
        for key in ["type", "created", "verificationMethod", "proofPurpose", "signature"] {
            assert!(v["proof"][key].is_string(), "missing proof.{}", key);
        }
        assert_eq!(v["proof"]["type"], PROOF_TYPE);
    }

    #[test]
    fn test_canonical_bytes_roundtrip() {
        let identity = Identity::from_seed(&[0x42; 32]);
        let credential = Credential::build_at(trace(), &identity, issued_at()).unwrap();
        let bytes = credential.to_canonical_bytes().unwrap();
        let parsed: Credential = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed, credential);
        assert_eq!(parsed.issued_at(), Some(issued_at()));
    }
}
