//! Execution trace: the record of one model execution that gets hashed.

use serde::{Deserialize, Serialize};

use crate::canonical;
use crate::crypto::Sha256Hash;
use crate::error::CanonicalError;
use crate::policy::ConstraintPolicy;
use crate::redaction::DisclosureProof;

/// Everything a credential attests about one execution.
///
/// Immutable once built: fields are public for inspection, and any change
/// after issuance is exactly what verification detects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionTrace {
    /// SHA-256 fingerprint of the model artifact.
    pub model_identity: Sha256Hash,
    /// SHA-256 of the raw (unredacted) input.
    pub input_hash: Sha256Hash,
    /// The input as disclosed, possibly redacted.
    pub public_input: String,
    pub disclosure_proofs: Vec<DisclosureProof>,
    pub policy: ConstraintPolicy,
    pub output: String,
    pub duration_ms: u64,
    /// Unix milliseconds at which execution finished.
    pub timestamp: i64,
}

impl ExecutionTrace {
    /// SHA-256 of the canonical encoding of this trace.
    pub fn hash(&self) -> Result<Sha256Hash, CanonicalError> {
        canonical::hash(self)
    }

    /// Canonical bytes of this trace.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, CanonicalError> {
        canonical::canonicalize(self)
    }
}

/// Builder for [`ExecutionTrace`].
#[derive(Debug, Clone)]
pub struct TraceBuilder {
    model_identity: Sha256Hash,
    input_hash: Sha256Hash,
    public_input: String,
    disclosure_proofs: Vec<DisclosureProof>,
    policy: ConstraintPolicy,
    output: String,
    duration_ms: u64,
    timestamp: i64,
}

impl TraceBuilder {
    /// Start a trace for a model and the raw input it received.
    ///
    /// The public input defaults to the raw input.
    pub fn new(model_identity: Sha256Hash, raw_input: &str) -> Self {
        Self {
            model_identity,
            input_hash: Sha256Hash::hash(raw_input.as_bytes()),
            public_input: raw_input.to_string(),
            disclosure_proofs: Vec::new(),
            policy: ConstraintPolicy::default(),
            output: String::new(),
            duration_ms: 0,
            timestamp: 0,
        }
    }

    /// Replace the disclosed input and attach its proofs.
    pub fn disclosure(mut self, public_input: String, proofs: Vec<DisclosureProof>) -> Self {
        self.public_input = public_input;
        self.disclosure_proofs = proofs;
        self
    }

    pub fn policy(mut self, policy: ConstraintPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self
    }

    pub fn duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn build(self) -> ExecutionTrace {
        ExecutionTrace {
            model_identity: self.model_identity,
            input_hash: self.input_hash,
            public_input: self.public_input,
            disclosure_proofs: self.disclosure_proofs,
            policy: self.policy,
            output: self.output,
            duration_ms: self.duration_ms,
            timestamp: self.timestamp,
        }
    }
}
