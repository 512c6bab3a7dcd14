//! Error types for the Sentinel core.

use thiserror::Error;

/// Core errors from key handling, identifiers and encoding.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("unsupported DID: {0}")]
    UnsupportedDid(String),

    #[error("malformed DID: {0}")]
    MalformedDid(String),

    #[error("invalid hash: {0}")]
    InvalidHash(String),

    #[error("canonicalization failed: {0}")]
    Canonical(#[from] CanonicalError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from canonical encoding.
#[derive(Debug, Error)]
pub enum CanonicalError {
    /// Only integers are representable; floats have no single canonical form.
    #[error("unsupported number {0}: only integers can be canonicalized")]
    UnsupportedNumber(String),

    #[error("record is not serializable: {0}")]
    Serialize(String),
}

/// Errors raised while constructing a policy.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    #[error("unrecognized privacy rule key: {0}")]
    UnknownRuleKey(String),

    #[error("privacy rule {key} has an empty attribute name")]
    EmptyAttribute { key: String },

    #[error("duplicate privacy rule for attribute {0}")]
    DuplicateAttribute(String),

    #[error("max_input_length must be greater than zero")]
    ZeroInputLength,
}

/// A pre-execution policy check failed. Execution must not proceed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PolicyViolation {
    #[error("model {model_identity} is not allowed by policy")]
    ModelNotAllowed { model_identity: String },

    #[error("input length {length} exceeds limit of {max}")]
    InputTooLong { length: usize, max: usize },

    #[error("module {module} is not allowed by policy")]
    ModuleNotAllowed { module: String },
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
