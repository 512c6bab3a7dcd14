//! Error types for issuer key resolution.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while resolving an issuer's key.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The resolver does not handle this DID method.
    #[error("unsupported DID method: {0}")]
    UnsupportedMethod(String),

    /// No key is known for this identifier.
    #[error("issuer not found: {0}")]
    NotFound(String),

    /// The identifier or the document behind it carries an unusable key.
    #[error("invalid issuer key: {0}")]
    InvalidKey(String),

    /// Resolution did not finish in time.
    #[error("resolution of {did} timed out after {after:?}")]
    Timeout { did: String, after: Duration },

    /// Backend lookup failed.
    #[error("lookup failed: {0}")]
    Lookup(String),
}

/// Result type for resolution.
pub type Result<T> = std::result::Result<T, ResolveError>;
