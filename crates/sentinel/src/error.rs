//! Error types for the Sentinel API.

use std::path::PathBuf;

use sentinel_core::{CanonicalError, CoreError, PolicyError, PolicyViolation};
use sentinel_resolve::ResolveError;
use sentinel_store::{ContentId, StoreError};
use thiserror::Error;

/// Errors that can occur during Sentinel operations.
#[derive(Debug, Error)]
pub enum SentinelError {
    /// Key, identifier or encoding error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// A record could not be canonicalized.
    #[error("canonicalization error: {0}")]
    Canonical(#[from] CanonicalError),

    /// Policy configuration was rejected.
    #[error("invalid policy: {0}")]
    Policy(#[from] PolicyError),

    /// The execution was refused before the model ran.
    #[error("policy violation: {0}")]
    Violation(#[from] PolicyViolation),

    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Issuer key resolution error.
    #[error("resolution error: {0}")]
    Resolve(#[from] ResolveError),

    /// The issuer key exists but cannot be read or decoded.
    #[error("identity unavailable at {}: {reason}", .path.display())]
    IdentityUnavailable { path: PathBuf, reason: String },

    /// The model file to fingerprint does not exist.
    #[error("model not found at {}", .0.display())]
    ModelNotFound(PathBuf),

    /// The model executor failed.
    #[error("model execution failed: {0}")]
    Executor(#[source] anyhow::Error),

    /// No blob is stored under this id.
    #[error("certificate not found: {0}")]
    NotFound(ContentId),

    /// A stored blob is not a JSON document.
    #[error("stored certificate is not JSON: {0}")]
    InvalidDocument(String),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for Sentinel operations.
pub type Result<T> = std::result::Result<T, SentinelError>;
