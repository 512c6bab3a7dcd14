//! # Sentinel
//!
//! Signed, tamper-evident execution certificates: a record that a named
//! model processed a given input under a declared policy and produced a
//! given output, with selected attributes redacted but checked.
//!
//! ## Overview
//!
//! - **Identity**: an Ed25519 key persisted once, identified by `did:key`
//! - **Runtime**: validate the policy, run the model, redact, trace, sign
//! - **Certificates**: content-addressed storage, re-verified on every fetch
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sentinel::{
//!     CannedExecutor, CertificateService, ExecutionRequest, IdentityManager, SecureRuntime,
//!     SentinelConfig,
//! };
//!
//! async fn example() -> sentinel::Result<()> {
//!     let config = SentinelConfig::default();
//!     let identity = Arc::new(IdentityManager::new(&config.key_path).load_or_create()?);
//!
//!     let runtime = SecureRuntime::from_model_file("model.bin", CannedExecutor, identity)?;
//!     let credential = runtime.execute(&ExecutionRequest::new("Credit Score: 750"))?;
//!
//!     let service = CertificateService::new(sentinel::open_blob_store(&config)?, &config);
//!     let content_id = service.publish(&credential).await?;
//!     let fetched = service.fetch_and_verify(&content_id).await?;
//!     assert!(fetched.verification.is_verified());
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `sentinel::core` - Canonical hashing, policy, credentials, verification
//! - `sentinel::store` - Blob store, key store, event feed
//! - `sentinel::resolve` - Issuer key resolution

pub mod config;
pub mod error;
pub mod executor;
pub mod identity;
pub mod runtime;
pub mod service;

pub use sentinel_core as core;
pub use sentinel_resolve as resolve;
pub use sentinel_store as store;

pub use config::SentinelConfig;
pub use error::{Result, SentinelError};
pub use executor::{CannedExecutor, ModelExecutor};
pub use identity::{load_or_create, IdentityManager};
pub use runtime::{fingerprint_model, ExecutionRequest, SecureRuntime};
pub use service::{open_blob_store, CertificateService, FetchedCertificate};

pub use sentinel_core::{
    ConstraintPolicy, Credential, ExecutionTrace, Identity, PrivacyRule, PrivacyRules,
    Sha256Hash, TrustMode, VerificationReason, VerificationResult, Verifier,
};
