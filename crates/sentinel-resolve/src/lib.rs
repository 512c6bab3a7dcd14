//! # Sentinel Resolve
//!
//! Issuer key resolution for credential verification.
//!
//! `did:key` issuers are self-certifying and resolve without I/O. Other
//! identifiers go through a [`KeyResolver`], which the
//! [`ResolvingVerifier`] bounds with a timeout. A key that cannot be
//! obtained yields [`sentinel_core::VerificationReason::IssuerUnresolvable`],
//! distinct from a bad signature.
//!
//! ## Key Types
//!
//! - [`KeyResolver`] - Async identifier to key lookup
//! - [`DidKeyResolver`] - Local `did:key` decoding
//! - [`StaticResolver`] - Pinned identifier table
//! - [`ResolvingVerifier`] - Verification with timeout-bounded resolution

pub mod error;
pub mod resolver;
pub mod verifier;

pub use error::{ResolveError, Result};
pub use resolver::{DidKeyResolver, KeyResolver, StaticResolver};
pub use verifier::{ResolvingVerifier, DEFAULT_RESOLVE_TIMEOUT};
