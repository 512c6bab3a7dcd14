//! # Sentinel Core
//!
//! Pure primitives for Sentinel execution certificates: identities,
//! canonical hashing, constraint policy, redaction, credentials and their
//! verification.
//!
//! This crate performs no storage and no networking. The only I/O is
//! [`Sha256Hash::hash_reader`], which streams whatever reader it is given.
//!
//! ## Key Types
//!
//! - [`Identity`] - Ed25519 signing key bound to its `did:key` identifier
//! - [`ConstraintPolicy`] - Validated per-execution policy
//! - [`ExecutionTrace`] - The hashed record of one execution
//! - [`Credential`] - Signed envelope binding a trace by its hash
//! - [`Verifier`] - Structure, integrity and signature checks
//!
//! ## Canonicalization
//!
//! Everything hashed or signed is encoded as canonical JSON: object keys
//! sorted by byte order, no insignificant whitespace, integers only. See
//! the [`canonical`] module.

pub mod canonical;
pub mod constraints;
pub mod credential;
pub mod crypto;
pub mod did;
pub mod error;
pub mod identity;
pub mod policy;
pub mod redaction;
pub mod trace;
pub mod verify;

pub use canonical::{canonicalize, canonicalize_value, hash_value, SIGN_DOMAIN};
pub use constraints::ConstraintEngine;
pub use credential::{Credential, CredentialSubject, Proof};
pub use crypto::{Keypair, PublicKey, Sha256Hash, Signature};
pub use did::{did_key_from_public_key, public_key_from_did_key};
pub use error::{CanonicalError, CoreError, PolicyError, PolicyViolation};
pub use identity::Identity;
pub use policy::{ConstraintPolicy, ConstraintPolicyBuilder, PrivacyRule, PrivacyRules};
pub use redaction::{DisclosureProof, Redaction, RedactionEngine, REDACTED_SENTINEL};
pub use trace::{ExecutionTrace, TraceBuilder};
pub use verify::{TrustMode, VerificationReason, VerificationResult, Verifier};
