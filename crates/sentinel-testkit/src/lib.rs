//! # Sentinel Testkit
//!
//! Testing utilities for Sentinel.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Canonical encodings, trace hashes and `did:key`
//!   identifiers with expected values, for cross-implementation checks
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Seeded issuers with in-memory stores
//!
//! ## Golden Vectors
//!
//! ```rust
//! use sentinel_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, actual) in verify_all_vectors() {
//!     assert!(matches, "{}: {}", name, actual);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use sentinel_testkit::generators::{trace_from_params, TraceParams};
//!
//! proptest! {
//!     #[test]
//!     fn trace_hash_is_deterministic(params: TraceParams) {
//!         let t1 = trace_from_params(&params);
//!         let t2 = trace_from_params(&params);
//!         prop_assert_eq!(t1.hash().unwrap(), t2.hash().unwrap());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use sentinel_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::with_seed([7; 32]);
//! let credential = fixture.issue_input(r#"{"score": 750}"#);
//! assert_eq!(credential.issuer, fixture.did());
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{demo_privacy_rules, multi_issuer_fixtures, TestFixture};
pub use generators::{trace_from_params, TraceParams};
pub use vectors::{all_vectors, trace_vectors, verify_all_vectors, GoldenVector, TraceVector};
