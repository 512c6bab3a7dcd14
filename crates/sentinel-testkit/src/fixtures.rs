//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use sentinel::{CannedExecutor, CertificateService, SecureRuntime, SentinelConfig};
use sentinel_core::{
    ConstraintPolicy, Credential, ExecutionTrace, Identity, PrivacyRule, PrivacyRules,
    RedactionEngine, Sha256Hash, TraceBuilder,
};
use sentinel_store::MemoryBlobStore;

/// Issuance time used by [`TestFixture::issue`]: 2025-10-09T08:53:20Z.
pub const FIXED_ISSUANCE_MS: i64 = 1_760_000_000_000;

/// Model bytes every fixture runtime is pinned to.
pub const FIXTURE_MODEL: &[u8] = b"sentinel-fixture-model";

/// An issuer identity with an in-memory blob store.
pub struct TestFixture {
    pub identity: Arc<Identity>,
    pub store: Arc<MemoryBlobStore>,
}

impl TestFixture {
    /// Create a new test fixture with a random identity.
    pub fn new() -> Self {
        Self::from_identity(Identity::generate())
    }

    /// Create with a deterministic identity from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self::from_identity(Identity::from_seed(&seed))
    }

    fn from_identity(identity: Identity) -> Self {
        Self {
            identity: Arc::new(identity),
            store: Arc::new(MemoryBlobStore::new()),
        }
    }

    pub fn did(&self) -> &str {
        self.identity.did()
    }

    pub fn model_identity(&self) -> Sha256Hash {
        Sha256Hash::hash(FIXTURE_MODEL)
    }

    /// Runtime pinned to [`FIXTURE_MODEL`] with the canned executor.
    pub fn runtime(&self) -> SecureRuntime<CannedExecutor> {
        SecureRuntime::new(self.model_identity(), CannedExecutor, self.identity.clone())
    }

    /// Certificate service over this fixture's store with default config.
    pub fn service(&self) -> CertificateService<MemoryBlobStore> {
        self.service_with(&SentinelConfig::default())
    }

    pub fn service_with(&self, config: &SentinelConfig) -> CertificateService<MemoryBlobStore> {
        CertificateService::new(self.store.clone(), config)
    }

    /// A trace for `input` with a fixed output, duration and timestamp.
    pub fn sample_trace(&self, input: &str) -> ExecutionTrace {
        self.trace_under(input, ConstraintPolicy::default())
    }

    /// A trace for `input` under `policy`, redacted the way the runtime does it.
    pub fn trace_under(&self, input: &str, policy: ConstraintPolicy) -> ExecutionTrace {
        let redaction = RedactionEngine::new(policy.privacy()).redact(input);
        TraceBuilder::new(self.model_identity(), input)
            .disclosure(redaction.redacted_input, redaction.proofs)
            .policy(policy)
            .output(format!("fixture output for {} bytes", input.len()))
            .duration_ms(7)
            .timestamp(FIXED_ISSUANCE_MS)
            .build()
    }

    /// Sign a trace at [`FIXED_ISSUANCE_MS`].
    pub fn issue(&self, trace: ExecutionTrace) -> Credential {
        Credential::build_at(trace, &self.identity, fixed_issuance())
            .expect("fixture traces are canonicalizable")
    }

    /// Shortcut for `issue(sample_trace(input))`.
    pub fn issue_input(&self, input: &str) -> Credential {
        self.issue(self.sample_trace(input))
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create multiple fixtures with distinct deterministic identities.
pub fn multi_issuer_fixtures(count: usize) -> Vec<TestFixture> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = i as u8;
            seed[31] = 0xee;
            TestFixture::with_seed(seed)
        })
        .collect()
}

/// The privacy rules of the credit-check demo.
pub fn demo_privacy_rules() -> PrivacyRules {
    let mut rules = PrivacyRules::new();
    for (key, bound) in [("min_score", 700), ("min_income", 40_000), ("age_limit", 18)] {
        let rule = PrivacyRule::parse(key, bound).expect("demo rule keys are valid");
        rules.insert(rule).expect("demo rule attributes are distinct");
    }
    rules
}

fn fixed_issuance() -> DateTime<Utc> {
    Utc.timestamp_millis_opt(FIXED_ISSUANCE_MS)
        .single()
        .expect("fixed issuance time is valid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentinel_core::Verifier;

    #[test]
    fn test_seeded_fixture_is_deterministic() {
        let a = TestFixture::with_seed([9; 32]);
        let b = TestFixture::with_seed([9; 32]);
        assert_eq!(a.did(), b.did());
        assert_eq!(a.issue_input("x"), b.issue_input("x"));
    }

    #[test]
    fn test_issued_credential_verifies() {
        let fixture = TestFixture::new();
        let credential = fixture.issue_input("hello");
        assert!(Verifier::default().verify(&credential).is_verified());
        assert_eq!(
            credential.issued_at().unwrap().timestamp_millis(),
            FIXED_ISSUANCE_MS
        );
    }

    #[test]
    fn test_multi_issuer_fixtures_distinct() {
        let fixtures = multi_issuer_fixtures(3);
        assert_ne!(fixtures[0].did(), fixtures[1].did());
        assert_ne!(fixtures[1].did(), fixtures[2].did());
    }

    #[test]
    fn test_demo_rules() {
        let rules = demo_privacy_rules();
        assert_eq!(rules.len(), 3);
        assert!(rules.get("age").is_some());
    }

    #[tokio::test]
    async fn test_service_shares_fixture_store() {
        use sentinel_store::BlobStore;

        let fixture = TestFixture::new();
        let service = fixture.service();
        service.publish(&fixture.issue_input("shared")).await.unwrap();
        assert_eq!(fixture.store.count().await.unwrap(), 1);
    }
}
