//! Golden test vectors for deterministic verification.
//!
//! These vectors pin the canonical encoding, the trace hash and the
//! `did:key` derivation, so independent implementations can check that
//! they hash and identify exactly as this one does. Expected values were
//! produced by a separate JSON encoder with sorted keys and compact
//! separators.

use serde_json::Value;

use sentinel_core::{
    canonicalize_value, did_key_from_public_key, hash_value, ConstraintPolicy, ExecutionTrace,
    Identity, PrivacyRule, PrivacyRules, RedactionEngine, Sha256Hash, TraceBuilder,
};

/// A canonicalization vector: JSON text in, canonical bytes and digest out.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Input JSON, formatted arbitrarily.
    pub input: &'static str,
    /// Expected canonical encoding.
    pub expected_canonical: &'static str,
    /// Expected SHA-256 of the canonical encoding (hex).
    pub expected_sha256: &'static str,
}

/// A trace vector: fixed execution inputs and the expected trace hash.
#[derive(Debug, Clone)]
pub struct TraceVector {
    pub name: &'static str,
    /// Bytes the model fingerprint is taken over.
    pub model: &'static [u8],
    pub input: &'static str,
    /// `(rule key, bound)` pairs.
    pub privacy: &'static [(&'static str, i64)],
    pub output: &'static str,
    pub duration_ms: u64,
    pub timestamp: i64,
    pub expected_public_input: &'static str,
    /// Expected trace hash (hex). Empty means only self-consistency is checked.
    pub expected_trace_hash: &'static str,
}

/// A `did:key` vector: seed to identifier.
#[derive(Debug, Clone)]
pub struct DidVector {
    pub seed: [u8; 32],
    pub expected_public_key: &'static str,
    pub expected_did: &'static str,
}

/// Get all canonicalization vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "empty object",
            input: "{}",
            expected_canonical: "{}",
            expected_sha256: "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a",
        },
        GoldenVector {
            name: "two keys reordered",
            input: r#"{"b": 1, "a": 2}"#,
            expected_canonical: r#"{"a":2,"b":1}"#,
            expected_sha256: "d3626ac30a87e6f7a6428233b3c68299976865fa5508e4267c5415c76af7a772",
        },
        GoldenVector {
            name: "nested object keeps array order",
            input: r#"{"model": "m", "nested": {"z": [3, 2, 1], "a": null}, "ok": true}"#,
            expected_canonical: r#"{"model":"m","nested":{"a":null,"z":[3,2,1]},"ok":true}"#,
            expected_sha256: "d01f91bfeb99b8c8374c9656e237aad28d4d0c23d5775b93c9f5fc86daa04f84",
        },
        GoldenVector {
            name: "string escapes",
            input: r#"{"text": "line\nbreak \"quoted\" tab\t bell\u0007"}"#,
            expected_canonical: r#"{"text":"line\nbreak \"quoted\" tab\t bell\u0007"}"#,
            expected_sha256: "54df9844b9ac125b189505f9b32e50e724689470559a362667552b34f64dbf75",
        },
        GoldenVector {
            name: "raw utf-8 and byte-order keys",
            input: r#"{"name": "café ✓", "B": 0, "a": -7}"#,
            expected_canonical: r#"{"B":0,"a":-7,"name":"café ✓"}"#,
            expected_sha256: "b7de2e41342538f09375a7322473f8c051f9fc9c8ec453d411ee6f83e6c49480",
        },
        GoldenVector {
            name: "top-level array",
            input: r#"[{"y": 2, "x": 1}, "s", false]"#,
            expected_canonical: r#"[{"x":1,"y":2},"s",false]"#,
            expected_sha256: "5d5eb7f4435fef435a9327aea054c8c041aa9d46e173857325fd2c7e386175de",
        },
    ]
}

/// Get all trace vectors.
pub fn trace_vectors() -> Vec<TraceVector> {
    vec![
        TraceVector {
            name: "credit check with redacted score",
            model: b"sentinel-golden-model",
            input: r#"{"score": 750, "income": 50000}"#,
            privacy: &[("min_score", 700)],
            output: "SYS: LOAN_APPROVED | SCORE: 98.2 | REASON: Strong Credit History & Income Ratio | LIMIT: $25,000",
            duration_ms: 42,
            timestamp: 1_760_000_000_000,
            expected_public_input: r#"{"income":50000,"score":"REDACTED_VERIFIED"}"#,
            expected_trace_hash: "21cc53e48b22734dc11a696b63eef7d3876cdbc17591f1bbc24d47fb2be23edd",
        },
        TraceVector {
            name: "plain text, empty model, no rules",
            model: b"",
            input: "hello",
            privacy: &[],
            output: "",
            duration_ms: 0,
            timestamp: 0,
            expected_public_input: "hello",
            expected_trace_hash: "fc24f643712a6c51bcac88502228df57f5b07c6dc85f4a6ef6776d2d03d2bbde",
        },
    ]
}

/// Get all `did:key` vectors.
pub fn did_vectors() -> Vec<DidVector> {
    vec![
        DidVector {
            seed: [0x00; 32],
            expected_public_key: "3b6a27bcceb6a42d62a3a8d02a6f0d73653215771de243a63ac048a18b59da29",
            expected_did: "did:key:z6MkiTBz1ymuepAQ4HEHYSF1H8quG5GLVVQR3djdX3mDooWp",
        },
        DidVector {
            seed: [0x42; 32],
            expected_public_key: "2152f8d19b791d24453242e15f2eab6cb7cffa7b6a5ed30097960e069881db12",
            expected_did: "did:key:z6MkghLt1e8m1fmANsdJJco3aCLV8Xnigr5UWwC3u5iZFPd3",
        },
    ]
}

/// Build the trace a vector describes, redacting as the runtime does.
pub fn generate_trace_from_vector(vector: &TraceVector) -> ExecutionTrace {
    let mut rules = PrivacyRules::new();
    for (key, bound) in vector.privacy {
        let rule = PrivacyRule::parse(key, *bound).expect("vector rule keys are valid");
        rules.insert(rule).expect("vector rule attributes are distinct");
    }
    let policy = ConstraintPolicy::builder()
        .privacy(rules)
        .build()
        .expect("vector policy is valid");
    let redaction = RedactionEngine::new(policy.privacy()).redact(vector.input);

    TraceBuilder::new(Sha256Hash::hash(vector.model), vector.input)
        .disclosure(redaction.redacted_input, redaction.proofs)
        .policy(policy)
        .output(vector.output)
        .duration_ms(vector.duration_ms)
        .timestamp(vector.timestamp)
        .build()
}

/// Verify every vector against this implementation.
///
/// Returns `(name, matches, actual)` per vector, where `actual` is the
/// hex digest or identifier computed here.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    let mut results = Vec::new();

    for v in all_vectors() {
        let value: Value = serde_json::from_str(v.input).expect("vector input is JSON");
        let canonical = canonicalize_value(&value).expect("vector input canonicalizes");
        let digest = hex::encode(Sha256Hash::hash(&canonical).as_bytes());
        let matches = canonical == v.expected_canonical.as_bytes() && digest == v.expected_sha256;
        results.push((v.name.to_string(), matches, digest));
    }

    for v in trace_vectors() {
        let trace = generate_trace_from_vector(&v);
        let hex = trace.hash().expect("vector trace canonicalizes").to_hex();
        let matches = trace.public_input == v.expected_public_input
            && (v.expected_trace_hash.is_empty() || hex == v.expected_trace_hash);
        results.push((v.name.to_string(), matches, hex));
    }

    for v in did_vectors() {
        let identity = Identity::from_seed(&v.seed);
        let did = did_key_from_public_key(&identity.public_key());
        let matches = identity.public_key().to_hex() == v.expected_public_key
            && did == v.expected_did;
        results.push((format!("did:key seed {:02x}", v.seed[0]), matches, did));
    }

    results
}

/// Hash of a JSON text, for ad-hoc comparison against the vectors.
pub fn canonical_sha256_hex(json: &str) -> Option<String> {
    let value: Value = serde_json::from_str(json).ok()?;
    hash_value(&value).ok().map(|h| h.to_hex())
}
