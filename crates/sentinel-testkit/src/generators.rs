//! Proptest generators for property-based testing.

use std::collections::BTreeMap;

use proptest::prelude::*;
use serde_json::{Map, Value};

use sentinel_core::{
    ConstraintPolicy, ExecutionTrace, Identity, PrivacyRule, PrivacyRules, RedactionEngine,
    Sha256Hash, TraceBuilder,
};

/// Generate a random identity.
pub fn identity() -> impl Strategy<Value = Identity> {
    any::<[u8; 32]>().prop_map(|seed| Identity::from_seed(&seed))
}

/// Generate a random Sha256Hash.
pub fn sha256_hash() -> impl Strategy<Value = Sha256Hash> {
    any::<[u8; 32]>().prop_map(Sha256Hash::from_bytes)
}

/// Generate an attribute name.
pub fn attribute_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,11}".prop_map(String::from)
}

/// Generate a reasonable timestamp (Unix ms).
pub fn timestamp() -> impl Strategy<Value = i64> {
    0i64..=4_102_444_800_000i64
}

/// Generate a single threshold rule.
pub fn privacy_rule() -> impl Strategy<Value = PrivacyRule> {
    (attribute_name(), any::<bool>(), -1_000_000i64..=1_000_000i64).prop_map(
        |(attribute, at_least, bound)| {
            if at_least {
                PrivacyRule::at_least(attribute, bound)
            } else {
                PrivacyRule::at_most(attribute, bound)
            }
        },
    )
}

/// Generate a rule set with at most one rule per attribute.
pub fn privacy_rules(max_rules: usize) -> impl Strategy<Value = PrivacyRules> {
    prop::collection::vec(privacy_rule(), 0..=max_rules).prop_map(|candidates| {
        let mut rules = PrivacyRules::new();
        for rule in candidates {
            // Later duplicates of an attribute are dropped.
            let _ = rules.insert(rule);
        }
        rules
    })
}

/// Generate a JSON scalar that canonicalizes: no floats.
pub fn json_scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        any::<u64>().prop_map(Value::from),
        ".{0,16}".prop_map(Value::String),
    ]
}

/// Generate a nested JSON value of canonicalizable scalars.
pub fn json_value() -> impl Strategy<Value = Value> {
    json_scalar().prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map(".{0,8}", inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect::<Map<String, Value>>())),
        ]
    })
}

/// Generate a flat attribute object as JSON text with integer values.
pub fn attribute_input() -> impl Strategy<Value = String> {
    prop::collection::btree_map(attribute_name(), -1_000_000i64..=1_000_000i64, 0..6).prop_map(
        |attributes: BTreeMap<String, i64>| {
            serde_json::to_string(&attributes).expect("integer map serializes")
        },
    )
}

/// Parameters for generating an execution trace.
#[derive(Debug, Clone)]
pub struct TraceParams {
    pub model_identity: Sha256Hash,
    pub input: String,
    pub privacy: PrivacyRules,
    pub max_input_length: usize,
    pub output: String,
    pub duration_ms: u64,
    pub timestamp: i64,
}

impl Arbitrary for TraceParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            sha256_hash(),
            prop_oneof![attribute_input(), ".{0,64}"],
            privacy_rules(4),
            1usize..=4096usize, // max input length
            ".{0,64}",
            0u64..=60_000u64, // duration
            timestamp(),
        )
            .prop_map(
                |(model_identity, input, privacy, max_input_length, output, duration_ms, timestamp)| {
                    TraceParams {
                        model_identity,
                        input,
                        privacy,
                        max_input_length,
                        output,
                        duration_ms,
                        timestamp,
                    }
                },
            )
            .boxed()
    }
}

/// Generate a trace from parameters, redacting as the runtime does.
pub fn trace_from_params(params: &TraceParams) -> ExecutionTrace {
    let policy = ConstraintPolicy::builder()
        .max_input_length(params.max_input_length)
        .privacy(params.privacy.clone())
        .build()
        .expect("generated policies are valid");
    let redaction = RedactionEngine::new(policy.privacy()).redact(&params.input);

    TraceBuilder::new(params.model_identity, &params.input)
        .disclosure(redaction.redacted_input, redaction.proofs)
        .policy(policy)
        .output(params.output.clone())
        .duration_ms(params.duration_ms)
        .timestamp(params.timestamp)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use sentinel_core::{
        canonicalize_value, Credential, VerificationReason, Verifier, REDACTED_SENTINEL,
    };

    proptest! {
        #[test]
        fn test_trace_hash_deterministic(params: TraceParams) {
            let t1 = trace_from_params(&params);
            let t2 = trace_from_params(&params);

            prop_assert_eq!(t1.hash().unwrap(), t2.hash().unwrap());
        }

        #[test]
        fn test_canonical_bytes_survive_reparse(value in json_value()) {
            let bytes = canonicalize_value(&value).unwrap();
            let reparsed: Value = serde_json::from_slice(&bytes).unwrap();

            prop_assert_eq!(canonicalize_value(&reparsed).unwrap(), bytes);
        }

        #[test]
        fn test_issued_credentials_verify(params: TraceParams, seed in any::<[u8; 32]>()) {
            let identity = Identity::from_seed(&seed);
            let issued = Utc.timestamp_millis_opt(params.timestamp).unwrap();
            let credential = Credential::build_at(trace_from_params(&params), &identity, issued).unwrap();

            prop_assert!(Verifier::default().verify(&credential).is_verified());
        }

        #[test]
        fn test_output_change_is_tamper(params: TraceParams, suffix in ".{1,8}") {
            let identity = Identity::from_seed(&[3; 32]);
            let mut credential = Credential::build(trace_from_params(&params), &identity).unwrap();
            credential.credential_subject.execution_trace.output.push_str(&suffix);

            prop_assert_eq!(
                Verifier::default().verify(&credential).reason,
                VerificationReason::TraceTampered
            );
        }

        #[test]
        fn test_redaction_idempotent(input in attribute_input(), rules in privacy_rules(4)) {
            let engine = RedactionEngine::new(&rules);
            let once = engine.redact(&input);
            let twice = engine.redact(&once.redacted_input);

            prop_assert_eq!(&twice.redacted_input, &once.redacted_input);
            prop_assert!(twice.proofs.iter().all(|p| !p.satisfied));
        }

        #[test]
        fn test_redacted_values_were_satisfied(input in attribute_input(), rules in privacy_rules(4)) {
            let out = RedactionEngine::new(&rules).redact(&input);
            let public: Value = serde_json::from_str(&out.redacted_input).unwrap();

            for proof in &out.proofs {
                let redacted = public[&proof.attribute] == Value::from(REDACTED_SENTINEL);
                prop_assert_eq!(redacted, proof.satisfied);
            }
        }
    }
}
