//! Trusted-issuer disclosure: threshold checks with redaction.
//!
//! This is not a zero-knowledge proof. The issuer sees the true value,
//! evaluates the threshold, and asserts the outcome inside a credential it
//! signs. Verifiers trust the issuer's assertion; nothing here lets them
//! check it independently.
//!
//! A value is replaced by [`REDACTED_SENTINEL`] only when its predicate is
//! satisfied. A failed predicate is recorded as a failed proof and the raw
//! value stays in the output, so an attribute whose rule fails has no
//! confidentiality guarantee.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::policy::PrivacyRules;

/// Replaces attribute values whose threshold was verified.
pub const REDACTED_SENTINEL: &str = "REDACTED_VERIFIED";

/// Scheme tag carried by every proof.
pub const DISCLOSURE_SCHEME: &str = "trusted-issuer-disclosure";

/// One checked-fact assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisclosureProof {
    pub attribute: String,
    /// e.g. `score >= 700`
    pub predicate_description: String,
    pub satisfied: bool,
    pub scheme: String,
}

impl DisclosureProof {
    fn new(attribute: &str, predicate_description: String, satisfied: bool) -> Self {
        Self {
            attribute: attribute.to_string(),
            predicate_description,
            satisfied,
            scheme: DISCLOSURE_SCHEME.to_string(),
        }
    }
}

/// The disclosure-safe view of an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redaction {
    /// Input with satisfied attributes replaced; keys sorted, compact JSON.
    pub redacted_input: String,
    /// Proofs in attribute order.
    pub proofs: Vec<DisclosureProof>,
}

impl Redaction {
    fn unchanged(input: &str) -> Self {
        Self {
            redacted_input: input.to_string(),
            proofs: Vec::new(),
        }
    }
}

/// Applies [`PrivacyRules`] to flat attribute objects.
#[derive(Debug, Clone, Copy)]
pub struct RedactionEngine<'a> {
    rules: &'a PrivacyRules,
}

impl<'a> RedactionEngine<'a> {
    pub fn new(rules: &'a PrivacyRules) -> Self {
        Self { rules }
    }

    /// Redact `input` and collect the disclosure proofs.
    ///
    /// Input that is not a JSON object, or an empty rule set, leaves the
    /// input untouched with no proofs. Attributes already holding the
    /// sentinel are skipped, so a second pass leaves `redacted_input`
    /// byte-identical. The proof list is not idempotent: an unsatisfied
    /// attribute keeps its raw value, is evaluated again and emits its
    /// failed proof again.
    pub fn redact(&self, input: &str) -> Redaction {
        if self.rules.is_empty() {
            return Redaction::unchanged(input);
        }

        let mut attributes: BTreeMap<String, Value> = match serde_json::from_str(input) {
            Ok(Value::Object(map)) => map.into_iter().collect(),
            _ => return Redaction::unchanged(input),
        };

        let mut proofs = Vec::new();
        for rule in self.rules.iter() {
            let Some(value) = attributes.get_mut(rule.attribute()) else {
                continue;
            };
            if value.as_str() == Some(REDACTED_SENTINEL) {
                continue;
            }

            let satisfied = rule.evaluate(value);
            proofs.push(DisclosureProof::new(rule.attribute(), rule.describe(), satisfied));
            if satisfied {
                *value = Value::String(REDACTED_SENTINEL.to_string());
            }
        }

        let redacted_input = match serde_json::to_string(&attributes) {
            Ok(s) => s,
            Err(_) => return Redaction::unchanged(input),
        };

        Redaction {
            redacted_input,
            proofs,
        }
    }
}
