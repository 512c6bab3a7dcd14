//! Execution policy: which model may run, how large the input may be, which
//! modules may be requested, and which attributes get disclosure checks.
//!
//! A [`ConstraintPolicy`] is validated when it is built (or deserialized) and
//! is immutable afterwards. It is recorded verbatim in every execution trace,
//! so all of its collections are ordered.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PolicyError;

/// Default input length limit, in Unicode scalar values.
pub const DEFAULT_MAX_INPUT_LENGTH: usize = 1000;

/// Direction of a threshold comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    AtLeast,
    AtMost,
}

impl Comparison {
    fn symbol(self) -> &'static str {
        match self {
            Comparison::AtLeast => ">=",
            Comparison::AtMost => "<=",
        }
    }
}

/// A single threshold predicate over one attribute.
///
/// Rule keys follow a small grammar:
/// - `min_<attr>`: `<attr> >= bound`
/// - `max_<attr>`: `<attr> <= bound`
/// - `<attr>_limit`: `<attr> >= bound` (so `age_limit: 18` is `age >= 18`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivacyRule {
    key: String,
    attribute: String,
    comparison: Comparison,
    bound: i64,
}

impl PrivacyRule {
    /// Parse a rule from its declarative key and integer bound.
    pub fn parse(key: &str, bound: i64) -> Result<Self, PolicyError> {
        let (attribute, comparison) = if let Some(attr) = key.strip_prefix("min_") {
            (attr, Comparison::AtLeast)
        } else if let Some(attr) = key.strip_prefix("max_") {
            (attr, Comparison::AtMost)
        } else if let Some(attr) = key.strip_suffix("_limit") {
            (attr, Comparison::AtLeast)
        } else {
            return Err(PolicyError::UnknownRuleKey(key.to_string()));
        };

        if attribute.is_empty() {
            return Err(PolicyError::EmptyAttribute {
                key: key.to_string(),
            });
        }

        Ok(Self {
            key: key.to_string(),
            attribute: attribute.to_string(),
            comparison,
            bound,
        })
    }

    /// `attribute >= bound`.
    pub fn at_least(attribute: impl Into<String>, bound: i64) -> Self {
        let attribute = attribute.into();
        Self {
            key: format!("min_{}", attribute),
            attribute,
            comparison: Comparison::AtLeast,
            bound,
        }
    }

    /// `attribute <= bound`.
    pub fn at_most(attribute: impl Into<String>, bound: i64) -> Self {
        let attribute = attribute.into();
        Self {
            key: format!("max_{}", attribute),
            attribute,
            comparison: Comparison::AtMost,
            bound,
        }
    }

    /// The declarative key this rule was written as.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The attribute the rule checks.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn comparison(&self) -> Comparison {
        self.comparison
    }

    pub fn bound(&self) -> i64 {
        self.bound
    }

    /// Evaluate the predicate against a raw attribute value.
    ///
    /// Non-numeric values never satisfy a threshold.
    pub fn evaluate(&self, value: &Value) -> bool {
        let Value::Number(n) = value else {
            return false;
        };

        if let Some(i) = n.as_i64() {
            return match self.comparison {
                Comparison::AtLeast => i >= self.bound,
                Comparison::AtMost => i <= self.bound,
            };
        }

        match (n.as_f64(), self.comparison) {
            (Some(f), Comparison::AtLeast) => f >= self.bound as f64,
            (Some(f), Comparison::AtMost) => f <= self.bound as f64,
            (None, _) => false,
        }
    }

    /// Human-readable predicate, e.g. `score >= 700`.
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PrivacyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.attribute,
            self.comparison.symbol(),
            self.bound
        )
    }
}

/// The set of disclosure rules for one request, keyed by attribute.
///
/// Serializes as the declarative map (`{"min_score": 700}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, i64>",
    into = "BTreeMap<String, i64>"
)]
pub struct PrivacyRules {
    rules: BTreeMap<String, PrivacyRule>,
}

impl PrivacyRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule. At most one rule per attribute.
    pub fn insert(&mut self, rule: PrivacyRule) -> Result<(), PolicyError> {
        if self.rules.contains_key(rule.attribute()) {
            return Err(PolicyError::DuplicateAttribute(rule.attribute().to_string()));
        }
        self.rules.insert(rule.attribute().to_string(), rule);
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, rule: PrivacyRule) -> Result<Self, PolicyError> {
        self.insert(rule)?;
        Ok(self)
    }

    /// Rules in attribute order.
    pub fn iter(&self) -> impl Iterator<Item = &PrivacyRule> {
        self.rules.values()
    }

    pub fn get(&self, attribute: &str) -> Option<&PrivacyRule> {
        self.rules.get(attribute)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl TryFrom<BTreeMap<String, i64>> for PrivacyRules {
    type Error = PolicyError;

    fn try_from(map: BTreeMap<String, i64>) -> Result<Self, Self::Error> {
        let mut rules = PrivacyRules::new();
        for (key, bound) in map {
            rules.insert(PrivacyRule::parse(&key, bound)?)?;
        }
        Ok(rules)
    }
}

impl From<PrivacyRules> for BTreeMap<String, i64> {
    fn from(rules: PrivacyRules) -> Self {
        rules
            .rules
            .into_values()
            .map(|rule| (rule.key, rule.bound))
            .collect()
    }
}

/// The policy an execution runs under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PolicyFields")]
pub struct ConstraintPolicy {
    allowed_model_identities: BTreeSet<String>,
    max_input_length: usize,
    allowed_modules: BTreeSet<String>,
    privacy: PrivacyRules,
}

impl ConstraintPolicy {
    /// Start building a policy from the defaults.
    pub fn builder() -> ConstraintPolicyBuilder {
        ConstraintPolicyBuilder::default()
    }

    /// Allowed model identities; empty means unrestricted.
    pub fn allowed_model_identities(&self) -> &BTreeSet<String> {
        &self.allowed_model_identities
    }

    pub fn max_input_length(&self) -> usize {
        self.max_input_length
    }

    /// Allowed modules; empty means unrestricted.
    pub fn allowed_modules(&self) -> &BTreeSet<String> {
        &self.allowed_modules
    }

    pub fn privacy(&self) -> &PrivacyRules {
        &self.privacy
    }
}

impl Default for ConstraintPolicy {
    fn default() -> Self {
        Self {
            allowed_model_identities: BTreeSet::new(),
            max_input_length: DEFAULT_MAX_INPUT_LENGTH,
            allowed_modules: BTreeSet::new(),
            privacy: PrivacyRules::new(),
        }
    }
}

/// Wire form of a policy, validated into [`ConstraintPolicy`].
#[derive(Deserialize)]
#[serde(default)]
struct PolicyFields {
    allowed_model_identities: BTreeSet<String>,
    max_input_length: usize,
    allowed_modules: BTreeSet<String>,
    privacy: PrivacyRules,
}

impl Default for PolicyFields {
    fn default() -> Self {
        let defaults = ConstraintPolicy::default();
        Self {
            allowed_model_identities: defaults.allowed_model_identities,
            max_input_length: defaults.max_input_length,
            allowed_modules: defaults.allowed_modules,
            privacy: defaults.privacy,
        }
    }
}

impl TryFrom<PolicyFields> for ConstraintPolicy {
    type Error = PolicyError;

    fn try_from(fields: PolicyFields) -> Result<Self, Self::Error> {
        ConstraintPolicyBuilder {
            allowed_model_identities: fields.allowed_model_identities,
            max_input_length: fields.max_input_length,
            allowed_modules: fields.allowed_modules,
            privacy: fields.privacy,
        }
        .build()
    }
}

/// Validating builder for [`ConstraintPolicy`].
#[derive(Debug, Clone)]
pub struct ConstraintPolicyBuilder {
    allowed_model_identities: BTreeSet<String>,
    max_input_length: usize,
    allowed_modules: BTreeSet<String>,
    privacy: PrivacyRules,
}

impl Default for ConstraintPolicyBuilder {
    fn default() -> Self {
        Self {
            allowed_model_identities: BTreeSet::new(),
            max_input_length: DEFAULT_MAX_INPUT_LENGTH,
            allowed_modules: BTreeSet::new(),
            privacy: PrivacyRules::new(),
        }
    }
}

impl ConstraintPolicyBuilder {
    /// Allow a model identity (hex SHA-256 fingerprint).
    pub fn allow_model(mut self, model_identity: impl Into<String>) -> Self {
        self.allowed_model_identities.insert(model_identity.into());
        self
    }

    pub fn max_input_length(mut self, max: usize) -> Self {
        self.max_input_length = max;
        self
    }

    pub fn allow_module(mut self, module: impl Into<String>) -> Self {
        self.allowed_modules.insert(module.into());
        self
    }

    pub fn privacy(mut self, rules: PrivacyRules) -> Self {
        self.privacy = rules;
        self
    }

    /// Validate and freeze the policy.
    pub fn build(self) -> Result<ConstraintPolicy, PolicyError> {
        if self.max_input_length == 0 {
            return Err(PolicyError::ZeroInputLength);
        }
        Ok(ConstraintPolicy {
            allowed_model_identities: self.allowed_model_identities,
            max_input_length: self.max_input_length,
            allowed_modules: self.allowed_modules,
            privacy: self.privacy,
        })
    }
}
