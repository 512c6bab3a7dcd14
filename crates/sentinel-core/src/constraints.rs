//! Pre-execution policy gate.
//!
//! Checks run in a fixed order (model, then input, then modules) so the
//! violation reported when several apply is deterministic.

use crate::error::PolicyViolation;
use crate::policy::ConstraintPolicy;

/// Validates one execution against its policy. Pure; no side effects.
#[derive(Debug, Clone, Copy)]
pub struct ConstraintEngine<'a> {
    policy: &'a ConstraintPolicy,
}

impl<'a> ConstraintEngine<'a> {
    pub fn new(policy: &'a ConstraintPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ConstraintPolicy {
        self.policy
    }

    /// Fails if an allow-list is configured and the model is not on it.
    pub fn validate_model(&self, model_identity: &str) -> Result<(), PolicyViolation> {
        let allowed = self.policy.allowed_model_identities();
        if !allowed.is_empty() && !allowed.contains(model_identity) {
            return Err(PolicyViolation::ModelNotAllowed {
                model_identity: model_identity.to_string(),
            });
        }
        Ok(())
    }

    /// Fails if the input is longer than the limit, counted in Unicode
    /// scalar values rather than bytes.
    pub fn validate_input(&self, input: &str) -> Result<(), PolicyViolation> {
        let length = input.chars().count();
        let max = self.policy.max_input_length();
        if length > max {
            return Err(PolicyViolation::InputTooLong { length, max });
        }
        Ok(())
    }

    /// Fails on the first requested module outside a configured allow-list.
    pub fn validate_modules<S: AsRef<str>>(&self, modules: &[S]) -> Result<(), PolicyViolation> {
        let allowed = self.policy.allowed_modules();
        if allowed.is_empty() {
            return Ok(());
        }
        for module in modules {
            let module: &str = module.as_ref();
            if !allowed.contains(module) {
                return Err(PolicyViolation::ModuleNotAllowed {
                    module: module.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Run every check in order: model, input, modules.
    pub fn validate<S: AsRef<str>>(
        &self,
        model_identity: &str,
        input: &str,
        modules: &[S],
    ) -> Result<(), PolicyViolation> {
        self.validate_model(model_identity)?;
        self.validate_input(input)?;
        self.validate_modules(modules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_MODULES: &[&str] = &[];

    #[test]
    fn test_unrestricted_policy_allows_any_model() {
        let policy = ConstraintPolicy::default();
        let engine = ConstraintEngine::new(&policy);
        assert!(engine.validate_model("anything").is_ok());
    }

    #[test]
    fn test_model_allow_list() {
        let policy = ConstraintPolicy::builder().allow_model("abc").build().unwrap();
        let engine = ConstraintEngine::new(&policy);
        assert!(engine.validate_model("abc").is_ok());
        assert_eq!(
            engine.validate_model("xyz"),
            Err(PolicyViolation::ModelNotAllowed {
                model_identity: "xyz".into()
            })
        );
    }

    #[test]
    fn test_input_length_boundary() {
        let policy = ConstraintPolicy::builder().max_input_length(5).build().unwrap();
        let engine = ConstraintEngine::new(&policy);
        assert!(engine.validate_input("12345").is_ok());
        assert_eq!(
            engine.validate_input("123456"),
            Err(PolicyViolation::InputTooLong { length: 6, max: 5 })
        );
    }

    #[test]
    fn test_input_length_counts_chars_not_bytes() {
        let policy = ConstraintPolicy::builder().max_input_length(3).build().unwrap();
        let engine = ConstraintEngine::new(&policy);
        assert!(engine.validate_input("ééé").is_ok());
    }

    #[test]
    fn test_module_allow_list() {
        let policy = ConstraintPolicy::builder()
            .allow_module("tokenizer")
            .build()
            .unwrap();
        let engine = ConstraintEngine::new(&policy);
        assert!(engine.validate_modules(&["tokenizer"]).is_ok());
        assert_eq!(
            engine.validate_modules(&["tokenizer", "net"]),
            Err(PolicyViolation::ModuleNotAllowed {
                module: "net".into()
            })
        );
    }

    #[test]
    fn test_model_violation_reported_before_input() {
        let policy = ConstraintPolicy::builder()
            .allow_model("abc")
            .max_input_length(1)
            .build()
            .unwrap();
        let engine = ConstraintEngine::new(&policy);
        let err = engine.validate("xyz", "too long", NO_MODULES).unwrap_err();
        assert!(matches!(err, PolicyViolation::ModelNotAllowed { .. }));
    }
}
