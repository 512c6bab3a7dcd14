//! Model execution seam.

use sentinel_core::Sha256Hash;

/// Runs a model on an input.
///
/// The runtime measures duration and handles everything around the call;
/// implementations only produce output.
pub trait ModelExecutor: Send + Sync {
    fn execute(&self, model_identity: &Sha256Hash, input: &str) -> anyhow::Result<String>;
}

impl<F> ModelExecutor for F
where
    F: Fn(&Sha256Hash, &str) -> anyhow::Result<String> + Send + Sync,
{
    fn execute(&self, model_identity: &Sha256Hash, input: &str) -> anyhow::Result<String> {
        self(model_identity, input)
    }
}

pub const CREDIT_SCORE_OUTPUT: &str =
    "SYS: LOAN_APPROVED | SCORE: 98.2 | REASON: Strong Credit History & Income Ratio | LIMIT: $25,000";

pub const CHEST_PAIN_OUTPUT: &str =
    "TRIAGE: PRIORITY_1_RED | ACTION: IMMEDIATE_ER_ADMISSION | SUSPICION: ACUTE_CORONARY_SYNDROME";

/// Deterministic stand-in model for demos and tests.
///
/// Inputs mentioning `Credit Score` or `Chest Pain` get fixed scenario
/// outputs; anything else is echoed with the model's short fingerprint.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannedExecutor;

impl ModelExecutor for CannedExecutor {
    fn execute(&self, model_identity: &Sha256Hash, input: &str) -> anyhow::Result<String> {
        let output = if input.contains("Credit Score") {
            CREDIT_SCORE_OUTPUT.to_string()
        } else if input.contains("Chest Pain") {
            CHEST_PAIN_OUTPUT.to_string()
        } else {
            format!(
                "Processed [{}] by model [{}...]",
                input,
                &model_identity.to_hex()[..8]
            )
        };
        Ok(output)
    }
}
