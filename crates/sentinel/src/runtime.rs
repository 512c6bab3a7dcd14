//! The secure runtime: validate, execute, redact, trace, sign.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use sentinel_core::{
    ConstraintEngine, ConstraintPolicy, Credential, Identity, RedactionEngine, Sha256Hash,
    TraceBuilder,
};

use crate::error::{Result, SentinelError};
use crate::executor::ModelExecutor;

/// One execution to certify.
#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    pub input: String,
    pub policy: ConstraintPolicy,
    /// Modules the execution asks to load, checked against the policy.
    pub modules: Vec<String>,
}

impl ExecutionRequest {
    /// Request under the default policy with no modules.
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            policy: ConstraintPolicy::default(),
            modules: Vec::new(),
        }
    }

    pub fn policy(mut self, policy: ConstraintPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.modules.push(module.into());
        self
    }
}

/// Runs one model and certifies every execution it performs.
///
/// The model is pinned by its fingerprint at construction time; the
/// identity is shared across runtimes.
pub struct SecureRuntime<E: ModelExecutor> {
    model_identity: Sha256Hash,
    executor: E,
    identity: Arc<Identity>,
}

impl<E: ModelExecutor> SecureRuntime<E> {
    pub fn new(model_identity: Sha256Hash, executor: E, identity: Arc<Identity>) -> Self {
        Self {
            model_identity,
            executor,
            identity,
        }
    }

    /// Fingerprint the model file and pin the runtime to it.
    pub fn from_model_file(
        model_path: impl AsRef<Path>,
        executor: E,
        identity: Arc<Identity>,
    ) -> Result<Self> {
        let model_identity = fingerprint_model(model_path.as_ref())?;
        Ok(Self::new(model_identity, executor, identity))
    }

    pub fn model_identity(&self) -> &Sha256Hash {
        &self.model_identity
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Execute and return a signed credential for the run.
    ///
    /// Policy violations are returned before the executor is called.
    pub fn execute(&self, request: &ExecutionRequest) -> Result<Credential> {
        let model_hex = self.model_identity.to_hex();
        let engine = ConstraintEngine::new(&request.policy);
        let checked = engine.validate(&model_hex, &request.input, request.modules.as_slice());
        if let Err(violation) = checked {
            tracing::warn!(model = %model_hex, %violation, "execution refused by policy");
            return Err(violation.into());
        }

        let started = Instant::now();
        let output = self
            .executor
            .execute(&self.model_identity, &request.input)
            .map_err(SentinelError::Executor)?;
        let duration_ms = started.elapsed().as_millis() as u64;

        let redaction = RedactionEngine::new(request.policy.privacy()).redact(&request.input);

        let trace = TraceBuilder::new(self.model_identity, &request.input)
            .disclosure(redaction.redacted_input, redaction.proofs)
            .policy(request.policy.clone())
            .output(output)
            .duration_ms(duration_ms)
            .timestamp(chrono::Utc::now().timestamp_millis())
            .build();

        let credential = Credential::build(trace, &self.identity)?;
        tracing::info!(
            trace_hash = %credential.trace_hash(),
            issuer = %credential.issuer,
            duration_ms,
            "credential issued"
        );
        Ok(credential)
    }
}

/// SHA-256 of a model file, read in fixed-size chunks.
pub fn fingerprint_model(path: &Path) -> Result<Sha256Hash> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => SentinelError::ModelNotFound(path.to_path_buf()),
        _ => SentinelError::Io(e),
    })?;
    Ok(Sha256Hash::hash_reader(file)?)
}
