//! Service configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use sentinel_core::policy::DEFAULT_MAX_INPUT_LENGTH;
use sentinel_core::{ConstraintPolicy, ConstraintPolicyBuilder, TrustMode};
use sentinel_store::DEFAULT_FEED_CAPACITY;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SentinelError};

/// Default key file, relative to the working directory.
pub const DEFAULT_KEY_PATH: &str = "sentinel_key.pem";

/// Configuration for a Sentinel instance.
///
/// Read once at startup; every field has a default so a partial JSON
/// document is enough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentinelConfig {
    /// Issuer private key (PKCS#8 PEM).
    pub key_path: PathBuf,
    /// SQLite blob database. In-memory store when unset.
    pub blob_db_path: Option<PathBuf>,
    /// How fetched certificates are verified.
    pub trust_mode: TrustMode,
    /// Bound on one issuer key resolution.
    pub resolve_timeout_ms: u64,
    /// Retained events in the feed.
    pub feed_capacity: usize,
    /// Input length limit for policies built from this config.
    pub default_max_input_length: usize,
}

impl Default for SentinelConfig {
    fn default() -> Self {
        Self {
            key_path: PathBuf::from(DEFAULT_KEY_PATH),
            blob_db_path: None,
            trust_mode: TrustMode::Full,
            resolve_timeout_ms: 5_000,
            feed_capacity: DEFAULT_FEED_CAPACITY,
            default_max_input_length: DEFAULT_MAX_INPUT_LENGTH,
        }
    }
}

impl SentinelConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| SentinelError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            SentinelError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.resolve_timeout_ms == 0 {
            return Err(SentinelError::Config("resolve_timeout_ms must be positive".into()));
        }
        if self.feed_capacity == 0 {
            return Err(SentinelError::Config("feed_capacity must be positive".into()));
        }
        if self.default_max_input_length == 0 {
            return Err(SentinelError::Config(
                "default_max_input_length must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn resolve_timeout(&self) -> Duration {
        Duration::from_millis(self.resolve_timeout_ms)
    }

    /// Policy builder seeded with this config's input limit.
    pub fn policy_builder(&self) -> ConstraintPolicyBuilder {
        ConstraintPolicy::builder().max_input_length(self.default_max_input_length)
    }

    /// Unrestricted policy with this config's input limit.
    pub fn default_policy(&self) -> Result<ConstraintPolicy> {
        Ok(self.policy_builder().build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SentinelConfig::default();
        assert_eq!(config.key_path, PathBuf::from("sentinel_key.pem"));
        assert_eq!(config.blob_db_path, None);
        assert_eq!(config.trust_mode, TrustMode::Full);
        assert_eq!(config.resolve_timeout(), Duration::from_secs(5));
        assert_eq!(config.feed_capacity, 10);
        assert_eq!(config.default_max_input_length, 1000);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = SentinelConfig::from_json_str(
            r#"{"key_path": "/var/lib/sentinel/key.pem", "trust_mode": "integrity_only"}"#,
        )
        .unwrap();
        assert_eq!(config.key_path, PathBuf::from("/var/lib/sentinel/key.pem"));
        assert_eq!(config.trust_mode, TrustMode::IntegrityOnly);
        assert_eq!(config.feed_capacity, 10);
    }

    #[test]
    fn test_zero_values_rejected() {
        for json in [
            r#"{"resolve_timeout_ms": 0}"#,
            r#"{"feed_capacity": 0}"#,
            r#"{"default_max_input_length": 0}"#,
        ] {
            assert!(matches!(
                SentinelConfig::from_json_str(json),
                Err(SentinelError::Config(_))
            ));
        }
    }

    #[test]
    fn test_unknown_trust_mode_rejected() {
        assert!(SentinelConfig::from_json_str(r#"{"trust_mode": "hash"}"#).is_err());
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sentinel.json");
        std::fs::write(&path, r#"{"default_max_input_length": 2048}"#).unwrap();

        let config = SentinelConfig::from_json_file(&path).unwrap();
        assert_eq!(config.default_policy().unwrap().max_input_length(), 2048);
    }
}
