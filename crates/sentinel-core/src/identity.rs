//! Issuer identity: a signing keypair bound to its `did:key` identifier.

use std::fmt;

use zeroize::Zeroizing;

use crate::crypto::{Keypair, PublicKey, Signature};
use crate::did::{did_key_from_public_key, KEY_FRAGMENT};
use crate::error::Result;

/// An issuer identity.
///
/// The identifier is derived from the public key and can be re-derived from
/// it at any time; it is never stored separately.
#[derive(Clone)]
pub struct Identity {
    keypair: Keypair,
    did: String,
}

impl Identity {
    /// Wrap a keypair, deriving its identifier.
    pub fn from_keypair(keypair: Keypair) -> Self {
        let did = did_key_from_public_key(&keypair.public_key());
        Self { keypair, did }
    }

    /// Generate a fresh identity.
    pub fn generate() -> Self {
        Self::from_keypair(Keypair::generate())
    }

    /// Deterministic identity from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self::from_keypair(Keypair::from_seed(seed))
    }

    /// Restore from a PKCS#8 PEM private key.
    pub fn from_pkcs8_pem(pem: &str) -> Result<Self> {
        Ok(Self::from_keypair(Keypair::from_pkcs8_pem(pem)?))
    }

    /// Export the private key for the key store.
    pub fn to_pkcs8_pem(&self) -> Result<Zeroizing<String>> {
        self.keypair.to_pkcs8_pem()
    }

    /// The `did:key` identifier.
    pub fn did(&self) -> &str {
        &self.did
    }

    pub fn public_key(&self) -> PublicKey {
        self.keypair.public_key()
    }

    /// Sign canonical payload bytes.
    pub fn sign(&self, payload: &[u8]) -> Signature {
        self.keypair.sign(payload)
    }

    /// `<did>#keys-1`
    pub fn verification_method(&self) -> String {
        format!("{}{}", self.did, KEY_FRAGMENT)
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", self.did)
    }
}
