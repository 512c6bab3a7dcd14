//! `did:key` identifiers for Ed25519 public keys.
//!
//! Format: `did:key:z` + base58btc(0xed 0x01 || public_key). The leading `z`
//! is the multibase tag for base58btc and `0xed 0x01` is the unsigned-varint
//! multicodec for `ed25519-pub`. The identifier is self-certifying: the key
//! is recovered from the string alone.

use crate::crypto::PublicKey;
use crate::error::{CoreError, Result};

/// DID method prefix.
pub const DID_KEY_PREFIX: &str = "did:key:";

/// Multibase tag for base58btc.
const MULTIBASE_BASE58BTC: char = 'z';

/// Multicodec varint for an Ed25519 public key.
const ED25519_PUB_CODEC: [u8; 2] = [0xed, 0x01];

/// Fragment naming the single signing key of an issuer.
pub const KEY_FRAGMENT: &str = "#keys-1";

/// Derive the `did:key` identifier for a public key.
pub fn did_key_from_public_key(public_key: &PublicKey) -> String {
    let mut raw = Vec::with_capacity(ED25519_PUB_CODEC.len() + 32);
    raw.extend_from_slice(&ED25519_PUB_CODEC);
    raw.extend_from_slice(public_key.as_bytes());
    format!(
        "{}{}{}",
        DID_KEY_PREFIX,
        MULTIBASE_BASE58BTC,
        bs58::encode(raw).into_string()
    )
}

/// Recover the public key encoded in a `did:key` identifier.
///
/// A trailing `#fragment` is ignored, so verification methods resolve too.
pub fn public_key_from_did_key(did: &str) -> Result<PublicKey> {
    let did = did.split('#').next().unwrap_or(did);

    let method_specific = did
        .strip_prefix(DID_KEY_PREFIX)
        .ok_or_else(|| CoreError::UnsupportedDid(did.to_string()))?;

    let encoded = method_specific
        .strip_prefix(MULTIBASE_BASE58BTC)
        .ok_or_else(|| CoreError::MalformedDid("expected base58btc multibase prefix".into()))?;

    let raw = bs58::decode(encoded)
        .into_vec()
        .map_err(|e| CoreError::MalformedDid(e.to_string()))?;

    let key_bytes = raw
        .strip_prefix(&ED25519_PUB_CODEC[..])
        .ok_or_else(|| CoreError::MalformedDid("not an ed25519-pub multicodec".into()))?;

    let arr: [u8; 32] = key_bytes
        .try_into()
        .map_err(|_| CoreError::MalformedDid(format!("key is {} bytes", key_bytes.len())))?;

    Ok(PublicKey::from_bytes(arr))
}

/// Whether an identifier uses the `did:key` method.
pub fn is_did_key(did: &str) -> bool {
    did.starts_with(DID_KEY_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Keypair;

    #[test]
    fn test_did_roundtrip() {
        let pk = Keypair::from_seed(&[0x42; 32]).public_key();
        let did = did_key_from_public_key(&pk);
        assert!(did.starts_with("did:key:z6Mk"));
        assert_eq!(public_key_from_did_key(&did).unwrap(), pk);
    }

    #[test]
    fn test_did_is_deterministic() {
        let pk = Keypair::from_seed(&[0x01; 32]).public_key();
        assert_eq!(did_key_from_public_key(&pk), did_key_from_public_key(&pk));
    }

    #[test]
    fn test_known_did_key_vector() {
        // W3C did:key test vector for an Ed25519 key.
        let did = "did:key:z6MkiTBz1ymuepAQ4HEHYSF1H8quG5GLVVQR3djdX3mDooWp";
        let pk = public_key_from_did_key(did).unwrap();
        assert_eq!(did_key_from_public_key(&pk), did);
    }

    #[test]
    fn test_fragment_is_ignored() {
        let pk = Keypair::from_seed(&[0x09; 32]).public_key();
        let vm = format!("{}{}", did_key_from_public_key(&pk), KEY_FRAGMENT);
        assert_eq!(public_key_from_did_key(&vm).unwrap(), pk);
    }

    #[test]
    fn test_rejects_other_methods() {
        assert!(matches!(
            public_key_from_did_key("did:web:example.com"),
            Err(CoreError::UnsupportedDid(_))
        ));
    }

    #[test]
    fn test_rejects_hex_multibase() {
        let pk = Keypair::from_seed(&[0x02; 32]).public_key();
        let legacy = format!("did:key:f{}", pk.to_hex());
        assert!(matches!(
            public_key_from_did_key(&legacy),
            Err(CoreError::MalformedDid(_))
        ));
    }

    #[test]
    fn test_rejects_wrong_codec_and_length() {
        let wrong_codec = format!("did:key:z{}", bs58::encode([0xe7, 0x01, 1, 2, 3]).into_string());
        assert!(public_key_from_did_key(&wrong_codec).is_err());

        let short = format!("did:key:z{}", bs58::encode([0xed, 0x01, 1, 2, 3]).into_string());
        assert!(matches!(
            public_key_from_did_key(&short),
            Err(CoreError::MalformedDid(_))
        ));
    }
}
