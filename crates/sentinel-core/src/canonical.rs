//! Canonical JSON encoding for deterministic hashing and signing.
//!
//! Records are serialized through `serde_json::Value` and re-emitted with
//! deterministic rules:
//! - Object keys sorted by UTF-8 byte order, at every nesting level
//! - No insignificant whitespace
//! - Integers in plain decimal, no floats
//! - Strings escaped with the minimal JSON escape set, everything else raw UTF-8
//!
//! **CRITICAL**: This encoding is FROZEN. Changes break every issued
//! credential's trace hash and signature.

use serde::Serialize;
use serde_json::{Map, Number, Value};

use crate::crypto::Sha256Hash;
use crate::error::CanonicalError;

/// Domain separation prefix for credential signatures.
pub const SIGN_DOMAIN: &[u8] = b"sentinel/credential-sig/v1";

/// Encode any serializable record to canonical bytes.
pub fn canonicalize<T: Serialize + ?Sized>(record: &T) -> Result<Vec<u8>, CanonicalError> {
    let value =
        serde_json::to_value(record).map_err(|e| CanonicalError::Serialize(e.to_string()))?;
    canonicalize_value(&value)
}

/// Encode an already-parsed JSON value to canonical bytes.
pub fn canonicalize_value(value: &Value) -> Result<Vec<u8>, CanonicalError> {
    let mut buf = Vec::new();
    encode_value(&mut buf, value)?;
    Ok(buf)
}

/// SHA-256 of the canonical encoding of a record.
pub fn hash<T: Serialize + ?Sized>(record: &T) -> Result<Sha256Hash, CanonicalError> {
    Ok(Sha256Hash::hash(&canonicalize(record)?))
}

/// SHA-256 of the canonical encoding of a JSON value.
pub fn hash_value(value: &Value) -> Result<Sha256Hash, CanonicalError> {
    Ok(Sha256Hash::hash(&canonicalize_value(value)?))
}

/// Build the message to sign (with domain separation).
pub fn sign_message(content_bytes: &[u8]) -> Vec<u8> {
    let mut msg = Vec::with_capacity(SIGN_DOMAIN.len() + content_bytes.len());
    msg.extend_from_slice(SIGN_DOMAIN);
    msg.extend_from_slice(content_bytes);
    msg
}

/// Recursively encode a JSON value.
fn encode_value(buf: &mut Vec<u8>, value: &Value) -> Result<(), CanonicalError> {
    match value {
        Value::Null => buf.extend_from_slice(b"null"),
        Value::Bool(true) => buf.extend_from_slice(b"true"),
        Value::Bool(false) => buf.extend_from_slice(b"false"),
        Value::Number(n) => encode_number(buf, n)?,
        Value::String(s) => encode_string(buf, s),
        Value::Array(items) => encode_array(buf, items)?,
        Value::Object(map) => encode_object(buf, map)?,
    }
    Ok(())
}

fn encode_number(buf: &mut Vec<u8>, n: &Number) -> Result<(), CanonicalError> {
    if let Some(i) = n.as_i64() {
        buf.extend_from_slice(i.to_string().as_bytes());
    } else if let Some(u) = n.as_u64() {
        buf.extend_from_slice(u.to_string().as_bytes());
    } else {
        return Err(CanonicalError::UnsupportedNumber(n.to_string()));
    }
    Ok(())
}

fn encode_string(buf: &mut Vec<u8>, s: &str) {
    buf.push(b'"');
    for c in s.chars() {
        match c {
            '"' => buf.extend_from_slice(b"\\\""),
            '\\' => buf.extend_from_slice(b"\\\\"),
            '\u{08}' => buf.extend_from_slice(b"\\b"),
            '\u{0c}' => buf.extend_from_slice(b"\\f"),
            '\n' => buf.extend_from_slice(b"\\n"),
            '\r' => buf.extend_from_slice(b"\\r"),
            '\t' => buf.extend_from_slice(b"\\t"),
            c if (c as u32) < 0x20 => {
                buf.extend_from_slice(format!("\\u{:04x}", c as u32).as_bytes());
            }
            c => {
                let mut tmp = [0u8; 4];
                buf.extend_from_slice(c.encode_utf8(&mut tmp).as_bytes());
            }
        }
    }
    buf.push(b'"');
}

fn encode_array(buf: &mut Vec<u8>, items: &[Value]) -> Result<(), CanonicalError> {
    buf.push(b'[');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            buf.push(b',');
        }
        encode_value(buf, item)?;
    }
    buf.push(b']');
    Ok(())
}

fn encode_object(buf: &mut Vec<u8>, map: &Map<String, Value>) -> Result<(), CanonicalError> {
    // Sort explicitly: the map's own iteration order is a crate feature choice.
    let mut entries: Vec<(&String, &Value)> = map.iter().collect();
    entries.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

    buf.push(b'{');
    for (i, (key, value)) in entries.into_iter().enumerate() {
        if i > 0 {
            buf.push(b',');
        }
        encode_string(buf, key);
        buf.push(b':');
        encode_value(buf, value)?;
    }
    buf.push(b'}');
    Ok(())
}
