use serde_json::Value;
use sha2::{Digest, Sha256};

/// Map keys whose values are one-way hashed before anything else sees them.
pub const SENSITIVE_KEYS: [&str; 4] = ["password", "passwordHistory", "fido2Credentials", "totp"];

/// Replaces sensitive values anywhere in a nested structure with a SHA-256
/// hex digest, recursing through maps and sequences. A value that was just
/// replaced is not descended into again. Nulls are left untouched.
///
/// Runs on raw items before flattening, so the canonical `password`/`totp`
/// fields are already digests by the time identity-key grouping happens.
pub fn hash_sensitive_values(data: &mut Value) {
    match data {
        Value::Object(map) => {
            for (key, value) in map.iter_mut() {
                if SENSITIVE_KEYS.contains(&key.as_str()) && !value.is_null() {
                    *value = Value::String(sha256_hex(&value_repr(value)));
                } else {
                    hash_sensitive_values(value);
                }
            }
        }
        Value::Array(items) => {
            for item in items.iter_mut() {
                hash_sensitive_values(item);
            }
        }
        _ => {}
    }
}

/// String form hashed for a sensitive value: the raw content for strings,
/// compact JSON for anything structured.
fn value_repr(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn sha256_hex(input: &str) -> String {
    format!("{:x}", Sha256::digest(input.as_bytes()))
}
