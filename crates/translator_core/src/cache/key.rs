//! Cache key derivation: a stable, order-sensitive fingerprint for a
//! query plus any request filters, so slang that expands into different
//! syntax never collides with a differently-worded query.

use sha2::{Digest, Sha256};

/// Collapses whitespace and lowercases only — parser normalization is
/// deliberately *not* applied here, so two distinct raw queries never
/// share a fingerprint even if they'd parse to the same IR.
pub fn normalize_for_key(query: &str) -> String {
    query.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// `SHA-256(normalized-query | JSON(filters) | salt)`, truncated to the
/// first 16 hex characters.
pub fn fingerprint(query: &str, filters_json: &str, salt: &str) -> String {
    let normalized = normalize_for_key(query);
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    hasher.update(b"|");
    hasher.update(filters_json.as_bytes());
    hasher.update(b"|");
    hasher.update(salt.as_bytes());
    let digest = hasher.finalize();
    let hex = digest.iter().map(|b| format!("{b:02x}")).collect::<String>();
    hex[..16].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_inputs_produce_same_fingerprint() {
        let a = fingerprint("Cheap Green Ramp", "{}", "salt");
        let b = fingerprint("cheap   green ramp", "{}", "salt");
        assert_eq!(a, b);
    }

    #[test]
    fn different_filters_produce_different_fingerprints() {
        let a = fingerprint("ramp", "{}", "salt");
        let b = fingerprint("ramp", "{\"format\":\"commander\"}", "salt");
        assert_ne!(a, b);
    }

    #[test]
    fn fingerprint_is_sixteen_hex_chars() {
        let fp = fingerprint("ramp", "{}", "salt");
        assert_eq!(fp.len(), 16);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
