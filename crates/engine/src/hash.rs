//! Content hashing using blake3
//!
//! Digests are what the deployment ledger stores for every copied hook, so a
//! later run can tell a file gouzi wrote apart from a hand-written one.

/// Hash content using blake3
///
/// # Examples
///
/// ```
/// use gouzi_engine::hash::hash_content;
///
/// let hash = hash_content(b"#!/bin/sh\n");
/// assert_eq!(hash.len(), 32);
/// ```
#[must_use]
pub fn hash_content(content: &[u8]) -> [u8; 32] {
    *blake3::hash(content).as_bytes()
}

/// Hash content and render the digest as lowercase hex
///
/// This is the form stored in the ledger.
#[must_use]
pub fn hex_digest(content: &[u8]) -> String {
    hex::encode(hash_content(content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_content_deterministic() {
        assert_eq!(hash_content(b"exit 0"), hash_content(b"exit 0"));
        assert_ne!(hash_content(b"exit 0"), hash_content(b"exit 1"));
    }

    #[test]
    fn test_hex_digest_known_value() {
        // blake3 of the empty input
        assert_eq!(
            hex_digest(b""),
            "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262"
        );
    }

    #[test]
    fn test_hex_digest_is_lowercase_hex() {
        let digest = hex_digest(b"#!/bin/sh\nexit 0\n");
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
