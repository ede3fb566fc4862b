//! Credential hashing.
//!
//! The transform is deterministic and salted with the user's numeric id:
//! authentication is by digest comparison only, there is no decrypt.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use sha2::{Digest, Sha256};

/// Hashes a plaintext password salted with `id`.
///
/// The decimal form of `id` is inserted at the password's midpoint character
/// offset, the salted string is digested with SHA-256, and the result is
/// returned in the padded URL-safe base64 alphabet.
pub fn hash_password(password: &str, id: u32) -> String {
    let midpoint = password.chars().count() / 2;
    let split_at = password
        .char_indices()
        .nth(midpoint)
        .map(|(offset, _)| offset)
        .unwrap_or(password.len());
    let (head, tail) = password.split_at(split_at);

    let mut digest = Sha256::new();
    digest.update(head.as_bytes());
    digest.update(id.to_string().as_bytes());
    digest.update(tail.as_bytes());
    URL_SAFE.encode(digest.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashing_is_deterministic() {
        assert_eq!(hash_password("secret-pw", 42), hash_password("secret-pw", 42));
    }

    #[test]
    fn different_ids_salt_differently() {
        assert_ne!(hash_password("secret-pw", 1), hash_password("secret-pw", 2));
    }

    #[test]
    fn different_passwords_differ() {
        assert_ne!(hash_password("secret-pw", 42), hash_password("secret-pq", 42));
    }

    #[test]
    fn digest_is_url_safe_base64_of_a_256_bit_hash() {
        let digest = hash_password("secret-pw", 42);
        // 32 bytes -> 44 chars of padded base64
        assert_eq!(digest.len(), 44);
        assert!(digest
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '='));
    }

    #[test]
    fn multibyte_passwords_split_on_char_boundaries() {
        // Must not panic on a midpoint that would fall inside a UTF-8 sequence.
        let digest = hash_password("pässwörtchen", 7);
        assert_eq!(digest.len(), 44);
    }

    #[test]
    fn empty_password_still_hashes() {
        assert_eq!(hash_password("", 42).len(), 44);
    }
}
