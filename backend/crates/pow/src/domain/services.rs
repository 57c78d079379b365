//! Domain Services
//!
//! Pure domain logic for PoW digests and verification. Any client must
//! implement `compute_digest` and the qualification rule identically.

use crate::error::{PowError, PowResult};
use primitive_types::U256;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Hex length of a challenge or response nonce (256 bits)
pub const NONCE_HEX_LEN: usize = 64;

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    rand::rng().fill_bytes(&mut bytes);
    bytes
}

/// Generate a uniformly distributed 256-bit nonce as 64 uppercase hex characters
pub fn generate_nonce() -> String {
    hex::encode_upper(random_bytes(NONCE_HEX_LEN / 2))
}

/// Whether `nonce` is exactly 64 hex characters
pub fn is_well_formed_nonce(nonce: &str) -> bool {
    nonce.len() == NONCE_HEX_LEN && nonce.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Compute SHA-256 and render it as uppercase hex
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode_upper(Sha256::digest(data))
}

fn digest_bytes(challenge_nonce: &str, response_nonce: &str, bound_data: Option<&[u8]>) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(challenge_nonce.as_bytes());
    hasher.update(response_nonce.as_bytes());
    if let Some(data) = bound_data {
        hasher.update(data);
    }
    hasher.finalize().into()
}

/// SHA-256 over challenge nonce, response nonce and bound data (in that order)
pub fn compute_digest(challenge_nonce: &str, response_nonce: &str, bound_data: Option<&[u8]>) -> String {
    hex::encode_upper(digest_bytes(challenge_nonce, response_nonce, bound_data))
}

/// Interpret a hex digest as an unsigned 256-bit integer
pub fn digest_as_integer(digest_hex: &str) -> PowResult<U256> {
    if digest_hex.len() != NONCE_HEX_LEN {
        return Err(PowError::InvalidHashValue(digest_hex.to_string()));
    }
    let bytes =
        hex::decode(digest_hex).map_err(|_| PowError::InvalidHashValue(digest_hex.to_string()))?;
    Ok(U256::from_big_endian(&bytes))
}

/// Verify a PoW solution against a threshold
///
/// A digest less than or equal to `maximum_allowed_hash_value` qualifies.
pub fn verify_response_nonce(
    challenge_nonce: &str,
    response_nonce: &str,
    bound_data: Option<&[u8]>,
    maximum_allowed_hash_value: U256,
) -> PowResult<()> {
    let digest = U256::from_big_endian(&digest_bytes(challenge_nonce, response_nonce, bound_data));
    if digest > maximum_allowed_hash_value {
        return Err(PowError::InsufficientSolutionNonce);
    }
    Ok(())
}

/// Client-side brute force search for a qualifying response nonce
///
/// Expected attempts are about `2^256 / maximum_allowed_hash_value`.
pub fn find_qualified_response_nonce(
    challenge_nonce: &str,
    maximum_allowed_hash_value: U256,
    bound_data: Option<&[u8]>,
) -> String {
    loop {
        let response_nonce = generate_nonce();
        if verify_response_nonce(
            challenge_nonce,
            &response_nonce,
            bound_data,
            maximum_allowed_hash_value,
        )
        .is_ok()
        {
            return response_nonce;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_concatenation_order() {
        let digest = compute_digest("AB", "CD", Some(b"EF"));
        assert_eq!(digest, sha256_hex(b"ABCDEF"));

        let digest = compute_digest("AB", "CD", None);
        assert_eq!(digest, sha256_hex(b"ABCD"));
    }

    #[test]
    fn test_digest_matches_verification() {
        let challenge = generate_nonce();
        let response = generate_nonce();
        let digest = digest_as_integer(&compute_digest(&challenge, &response, Some(b"x"))).unwrap();

        assert!(verify_response_nonce(&challenge, &response, Some(b"x"), digest).is_ok());
        assert_eq!(
            verify_response_nonce(&challenge, &response, Some(b"x"), digest - U256::one()),
            Err(PowError::InsufficientSolutionNonce)
        );
    }

    #[test]
    fn test_nonce_format() {
        let nonce = generate_nonce();
        assert!(is_well_formed_nonce(&nonce));
        assert_eq!(nonce, nonce.to_uppercase());
        assert!(!is_well_formed_nonce("FFFF"));
        assert!(!is_well_formed_nonce(&"G".repeat(64)));
    }
}
