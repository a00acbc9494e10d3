//! Secret salt handling.

use crate::error::NonceError;
use base64::Engine;
use rand::RngCore;

/// Length in bytes of generated salts.
pub const SALT_LEN: usize = 32;

const BASE64_PREFIX: &str = "base64:";

/// Generate a random salt from the thread-local CSPRNG.
///
/// # Example
///
/// ```rust
/// use nonce_core::config::{generate_random_salt, SALT_LEN};
///
/// let salt = generate_random_salt();
/// assert_eq!(salt.len(), SALT_LEN);
/// ```
pub fn generate_random_salt() -> Vec<u8> {
    let mut salt = vec![0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}

/// Decode a configured salt.
///
/// Values prefixed with `base64:` are decoded as standard base64, anything else
/// is used as raw bytes. Empty salts are rejected.
pub fn decode_salt(raw: &str) -> Result<Vec<u8>, NonceError> {
    let salt = match raw.strip_prefix(BASE64_PREFIX) {
        Some(encoded) => base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| NonceError::InvalidSalt(e.to_string()))?,
        None => raw.as_bytes().to_vec(),
    };
    if salt.is_empty() {
        return Err(NonceError::InvalidSalt("salt is empty".to_string()));
    }
    Ok(salt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salts_are_unique() {
        assert_ne!(generate_random_salt(), generate_random_salt());
    }

    #[test]
    fn test_decode_raw_salt() {
        assert_eq!(decode_salt("pepper").unwrap(), b"pepper".to_vec());
    }

    #[test]
    fn test_decode_base64_salt() {
        let encoded = base64::engine::general_purpose::STANDARD.encode([0u8, 1, 2, 255]);
        let salt = decode_salt(&format!("base64:{encoded}")).unwrap();
        assert_eq!(salt, vec![0, 1, 2, 255]);
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        assert!(matches!(
            decode_salt("base64:***"),
            Err(NonceError::InvalidSalt(_))
        ));
        assert!(decode_salt("").is_err());
        assert!(decode_salt("base64:").is_err());
    }
}
