use sha2::{Digest, Sha256, Sha512};

use super::config::{HashAlgorithm, HashConfig};
use super::error::{HashError, HashResult};

/// Salted digest of detected values: `hex(H(value || salt))`.
#[derive(Debug, Clone)]
pub struct SecureHasher {
    config: HashConfig,
}

impl SecureHasher {
    /// SHA-256 hasher with a generated salt.
    pub fn new() -> HashResult<Self> {
        Ok(Self { config: HashConfig::generated(HashAlgorithm::Sha256)? })
    }

    /// Hasher over an explicit salt and algorithm.
    pub fn with_config(config: HashConfig) -> Self {
        Self { config }
    }

    /// Salt and default algorithm in use.
    pub fn config(&self) -> &HashConfig {
        &self.config
    }

    /// Hash with the configured algorithm.
    pub fn hash_value(&self, value: &str) -> HashResult<String> {
        self.hash_value_with(value, self.config.algorithm)
    }

    /// Hash with an explicit algorithm, keeping the configured salt.
    pub fn hash_value_with(&self, value: &str, algorithm: HashAlgorithm) -> HashResult<String> {
        if value.is_empty() {
            return Err(HashError::EmptyValue);
        }

        Ok(match algorithm {
            HashAlgorithm::Sha256 => salted_digest::<Sha256>(value, self.config.salt()),
            HashAlgorithm::Sha512 => salted_digest::<Sha512>(value, self.config.salt()),
        })
    }
}

fn salted_digest<D: Digest>(value: &str, salt: &str) -> String {
    let mut digest = D::new();
    digest.update(value.as_bytes());
    digest.update(salt.as_bytes());
    hex::encode(digest.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_hasher() -> SecureHasher {
        SecureHasher::with_config(HashConfig::with_salt("test-salt", HashAlgorithm::Sha256).unwrap())
    }

    /// Validates `SecureHasher::hash_value` behavior for the digest length
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms SHA-256 yields 64 lowercase hex characters.
    /// - Confirms SHA-512 yields 128 lowercase hex characters.
    #[test]
    fn test_digest_lengths() {
        let hasher = fixed_hasher();
        let short = hasher.hash_value("4500 123456").unwrap();
        let long = hasher.hash_value_with("4500 123456", HashAlgorithm::Sha512).unwrap();
        assert_eq!(short.len(), HashAlgorithm::Sha256.hex_len());
        assert_eq!(long.len(), HashAlgorithm::Sha512.hex_len());
        assert!(short.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    /// Validates `SecureHasher::hash_value` behavior for the known vector
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms the digest equals SHA-256 of value followed by salt.
    #[test]
    fn test_known_vector() {
        let hasher =
            SecureHasher::with_config(HashConfig::with_salt("c", HashAlgorithm::Sha256).unwrap());
        // sha256("abc")
        assert_eq!(
            hasher.hash_value("ab").unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_deterministic_and_distinct() {
        let hasher = fixed_hasher();
        assert_eq!(hasher.hash_value("Иван").unwrap(), hasher.hash_value("Иван").unwrap());
        assert_ne!(hasher.hash_value("Иван").unwrap(), hasher.hash_value("Пётр").unwrap());
    }

    #[test]
    fn test_empty_value_rejected() {
        assert_eq!(fixed_hasher().hash_value(""), Err(HashError::EmptyValue));
    }

    #[test]
    fn test_generated_salts_differ() {
        let a = SecureHasher::new().unwrap();
        let b = SecureHasher::new().unwrap();
        assert_ne!(a.hash_value("+7 900 123 45 67").unwrap(), b.hash_value("+7 900 123 45 67").unwrap());
    }
}
