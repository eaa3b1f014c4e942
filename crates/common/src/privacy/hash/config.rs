use rand::{thread_rng, RngCore};
use serde::{Deserialize, Serialize};

use super::error::{HashError, HashResult};

/// Bytes of randomness in a generated salt (hex-encoded to twice as many
/// characters).
pub const GENERATED_SALT_BYTES: usize = 32;

/// Digest family of the `hash` operator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// SHA-256, 64 hex characters.
    #[default]
    Sha256,
    /// SHA-512, 128 hex characters.
    Sha512,
}

impl HashAlgorithm {
    /// Length of the lowercase hex digest.
    pub const fn hex_len(self) -> usize {
        match self {
            Self::Sha256 => 64,
            Self::Sha512 => 128,
        }
    }
}

/// Salt and default algorithm of a [`super::SecureHasher`]
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashConfig {
    salt: String,
    /// Algorithm used by [`super::SecureHasher::hash_value`].
    pub algorithm: HashAlgorithm,
}

// Short identifiers (CVV, passport series) are enumerable; without the salt
// hidden the digests would be reversible from logs.
impl std::fmt::Debug for HashConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashConfig")
            .field("salt", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

impl HashConfig {
    /// Random salt of [`GENERATED_SALT_BYTES`]. Digests are only comparable
    /// within the process that generated it.
    pub fn generated(algorithm: HashAlgorithm) -> HashResult<Self> {
        Self::generated_with_len(algorithm, GENERATED_SALT_BYTES)
    }

    /// Random salt of `bytes` bytes.
    pub fn generated_with_len(algorithm: HashAlgorithm, bytes: usize) -> HashResult<Self> {
        if bytes == 0 {
            return Err(HashError::ZeroSaltLength);
        }

        let mut raw = vec![0_u8; bytes];
        thread_rng().fill_bytes(&mut raw);
        Ok(Self { salt: hex::encode(raw), algorithm })
    }

    /// Operator-supplied salt; digests stay stable across restarts.
    pub fn with_salt(salt: impl Into<String>, algorithm: HashAlgorithm) -> HashResult<Self> {
        let salt = salt.into();
        if salt.is_empty() {
            return Err(HashError::EmptySalt);
        }
        Ok(Self { salt, algorithm })
    }

    /// The salt appended to every hashed value.
    pub fn salt(&self) -> &str {
        &self.salt
    }
}
