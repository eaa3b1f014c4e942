use thiserror::Error;

/// Failures of salt handling and digest computation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashError {
    /// A configured salt was empty
    #[error("Hash salt cannot be empty")]
    EmptySalt,

    /// A generated salt was requested with zero bytes
    #[error("Generated salt needs at least one byte")]
    ZeroSaltLength,

    /// Empty spans never reach the hasher; this guards direct callers
    #[error("Cannot hash an empty value")]
    EmptyValue,
}

/// Result type of the hashing module.
pub type HashResult<T> = Result<T, HashError>;
