//! Salted hashing for the `hash` anonymization operator
//!
//! A detected value is replaced by the lowercase hex digest of
//! `value || salt`. The salt is either configured (stable digests across
//! restarts) or generated at startup (digests only comparable within one
//! process).

/// Salt and algorithm.
pub mod config;
/// Hashing failures.
pub mod error;
/// Salted digests.
pub mod hasher;

// Re-export commonly used types
pub use config::{HashAlgorithm, HashConfig};
pub use error::{HashError, HashResult};
pub use hasher::SecureHasher;
