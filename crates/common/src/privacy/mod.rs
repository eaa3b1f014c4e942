//! Privacy primitives shared by the analyzer and the anonymizer
//!
//! Pattern recognition lives in [`patterns`]; salted hashing for the `hash`
//! operator lives in [`hash`].

pub mod hash;
pub mod patterns;

// Re-export commonly used types
pub use hash::{HashAlgorithm, HashConfig, HashError, HashResult, SecureHasher};
pub use patterns::{
    ContextConfig, EntityType, Pattern, PatternRecognizer, PiiError, PiiResult, RecognitionResult,
    Recognizer,
};
