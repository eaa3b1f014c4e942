//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the fz152 filter
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum Fz152Error {
    /// Unusable settings.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The NER model or its lexicon failed to load.
    #[error("NER model error: {0}")]
    Model(String),

    /// The request was rejected. Maps to 400.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Detection failed.
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Anonymization failed.
    #[error("Anonymization error: {0}")]
    Anonymization(String),

    /// A bug.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for fz152 operations
pub type Result<T> = std::result::Result<T, Fz152Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_tagging() {
        let err = Fz152Error::Config("port must be non-zero".to_string());
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, r#"{"type":"Config","message":"port must be non-zero"}"#);

        let back: Fz152Error = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Fz152Error::Model("lexicon missing".to_string()).to_string(),
            "NER model error: lexicon missing"
        );
    }
}
