//! HTTP handlers

/// `POST /anonymize`.
pub mod anonymize;
/// `POST /audit`.
pub mod audit;
pub mod health;

use serde::{Deserialize, Serialize};

pub use anonymize::anonymize;
pub use audit::audit;
pub use health::health;

/// Body of `POST /anonymize` and `POST /audit`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRequest {
    /// Text to analyze.
    pub text: String,
}
