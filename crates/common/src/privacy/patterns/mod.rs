//! Pattern-based PII recognition
//!
//! Building blocks shared by every recognizer: the entity vocabulary,
//! compiled patterns, context-keyword boosting, checksum validators and the
//! [`Recognizer`] trait with its regex implementation.

/// Context window settings.
pub mod config;
pub mod context;
/// Recognition failures.
pub mod error;
pub mod matcher;
pub mod recognizer;
pub mod types;
pub mod validators;

// Re-export commonly used types
pub use config::ContextConfig;
pub use context::{ContextEnhancer, ContextKeywords};
pub use error::{PiiError, PiiResult};
pub use matcher::{Pattern, PatternMatch, PatternMatcher};
pub use recognizer::{PatternRecognizer, PatternRecognizerBuilder, Recognizer};
pub use types::{AnalysisExplanation, EntityType, RecognitionResult, ValidationOutcome};
pub use validators::Validator;
