use thiserror::Error;

use crate::error::{CommonError, ErrorSeverity};
use crate::{impl_error_classification, impl_error_conversion};

/// Errors of the detection and anonymization pipeline
#[derive(Debug, Error)]
pub enum PiiError {
    /// Shared configuration, validation, parse and I/O failures.
    #[error(transparent)]
    Common(#[from] CommonError),

    /// A pattern expression did not compile.
    #[error("Pattern '{name}' failed to compile: {message}")]
    PatternCompilation { name: String, message: String },

    /// One recognizer failed on one text.
    #[error("Recognizer '{recognizer}' failed: {message}")]
    Recognizer { recognizer: String, message: String },

    /// The statistical model failed.
    #[error("NER model error: {0}")]
    NerModel(String),

    /// Requested language differs from the engine language.
    #[error("Unsupported language '{requested}', this engine serves '{supported}'")]
    UnsupportedLanguage { requested: String, supported: String },

    /// A span lies outside the text or off a char boundary.
    #[error("Invalid span: {0}")]
    InvalidSpan(String),

    /// Anonymization could not complete.
    #[error("Anonymization error: {0}")]
    Anonymization(String),

    /// Raw `regex` failure.
    #[error("Regex error: {0}")]
    RegexError(#[from] regex::Error),
}

/// Result type of the recognition pipeline.
pub type PiiResult<T> = Result<T, PiiError>;

impl PiiError {
    /// Failure of one named recognizer.
    pub fn recognizer(recognizer: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Recognizer { recognizer: recognizer.into(), message: message.into() }
    }

    /// Span that does not fit the text.
    pub fn invalid_span(message: impl Into<String>) -> Self {
        Self::InvalidSpan(message.into())
    }
}

// Auto-convert std types via CommonError
impl_error_conversion!(PiiError, Common);

impl_error_classification!(PiiError, Common,
    Self::Recognizer { .. } => ErrorSeverity::Warning,
    Self::PatternCompilation { .. }
    | Self::NerModel(_)
    | Self::UnsupportedLanguage { .. }
    | Self::InvalidSpan(_)
    | Self::Anonymization(_)
    | Self::RegexError(_) => ErrorSeverity::Error,
);

impl From<PiiError> for CommonError {
    fn from(err: PiiError) -> Self {
        match err {
            PiiError::Common(e) => e,
            PiiError::PatternCompilation { name, message } => {
                CommonError::config_field(format!("pattern.{}", name), message)
            }
            PiiError::Recognizer { recognizer, message } => {
                CommonError::internal_in(recognizer, message)
            }
            PiiError::NerModel(msg) => CommonError::internal(format!("NER model: {}", msg)),
            PiiError::UnsupportedLanguage { requested, supported } => CommonError::validation(
                "language",
                format!("'{}' is not supported, expected '{}'", requested, supported),
            ),
            PiiError::InvalidSpan(msg) => CommonError::validation("results", msg),
            PiiError::Anonymization(msg) => {
                CommonError::internal(format!("Anonymization: {}", msg))
            }
            PiiError::RegexError(e) => CommonError::config(format!("Regex error: {}", e)),
        }
    }
}
