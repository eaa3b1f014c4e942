//! Shared error shapes for the fz152 crates
//!
//! Detection and anonymization are pure functions over text, so the shared
//! failure surface is small: configuration rejected while a recognizer
//! registry is built, malformed spans handed to the anonymizer, and parse or
//! I/O failures while loading configuration and lexicons. [`CommonError`]
//! carries those; module errors (`PiiError`) embed it with `#[from]` and add
//! their own variants.
//!
//! Module errors get `From` impls for std/serde errors and a severity table
//! through two macros:
//!
//! ```rust,ignore
//! #[derive(Debug, thiserror::Error)]
//! pub enum LexiconError {
//!     #[error("Unknown label: {0}")]
//!     UnknownLabel(String),
//!
//!     #[error(transparent)]
//!     Common(#[from] CommonError),
//! }
//!
//! impl_error_conversion!(LexiconError, Common);
//! impl_error_classification!(LexiconError, Common,
//!     Self::UnknownLabel(_) => ErrorSeverity::Warning,
//! );
//! ```
//!
//! | Severity | Meaning in the pipeline |
//! |----------|-------------------------|
//! | Warning  | One recognizer skipped for one request |
//! | Error    | Bad input or configuration, the caller must fix it |
//! | Critical | An internal invariant broke |

use std::fmt;

use thiserror::Error;

/// Standard result type using CommonError
pub type CommonResult<T> = Result<T, CommonError>;

/// Failures shared by every layer of the pipeline.
///
/// Messages end up in logs and HTTP error bodies, so no variant ever carries
/// analyzed text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommonError {
    /// A setting or build-time input (pattern, score, window) is unusable.
    #[error("Configuration error{}: {message}", scope(.field))]
    Config { field: Option<String>, message: String },

    /// A runtime argument breaks a precondition.
    #[error("Invalid {field}: {message}{}", offending(.value))]
    Validation { field: String, message: String, value: Option<String> },

    /// A JSON or TOML document did not parse.
    #[error("Invalid {format}: {message}")]
    Parse { format: DocumentFormat, message: String },

    /// Reading a configuration or lexicon file failed.
    #[error("I/O error{}: {message}", scope(.path))]
    Io { path: Option<String>, message: String },

    /// Should not happen; indicates a bug.
    #[error("Internal error{}: {message}", scope(.component))]
    Internal { component: Option<String>, message: String },
}

/// Document formats the loaders read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// `serde_json` documents.
    Json,
    /// `toml` documents.
    Toml,
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "JSON",
            Self::Toml => "TOML",
        })
    }
}

fn scope(name: &Option<String>) -> String {
    name.as_ref().map(|name| format!(" in '{}'", name)).unwrap_or_default()
}

fn offending(value: &Option<String>) -> String {
    value.as_ref().map(|value| format!(" (got '{}')", value)).unwrap_or_default()
}

impl CommonError {
    /// Configuration error without a named setting.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { field: None, message: message.into() }
    }

    /// Configuration error naming the offending setting (`"analyzer.language"`).
    pub fn config_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config { field: Some(field.into()), message: message.into() }
    }

    /// Validation error for a runtime argument.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), message: message.into(), value: None }
    }

    /// Validation error echoing the rejected value.
    ///
    /// Only for settings and identifiers. Never pass detected text: the
    /// value is logged.
    pub fn validation_with_value(
        field: impl Into<String>,
        message: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::Validation { field: field.into(), message: message.into(), value: Some(value.into()) }
    }

    /// I/O error on a known path.
    pub fn io_at(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Io { path: Some(path.into()), message: message.into() }
    }

    /// Internal error without a component.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { component: None, message: message.into() }
    }

    /// Internal error raised by `component`.
    pub fn internal_in(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Internal { component: Some(component.into()), message: message.into() }
    }

    /// Short category name for metrics labels and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config { .. } => "config",
            Self::Validation { .. } => "validation",
            Self::Parse { .. } => "parse",
            Self::Io { .. } => "io",
            Self::Internal { .. } => "internal",
        }
    }

    /// Structured fields for `tracing` events, `kind` first.
    pub fn log_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("kind", self.kind().to_string())];
        let (name, value, message) = match self {
            Self::Config { field, message } => ("field", field.clone(), message),
            Self::Validation { field, message, .. } => ("field", Some(field.clone()), message),
            Self::Parse { format, message } => ("format", Some(format.to_string()), message),
            Self::Io { path, message } => ("path", path.clone(), message),
            Self::Internal { component, message } => ("component", component.clone(), message),
        };
        if let Some(value) = value {
            fields.push((name, value));
        }
        fields.push(("message", message.clone()));
        fields
    }
}

impl ErrorClassification for CommonError {
    /// Severity used for logging and alerting.
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Internal { .. } => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Severity of an error for logging and alerting decisions.
///
/// Nothing in the pipeline is transient, so there is no retry notion.
pub trait ErrorClassification {
    /// Severity used for logging and alerting.
    fn severity(&self) -> ErrorSeverity;

    /// Whether the error points at a bug rather than at bad input.
    fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }
}

/// Error severity levels for monitoring and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Degraded result for one request.
    Warning,
    /// Bad input or configuration.
    Error,
    /// Broken internal invariant.
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Warning => "WARN",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        })
    }
}

impl From<serde_json::Error> for CommonError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse { format: DocumentFormat::Json, message: err.to_string() }
    }
}

impl From<toml::de::Error> for CommonError {
    fn from(err: toml::de::Error) -> Self {
        Self::Parse { format: DocumentFormat::Toml, message: err.to_string() }
    }
}

impl From<std::io::Error> for CommonError {
    fn from(err: std::io::Error) -> Self {
        Self::Io { path: None, message: err.to_string() }
    }
}

/// `From` impls for serde/std errors on a module error, routed through the
/// variant that wraps [`CommonError`].
///
/// ```rust,ignore
/// impl_error_conversion!(PiiError, Common);
/// ```
#[macro_export]
macro_rules! impl_error_conversion {
    ($error_type:ty, $variant:ident) => {
        impl From<serde_json::Error> for $error_type {
            fn from(err: serde_json::Error) -> Self {
                Self::$variant($crate::error::CommonError::from(err))
            }
        }

        impl From<toml::de::Error> for $error_type {
            fn from(err: toml::de::Error) -> Self {
                Self::$variant($crate::error::CommonError::from(err))
            }
        }

        impl From<std::io::Error> for $error_type {
            fn from(err: std::io::Error) -> Self {
                Self::$variant($crate::error::CommonError::from(err))
            }
        }
    };
}

/// `ErrorClassification` for a module error: the wrapped [`CommonError`]
/// keeps its own severity, other variants use the table.
///
/// ```rust,ignore
/// impl_error_classification!(PiiError, Common,
///     Self::Recognizer { .. } => ErrorSeverity::Warning,
///     Self::InvalidSpan(_) => ErrorSeverity::Error,
/// );
/// ```
#[macro_export]
macro_rules! impl_error_classification {
    ($error_type:ty, $common_variant:ident $(, $variant:pat => $severity:expr)* $(,)?) => {
        impl $crate::error::ErrorClassification for $error_type {
            fn severity(&self) -> $crate::error::ErrorSeverity {
                match self {
                    Self::$common_variant(e) => $crate::error::ErrorClassification::severity(e),
                    $($variant => $severity,)*
                }
            }
        }
    };
}
