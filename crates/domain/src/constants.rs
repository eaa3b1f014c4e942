//! Application constants
//!
//! Centralized location for domain-level defaults.

// Server
/// Bind address of the HTTP server.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Bind port of the HTTP server.
pub const DEFAULT_PORT: u16 = 8000;
/// Largest accepted request body.
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

// Analyzer
/// The only analysis language.
pub const SUPPORTED_LANGUAGE: &str = "ru";
/// Word tokens inspected before a span.
pub const DEFAULT_CONTEXT_PREFIX_TOKENS: usize = 5;
/// Word tokens inspected after a span.
pub const DEFAULT_CONTEXT_SUFFIX_TOKENS: usize = 3;
/// Score added when a context keyword is found.
pub const DEFAULT_CONTEXT_BOOST: f64 = 0.35;
/// Floor applied to a boosted score.
pub const DEFAULT_MIN_SCORE_WITH_CONTEXT: f64 = 0.4;

// Statistical NER
/// Score for model spans without a confidence.
pub const DEFAULT_NER_SCORE: f64 = 0.85;

// Anonymizer
/// Replacement written by the default operator.
pub const DEFAULT_PLACEHOLDER: &str = "<ANONYMIZED>";
/// Character written by `mask` without `masking_char`.
pub const DEFAULT_MASKING_CHAR: char = '*';

// Logging
/// `EnvFilter` directive used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Environment
/// Prefix of environment overrides (`FZ152_PORT`).
pub const ENV_PREFIX: &str = "FZ152_";
