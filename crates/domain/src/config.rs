//! Application configuration
//!
//! Every section is `#[serde(default)]`, so a config file only needs to name
//! the values it changes. [`AppConfig::validate`] runs after file and
//! environment layers are merged.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CONTEXT_BOOST, DEFAULT_CONTEXT_PREFIX_TOKENS, DEFAULT_CONTEXT_SUFFIX_TOKENS,
    DEFAULT_HOST, DEFAULT_LOG_LEVEL, DEFAULT_MAX_BODY_BYTES, DEFAULT_MIN_SCORE_WITH_CONTEXT,
    DEFAULT_NER_SCORE, DEFAULT_PORT, SUPPORTED_LANGUAGE,
};
use crate::errors::{Fz152Error, Result};
use crate::types::{HashType, Operator};

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener.
    pub server: ServerConfig,
    /// Detection settings.
    pub analyzer: AnalyzerConfig,
    /// Statistical recognizer.
    pub ner: NerConfig,
    /// Operators and hashing.
    pub anonymizer: AnonymizerConfig,
    /// Tracing subscriber.
    pub logging: LoggingConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Requests with larger bodies are rejected with 413.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Detection pipeline settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Only `ru` is supported.
    pub language: String,
    /// Results scoring below this are discarded before conflict resolution.
    pub score_threshold: f64,
    /// Fan recognizers out on the blocking pool per request.
    pub parallel: bool,
    /// Word tokens inspected before a span.
    pub context_prefix_tokens: usize,
    /// Word tokens inspected after a span.
    pub context_suffix_tokens: usize,
    /// Added to a score when a context keyword is found.
    pub context_boost: f64,
    /// Floor applied to a boosted score.
    pub min_score_with_context: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            language: SUPPORTED_LANGUAGE.to_string(),
            score_threshold: 0.0,
            parallel: false,
            context_prefix_tokens: DEFAULT_CONTEXT_PREFIX_TOKENS,
            context_suffix_tokens: DEFAULT_CONTEXT_SUFFIX_TOKENS,
            context_boost: DEFAULT_CONTEXT_BOOST,
            min_score_with_context: DEFAULT_MIN_SCORE_WITH_CONTEXT,
        }
    }
}

/// Statistical NER settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NerConfig {
    /// Register the lexicon-based recognizer.
    pub enabled: bool,
    /// TOML lexicon replacing the embedded one. Must exist when set.
    pub lexicon_path: Option<PathBuf>,
    /// Score for spans the model returns without confidence.
    pub default_score: f64,
}

impl Default for NerConfig {
    fn default() -> Self {
        Self { enabled: true, lexicon_path: None, default_score: DEFAULT_NER_SCORE }
    }
}

/// Anonymization settings
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnonymizerConfig {
    /// Salt for the `hash` operator. A random one is generated when unset.
    pub hash_salt: Option<String>,
    /// Default algorithm of the `hash` operator.
    pub hash_type: HashType,
    /// Overrides keyed by entity label (`"RU_PASSPORT"`) or `"DEFAULT"`.
    pub operators: BTreeMap<String, Operator>,
}

impl std::fmt::Debug for AnonymizerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnonymizerConfig")
            .field("hash_salt", &self.hash_salt.as_ref().map(|_| "<redacted>"))
            .field("hash_type", &self.hash_type)
            .field("operators", &self.operators)
            .finish()
    }
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence.
    pub level: String,
    /// Emit JSON lines instead of the compact format.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: DEFAULT_LOG_LEVEL.to_string(), json: false }
    }
}

impl AppConfig {
    /// Validate the merged configuration
    ///
    /// # Errors
    /// Returns `Fz152Error::Config` naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(config_error("server.host", "cannot be empty"));
        }
        if self.server.max_body_bytes == 0 {
            return Err(config_error("server.max_body_bytes", "must be greater than zero"));
        }

        let analyzer = &self.analyzer;
        if analyzer.language != SUPPORTED_LANGUAGE {
            return Err(config_error(
                "analyzer.language",
                &format!("'{}' is not supported, only '{}'", analyzer.language, SUPPORTED_LANGUAGE),
            ));
        }
        for (field, value) in [
            ("analyzer.score_threshold", analyzer.score_threshold),
            ("analyzer.context_boost", analyzer.context_boost),
            ("analyzer.min_score_with_context", analyzer.min_score_with_context),
            ("ner.default_score", self.ner.default_score),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(config_error(field, "must be within [0, 1]"));
            }
        }
        if analyzer.context_prefix_tokens == 0 && analyzer.context_suffix_tokens == 0 {
            return Err(config_error(
                "analyzer.context_prefix_tokens",
                "context window cannot be empty on both sides",
            ));
        }

        if self.anonymizer.hash_salt.as_deref().is_some_and(str::is_empty) {
            return Err(config_error("anonymizer.hash_salt", "cannot be empty when set"));
        }
        for (label, operator) in &self.anonymizer.operators {
            if label.trim().is_empty() {
                return Err(config_error("anonymizer.operators", "entity label cannot be empty"));
            }
            if let Operator::Mask { chars_to_mask: 0, .. } = operator {
                return Err(config_error(
                    &format!("anonymizer.operators.{}", label),
                    "chars_to_mask must be greater than zero",
                ));
            }
        }

        if self.logging.level.trim().is_empty() {
            return Err(config_error("logging.level", "cannot be empty"));
        }

        Ok(())
    }
}

fn config_error(field: &str, message: &str) -> Fz152Error {
    Fz152Error::Config(format!("{}: {}", field, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.analyzer.language, "ru");
        assert!(config.ner.enabled);
    }

    /// Validates `AppConfig` deserialization for the partial TOML scenario.
    ///
    /// Assertions:
    /// - Confirms named values are applied.
    /// - Confirms omitted sections keep their defaults.
    /// - Confirms operator overrides parse by label.
    #[test]
    fn test_partial_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            port = 9090

            [anonymizer.operators.RU_PASSPORT]
            type = "mask"
            chars_to_mask = 6
            from_end = true
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.analyzer, AnalyzerConfig::default());
        assert_eq!(
            config.anonymizer.operators.get("RU_PASSPORT"),
            Some(&Operator::Mask { masking_char: '*', chars_to_mask: 6, from_end: true })
        );
    }

    #[test]
    fn test_unsupported_language_rejected() {
        let mut config = AppConfig::default();
        config.analyzer.language = "en".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("analyzer.language"));
    }

    #[test]
    fn test_score_ranges_checked() {
        let mut config = AppConfig::default();
        config.analyzer.score_threshold = 1.5;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.ner.default_score = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_mask_rejected() {
        let mut config = AppConfig::default();
        config.anonymizer.operators.insert(
            "CVV".to_string(),
            Operator::Mask { masking_char: '*', chars_to_mask: 0, from_end: false },
        );
        assert!(matches!(config.validate(), Err(Fz152Error::Config(_))));
    }

    #[test]
    fn test_debug_redacts_salt() {
        let config = AnonymizerConfig { hash_salt: Some("pepper".to_string()), ..Default::default() };
        assert!(!format!("{:?}", config).contains("pepper"));
    }
}
