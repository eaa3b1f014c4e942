//! Recognizer abstraction and the regex-based implementation
//!
//! Every detector in the pipeline implements [`Recognizer`]. The aggregator
//! treats them uniformly and never inspects which kind it is running.

use std::fmt;

use tracing::debug;

use super::config::ContextConfig;
use super::context::{ContextEnhancer, ContextKeywords};
use super::error::{PiiError, PiiResult};
use super::matcher::{Pattern, PatternMatcher};
use super::types::{AnalysisExplanation, EntityType, RecognitionResult, ValidationOutcome};
use super::validators::Validator;
use crate::error::CommonError;

/// A detector producing scored spans for one language.
///
/// Implementations must be cheap to share: the registry holds them behind
/// `Arc` and calls `analyze` from many requests at once.
pub trait Recognizer: Send + Sync + fmt::Debug {
    /// Unique name inside a registry.
    fn name(&self) -> &str;

    /// Entity types this recognizer can report.
    fn supported_entities(&self) -> &[EntityType];

    /// Language code served, such as `ru`.
    fn supported_language(&self) -> &str;

    /// Scored spans found in `text`. Byte offsets, char-aligned.
    fn analyze(&self, text: &str, language: &str) -> PiiResult<Vec<RecognitionResult>>;
}

/// Regex recognizer for a single entity type.
pub struct PatternRecognizer {
    name: String,
    entities: [EntityType; 1],
    language: String,
    matchers: Vec<PatternMatcher>,
    context: ContextKeywords,
    enhancer: ContextEnhancer,
    validator: Option<Validator>,
}

impl fmt::Debug for PatternRecognizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternRecognizer")
            .field("name", &self.name)
            .field("entity", &self.entities[0])
            .field("language", &self.language)
            .field("patterns", &self.matchers.iter().map(PatternMatcher::name).collect::<Vec<_>>())
            .field("context_keywords", &self.context.len())
            .field("validated", &self.validator.is_some())
            .finish()
    }
}

impl PatternRecognizer {
    /// Start a recognizer for a single entity type.
    pub fn builder(name: impl Into<String>, entity: EntityType) -> PatternRecognizerBuilder {
        PatternRecognizerBuilder {
            name: name.into(),
            entity,
            language: "ru".to_string(),
            patterns: Vec::new(),
            context: Vec::new(),
            context_config: ContextConfig::default(),
            validator: None,
        }
    }

    /// Recognizer matching whole words from `words`.
    ///
    /// Longer words are tried first so that a word which is a prefix of
    /// another never shortens the match.
    pub fn from_deny_list<I, S>(
        name: impl Into<String>,
        entity: EntityType,
        language: impl Into<String>,
        words: I,
        score: f64,
    ) -> PiiResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let name = name.into();
        let mut words: Vec<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();
        if words.is_empty() {
            return Err(CommonError::config_field(
                format!("recognizer.{}", name),
                "Deny list cannot be empty",
            )
            .into());
        }
        words.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then_with(|| a.cmp(b)));
        words.dedup();

        let alternation = words.iter().map(|w| regex::escape(w)).collect::<Vec<_>>().join("|");
        let pattern = Pattern::new(format!("{}_deny_list", name), format!(r"\b(?:{})\b", alternation), score);

        Self::builder(name, entity).language(language).pattern(pattern).build()
    }

    /// The entity type this recognizer reports.
    pub fn entity(&self) -> &EntityType {
        &self.entities[0]
    }

    fn analyze_matches(&self, text: &str) -> Vec<RecognitionResult> {
        let mut results = Vec::new();

        for matcher in &self.matchers {
            for found in matcher.find_matches(text) {
                let mut explanation = AnalysisExplanation::new(&self.name, found.score)
                    .with_pattern(matcher.name());
                let mut score = found.score;

                if let Some(validate) = self.validator {
                    let verdict = validate(&text[found.start..found.end]);
                    explanation.validation_result = Some(verdict);
                    match verdict {
                        ValidationOutcome::Valid => score = 1.0,
                        ValidationOutcome::Invalid => {
                            debug!(
                                recognizer = %self.name,
                                pattern = matcher.name(),
                                start = found.start,
                                "candidate failed validation"
                            );
                            continue;
                        }
                        ValidationOutcome::Unknown => {}
                    }
                }

                let mut result = RecognitionResult::new(
                    self.entities[0].clone(),
                    found.start,
                    found.end,
                    score,
                )
                .with_explanation(explanation);

                self.enhancer.enhance(text, &mut result, &self.context);
                results.push(result);
            }
        }

        results
    }
}

impl Recognizer for PatternRecognizer {
    fn name(&self) -> &str {
        &self.name
    }

    /// Entity types this recognizer can report.
    fn supported_entities(&self) -> &[EntityType] {
        &self.entities
    }

    /// Language code served, such as `ru`.
    fn supported_language(&self) -> &str {
        &self.language
    }

    fn analyze(&self, text: &str, language: &str) -> PiiResult<Vec<RecognitionResult>> {
        if language != self.language {
            return Err(PiiError::UnsupportedLanguage {
                requested: language.to_string(),
                supported: self.language.clone(),
            });
        }
        Ok(self.analyze_matches(text))
    }
}

/// Builder for [`PatternRecognizer`]; all validation happens in
/// [`PatternRecognizerBuilder::build`].
#[derive(Debug)]
pub struct PatternRecognizerBuilder {
    name: String,
    entity: EntityType,
    language: String,
    patterns: Vec<Pattern>,
    context: Vec<String>,
    context_config: ContextConfig,
    validator: Option<Validator>,
}

impl PatternRecognizerBuilder {
    /// Language served. Defaults to `ru`.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Add a pattern. At least one is required.
    pub fn pattern(mut self, pattern: Pattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    /// Keywords that boost a match found near them.
    pub fn context<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.context.extend(words.into_iter().map(Into::into));
        self
    }

    /// Context window and boost.
    pub fn context_config(mut self, config: ContextConfig) -> Self {
        self.context_config = config;
        self
    }

    /// Checksum or structure check run on every match.
    pub fn validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Compile every pattern.
    ///
    /// # Errors
    /// Fails on a blank name, no patterns, a score outside `[0, 1]` or an
    /// invalid expression.
    pub fn build(self) -> PiiResult<PatternRecognizer> {
        if self.name.trim().is_empty() {
            return Err(CommonError::config_field("recognizer.name", "Name cannot be empty").into());
        }
        if self.patterns.is_empty() {
            return Err(CommonError::config_field(
                format!("recognizer.{}", self.name),
                "At least one pattern is required",
            )
            .into());
        }

        let matchers =
            self.patterns.iter().map(PatternMatcher::compile).collect::<PiiResult<Vec<_>>>()?;

        Ok(PatternRecognizer {
            name: self.name,
            entities: [self.entity],
            language: self.language,
            matchers,
            context: ContextKeywords::new(&self.context),
            enhancer: ContextEnhancer::new(self.context_config)?,
            validator: self.validator,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::privacy::patterns::validators;

    fn cvv() -> PatternRecognizer {
        PatternRecognizer::builder("cvv", EntityType::Cvv)
            .pattern(Pattern::new("cvv_pattern", r"\b\d{3,4}\b", 0.6))
            .context(["cvv", "cvc", "код безопасности"])
            .build()
            .unwrap()
    }

    /// Validates `PatternRecognizer::analyze` behavior for the context boost
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms "CVV 123" scores higher than a bare "123".
    /// - Ensures the boosted score stays within 1.0.
    #[test]
    fn test_context_raises_score() {
        let recognizer = cvv();
        let with_context = recognizer.analyze("CVV 123", "ru").unwrap();
        let bare = recognizer.analyze("число 123", "ru").unwrap();

        assert_eq!(with_context.len(), 1);
        assert_eq!(bare.len(), 1);
        assert!(with_context[0].score > bare[0].score);
        assert!(with_context[0].score <= 1.0);
        assert_eq!(with_context[0].entity_type, EntityType::Cvv);
    }

    #[test]
    fn test_explanation_is_recorded() {
        let result = cvv().analyze("CVC: 4567", "ru").unwrap().remove(0);
        let explanation = result.analysis_explanation.unwrap();
        assert_eq!(explanation.recognizer, "cvv");
        assert_eq!(explanation.pattern_name.as_deref(), Some("cvv_pattern"));
        assert_eq!(explanation.supportive_context_word.as_deref(), Some("cvc"));
    }

    /// Validates `PatternRecognizer::analyze` behavior for the validator
    /// outcome scenario.
    ///
    /// Assertions:
    /// - Confirms a valid card is lifted to 1.0.
    /// - Confirms an invalid card is dropped.
    #[test]
    fn test_validator_outcomes() {
        let cards = PatternRecognizer::builder("credit_card", EntityType::CreditCard)
            .pattern(Pattern::new("card_16", r"\b\d{4}[\s-]?\d{4}[\s-]?\d{4}[\s-]?\d{4}\b", 0.3))
            .validator(validators::luhn)
            .build()
            .unwrap();

        let valid = cards.analyze("4111 1111 1111 1111", "ru").unwrap();
        assert_eq!(valid.len(), 1);
        assert!((valid[0].score - 1.0).abs() < f64::EPSILON);
        assert_eq!(
            valid[0].analysis_explanation.as_ref().unwrap().validation_result,
            Some(ValidationOutcome::Valid)
        );

        assert!(cards.analyze("1234567890123456", "ru").unwrap().is_empty());
    }

    #[test]
    fn test_intra_recognizer_overlaps_kept() {
        let inn = PatternRecognizer::builder("inn", EntityType::RuInn)
            .pattern(Pattern::new("digits_4", r"\d{4}", 0.5))
            .pattern(Pattern::new("digits_6", r"\d{6}", 0.5))
            .build()
            .unwrap();
        assert_eq!(inn.analyze("123456", "ru").unwrap().len(), 2);
    }

    #[test]
    fn test_language_mismatch_is_error() {
        assert!(matches!(
            cvv().analyze("CVV 123", "en"),
            Err(PiiError::UnsupportedLanguage { .. })
        ));
    }

    /// Validates `PatternRecognizer::from_deny_list` behavior for the
    /// nationality list scenario.
    ///
    /// Assertions:
    /// - Confirms whole words are matched case-insensitively.
    /// - Ensures words embedded in longer words are not matched.
    #[test]
    fn test_deny_list() {
        let norp = PatternRecognizer::from_deny_list(
            "norp",
            EntityType::Norp,
            "ru",
            ["русские", "американцы"],
            0.6,
        )
        .unwrap();

        let text = "Русские и американцы встретились.";
        let found = norp.analyze(text, "ru").unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(&text[found[0].start..found[0].end], "Русские");

        assert!(norp.analyze("нерусские", "ru").unwrap().is_empty());
    }

    #[test]
    fn test_build_errors() {
        assert!(PatternRecognizer::builder("empty", EntityType::Cvv).build().is_err());
        assert!(PatternRecognizer::builder("bad", EntityType::Cvv)
            .pattern(Pattern::new("bad", "[", 0.5))
            .build()
            .is_err());
        assert!(PatternRecognizer::from_deny_list("norp", EntityType::Norp, "ru", Vec::<String>::new(), 0.6)
            .is_err());
    }
}
