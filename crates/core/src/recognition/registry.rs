//! Recognizer registry
//!
//! Owns the recognizers of one language in insertion order. The order is
//! observable: conflict resolution breaks exact ties by it.

use std::collections::HashSet;
use std::sync::Arc;

use fz152_common::error::CommonError;
use fz152_common::privacy::patterns::{EntityType, PiiError, PiiResult, Recognizer};
use tracing::debug;

/// Ordered set of recognizers for a single language.
#[derive(Debug, Clone)]
pub struct RecognizerRegistry {
    language: String,
    recognizers: Vec<Arc<dyn Recognizer>>,
}

impl RecognizerRegistry {
    /// Empty registry for `language`.
    pub fn new(language: impl Into<String>) -> Self {
        Self { language: language.into(), recognizers: Vec::new() }
    }

    /// Append a recognizer.
    ///
    /// # Errors
    /// Rejects a recognizer for another language or one whose name is
    /// already registered.
    pub fn add(&mut self, recognizer: Arc<dyn Recognizer>) -> PiiResult<()> {
        if recognizer.supported_language() != self.language {
            return Err(PiiError::UnsupportedLanguage {
                requested: recognizer.supported_language().to_string(),
                supported: self.language.clone(),
            });
        }
        if self.get(recognizer.name()).is_some() {
            return Err(CommonError::validation_with_value(
                "recognizer.name",
                "Recognizer is already registered",
                recognizer.name(),
            )
            .into());
        }

        debug!(
            recognizer = recognizer.name(),
            entities = recognizer.supported_entities().len(),
            "registered recognizer"
        );
        self.recognizers.push(recognizer);
        Ok(())
    }

    /// Builder-style [`Self::add`].
    pub fn with(mut self, recognizer: Arc<dyn Recognizer>) -> PiiResult<Self> {
        self.add(recognizer)?;
        Ok(self)
    }

    /// Language every recognizer serves.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Recognizers in registration order.
    pub fn recognizers(&self) -> &[Arc<dyn Recognizer>] {
        &self.recognizers
    }

    /// Recognizer registered under `name`.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Recognizer>> {
        self.recognizers.iter().find(|r| r.name() == name)
    }

    /// Union of all supported entities, first occurrence order.
    pub fn supported_entities(&self) -> Vec<EntityType> {
        let mut seen = HashSet::new();
        self.recognizers
            .iter()
            .flat_map(|r| r.supported_entities().iter())
            .filter(|entity| seen.insert((*entity).clone()))
            .cloned()
            .collect()
    }

    /// Number of recognizers.
    pub fn len(&self) -> usize {
        self.recognizers.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.recognizers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fz152_common::privacy::patterns::{Pattern, PatternRecognizer};

    fn recognizer(name: &str, entity: EntityType, language: &str) -> Arc<dyn Recognizer> {
        Arc::new(
            PatternRecognizer::builder(name, entity)
                .language(language)
                .pattern(Pattern::new(name, r"\d+", 0.5))
                .build()
                .unwrap(),
        )
    }

    /// Validates `RecognizerRegistry::add` behavior for the registration
    /// rules scenario.
    ///
    /// Assertions:
    /// - Confirms insertion order is preserved.
    /// - Confirms a duplicate name is rejected.
    /// - Confirms a foreign-language recognizer is rejected.
    #[test]
    fn test_add_rules() {
        let mut registry = RecognizerRegistry::new("ru");
        registry.add(recognizer("inn", EntityType::RuInn, "ru")).unwrap();
        registry.add(recognizer("snils", EntityType::RuSnils, "ru")).unwrap();

        let names: Vec<&str> = registry.recognizers().iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["inn", "snils"]);

        assert!(registry.add(recognizer("inn", EntityType::RuInn, "ru")).is_err());
        assert!(matches!(
            registry.add(recognizer("ssn", EntityType::Custom("US_SSN".into()), "en")),
            Err(PiiError::UnsupportedLanguage { .. })
        ));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_supported_entities_deduplicated() {
        let registry = RecognizerRegistry::new("ru")
            .with(recognizer("inn_10", EntityType::RuInn, "ru"))
            .unwrap()
            .with(recognizer("cvv", EntityType::Cvv, "ru"))
            .unwrap()
            .with(recognizer("inn_12", EntityType::RuInn, "ru"))
            .unwrap();

        assert_eq!(registry.supported_entities(), vec![EntityType::RuInn, EntityType::Cvv]);
        assert!(registry.get("cvv").is_some());
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_empty_registry() {
        let registry = RecognizerRegistry::new("ru");
        assert!(registry.is_empty());
        assert_eq!(registry.language(), "ru");
    }
}
