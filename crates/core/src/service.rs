//! Privacy filter service - the pipeline behind the HTTP endpoints

use std::sync::Arc;

use fz152_common::privacy::patterns::{EntityType, PiiResult, RecognitionResult};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::analysis::{AnalyzeOptions, AnalyzerEngine};
use crate::anonymization::{AnonymizedText, AnonymizerEngine, OperatorConfig};

/// One detected entity without its value. Offsets count Unicode scalar
/// values, not bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Detected entity type.
    pub entity_type: EntityType,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
    /// Confidence in `[0, 1]`.
    pub score: f64,
}

/// Detected entities of one text, sorted by start.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    /// Entities sorted by start.
    pub entities: Vec<AuditEntry>,
}

impl AuditReport {
    /// Convert byte-offset results of `text` into a character-offset report.
    pub fn from_results(text: &str, results: &[RecognitionResult]) -> Self {
        let entities = results
            .iter()
            .map(|result| {
                let start = text[..result.start].chars().count();
                let end = start + text[result.start..result.end].chars().count();
                AuditEntry { entity_type: result.entity_type.clone(), start, end, score: result.score }
            })
            .collect();
        Self { entities }
    }

    /// Serialize to the wire form.
    pub fn to_json(&self) -> PiiResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether nothing was detected.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Analyze-then-anonymize pipeline over shared, immutable engines.
#[derive(Debug, Clone)]
pub struct PrivacyFilterService {
    analyzer: Arc<AnalyzerEngine>,
    anonymizer: Arc<AnonymizerEngine>,
    operators: Arc<OperatorConfig>,
    language: String,
    options: AnalyzeOptions,
}

impl PrivacyFilterService {
    /// Create a service for the analyzer's language
    pub fn new(
        analyzer: Arc<AnalyzerEngine>,
        anonymizer: Arc<AnonymizerEngine>,
        operators: Arc<OperatorConfig>,
    ) -> Self {
        let language = analyzer.language().to_string();
        Self { analyzer, anonymizer, operators, language, options: AnalyzeOptions::default() }
    }

    /// Analysis options applied to every request
    pub fn with_options(mut self, options: AnalyzeOptions) -> Self {
        self.options = options;
        self
    }

    /// Language the pipeline analyzes.
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Underlying analyzer.
    pub fn analyzer(&self) -> &AnalyzerEngine {
        &self.analyzer
    }

    /// Operator table in use.
    pub fn operators(&self) -> &OperatorConfig {
        &self.operators
    }

    /// Detect and replace every entity in `text`.
    pub fn anonymize_text(&self, text: &str) -> PiiResult<AnonymizedText> {
        let results = self.analyze(text)?;
        self.anonymize(text, &results)
    }

    /// Detect entities without revealing their values.
    pub fn audit_text(&self, text: &str) -> PiiResult<AuditReport> {
        let results = self.analyze(text)?;
        Ok(AuditReport::from_results(text, &results))
    }

    /// [`Self::anonymize_text`] with recognizers fanned out on the blocking
    /// pool.
    pub async fn anonymize_text_concurrent(&self, text: &str) -> PiiResult<AnonymizedText> {
        let results = self.analyze_concurrent(text).await?;
        self.anonymize(text, &results)
    }

    /// [`Self::audit_text`] with recognizers fanned out on the blocking pool.
    pub async fn audit_text_concurrent(&self, text: &str) -> PiiResult<AuditReport> {
        let results = self.analyze_concurrent(text).await?;
        Ok(AuditReport::from_results(text, &results))
    }

    fn analyze(&self, text: &str) -> PiiResult<Vec<RecognitionResult>> {
        self.analyzer.analyze_with(text, &self.language, &self.options).inspect_err(|err| {
            error!(error = %err, text_len = text.len(), "Analysis failed");
        })
    }

    async fn analyze_concurrent(&self, text: &str) -> PiiResult<Vec<RecognitionResult>> {
        self.analyzer.analyze_concurrent(text, &self.language, &self.options).await.inspect_err(
            |err| {
                error!(error = %err, text_len = text.len(), "Concurrent analysis failed");
            },
        )
    }

    fn anonymize(&self, text: &str, results: &[RecognitionResult]) -> PiiResult<AnonymizedText> {
        self.anonymizer.anonymize(text, results, &self.operators).inspect_err(|err| {
            error!(error = %err, spans = results.len(), "Anonymization failed");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognition::defaults::build_registry;
    use fz152_domain::HashType;

    fn service() -> PrivacyFilterService {
        let registry = Arc::new(build_registry("ru", None).unwrap());
        PrivacyFilterService::new(
            Arc::new(AnalyzerEngine::new(registry)),
            Arc::new(AnonymizerEngine::from_salt("salt", HashType::Sha256).unwrap()),
            Arc::new(OperatorConfig::russian_defaults()),
        )
    }

    #[test]
    fn test_anonymize_text() {
        let output = service().anonymize_text("ИНН компании 7707083893").unwrap();
        assert_eq!(output.text, "ИНН компании <INN>");
        assert_eq!(output.items[0].entity_type, EntityType::RuInn);
    }

    /// Validates `PrivacyFilterService::audit_text` behavior for the
    /// character offset scenario.
    ///
    /// Assertions:
    /// - Confirms offsets count characters, not bytes, after Cyrillic text.
    /// - Ensures the serialized report never contains the detected value.
    #[test]
    fn test_audit_uses_char_offsets() {
        let text = "ИНН компании 7707083893";
        let report = service().audit_text(text).unwrap();

        assert_eq!(report.len(), 1);
        assert_eq!(report.entities[0].start, 13);
        assert_eq!(report.entities[0].end, 23);
        let chars: Vec<char> = text.chars().collect();
        let value: String = chars[13..23].iter().collect();
        assert_eq!(value, "7707083893");

        let json = report.to_json().unwrap();
        assert!(!json.contains("7707083893"));
        assert!(json.contains("\"entity_type\":\"RU_INN\""));
    }

    #[test]
    fn test_clean_text_untouched() {
        let service = service();
        let text = "Погода сегодня хорошая";
        assert_eq!(service.anonymize_text(text).unwrap().text, text);
        assert!(service.audit_text(text).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_variants_agree() {
        let service = service();
        let text = "Мой телефон +7 900 123 45 67 и email test@example.com";
        assert_eq!(
            service.anonymize_text(text).unwrap(),
            service.anonymize_text_concurrent(text).await.unwrap()
        );
        assert_eq!(service.audit_text(text).unwrap(), service.audit_text_concurrent(text).await.unwrap());
    }

    #[test]
    fn test_options_apply() {
        let service = service()
            .with_options(AnalyzeOptions::default().with_entities([EntityType::EmailAddress]));
        let output = service.anonymize_text("+7 900 123 45 67, test@example.com").unwrap();
        assert_eq!(output.text, "+7 900 123 45 67, <EMAIL>");
    }
}
