//! Statistical entity recognizer
//!
//! Adapts a [`NerModel`] to the [`Recognizer`] trait: raw model labels are
//! mapped into the shared vocabulary, ignored or unmapped labels are
//! dropped, and spans with impossible offsets are discarded with a warning.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use fz152_common::error::CommonError;
use fz152_common::privacy::patterns::{
    AnalysisExplanation, EntityType, PiiError, PiiResult, RecognitionResult, Recognizer,
};
use tracing::{debug, warn};

use super::ports::NerModel;

const DEFAULT_SCORE: f64 = 0.85;
const LOW_CONFIDENCE_MULTIPLIER: f64 = 0.4;

/// How raw model labels become scored results.
#[derive(Debug, Clone, PartialEq)]
pub struct NerModelConfiguration {
    /// Model label to entity label. A target of `O` means "not an entity".
    pub model_to_entity_mapping: HashMap<String, String>,
    /// Model labels dropped before mapping.
    pub labels_to_ignore: HashSet<String>,
    /// Score for spans the model returns without confidence.
    pub default_score: f64,
    /// Entity types whose scores are multiplied down.
    pub low_score_entity_names: HashSet<EntityType>,
    /// Multiplier for `low_score_entity_names`.
    pub low_confidence_score_multiplier: f64,
}

impl Default for NerModelConfiguration {
    fn default() -> Self {
        let mapping = [
            ("PER", "PERSON"),
            ("LOC", "LOCATION"),
            ("GPE", "LOCATION"),
            ("FAC", "LOCATION"),
            ("ORG", "ORGANIZATION"),
            ("NORP", "NORP"),
            ("MISC", "O"),
        ];

        Self {
            model_to_entity_mapping: mapping
                .iter()
                .map(|(label, entity)| ((*label).to_string(), (*entity).to_string()))
                .collect(),
            labels_to_ignore: HashSet::from(["O".to_string()]),
            default_score: DEFAULT_SCORE,
            low_score_entity_names: HashSet::new(),
            low_confidence_score_multiplier: LOW_CONFIDENCE_MULTIPLIER,
        }
    }
}

impl NerModelConfiguration {
    /// Set the score for spans without confidence.
    pub fn with_default_score(mut self, score: f64) -> Self {
        self.default_score = score;
        self
    }

    /// Reject scores and multipliers outside `[0, 1]`.
    pub fn validate(&self) -> PiiResult<()> {
        if !(0.0..=1.0).contains(&self.default_score) {
            return Err(CommonError::config_field(
                "ner.default_score",
                "Default score must be within [0, 1]",
            )
            .into());
        }
        if !(0.0..=1.0).contains(&self.low_confidence_score_multiplier) {
            return Err(CommonError::config_field(
                "ner.low_confidence_score_multiplier",
                "Multiplier must be within [0, 1]",
            )
            .into());
        }
        Ok(())
    }

    /// Entity for a raw label, `None` when ignored or unmapped.
    fn map_label(&self, label: &str) -> Option<EntityType> {
        if self.labels_to_ignore.contains(label) {
            return None;
        }
        let target = self.model_to_entity_mapping.get(label)?;
        if self.labels_to_ignore.contains(target) {
            return None;
        }
        Some(EntityType::from_label(target))
    }

    /// Distinct mapped entities in stable order.
    fn entities(&self) -> Vec<EntityType> {
        let mut entities: Vec<EntityType> = self
            .model_to_entity_mapping
            .keys()
            .filter_map(|label| self.map_label(label))
            .collect();
        entities.sort();
        entities.dedup();
        entities
    }
}

/// Recognizer backed by a statistical NER model.
#[derive(Debug)]
pub struct StatisticalRecognizer {
    name: String,
    model: Arc<dyn NerModel>,
    config: NerModelConfiguration,
    entities: Vec<EntityType>,
}

impl StatisticalRecognizer {
    /// Name used unless [`Self::with_name`] overrides it.
    pub const DEFAULT_NAME: &'static str = "statistical";

    /// Recognizer over `model`.
    ///
    /// # Errors
    /// Fails when `config` does not validate.
    pub fn new(model: Arc<dyn NerModel>, config: NerModelConfiguration) -> PiiResult<Self> {
        config.validate()?;
        let entities = config.entities();
        Ok(Self { name: Self::DEFAULT_NAME.to_string(), model, config, entities })
    }

    /// Register under another name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Label mapping and scores in use.
    pub fn config(&self) -> &NerModelConfiguration {
        &self.config
    }
}

impl Recognizer for StatisticalRecognizer {
    fn name(&self) -> &str {
        &self.name
    }

    fn supported_entities(&self) -> &[EntityType] {
        &self.entities
    }

    fn supported_language(&self) -> &str {
        self.model.language()
    }

    fn analyze(&self, text: &str, language: &str) -> PiiResult<Vec<RecognitionResult>> {
        if language != self.model.language() {
            return Err(PiiError::UnsupportedLanguage {
                requested: language.to_string(),
                supported: self.model.language().to_string(),
            });
        }

        let spans = self.model.predict(text)?;
        let mut results = Vec::with_capacity(spans.len());

        for span in spans {
            let Some(entity) = self.config.map_label(&span.label) else {
                debug!(model = self.model.name(), label = %span.label, "dropping unmapped label");
                continue;
            };

            let candidate = RecognitionResult::new(entity, span.start, span.end, 0.0);
            if !candidate.is_within(text) {
                warn!(
                    model = self.model.name(),
                    label = %span.label,
                    start = span.start,
                    end = span.end,
                    text_len = text.len(),
                    "model returned span with invalid offsets"
                );
                continue;
            }

            let raw_score = span.score.unwrap_or(self.config.default_score).clamp(0.0, 1.0);
            let score = if self.config.low_score_entity_names.contains(&candidate.entity_type) {
                raw_score * self.config.low_confidence_score_multiplier
            } else {
                raw_score
            };

            let explanation = AnalysisExplanation::new(&self.name, raw_score)
                .with_textual_explanation(format!(
                    "Identified as {} by {}",
                    span.label,
                    self.model.name()
                ));
            results.push(RecognitionResult { score, ..candidate }.with_explanation(explanation));
        }

        Ok(results)
    }
}
