//! Span replacement
//!
//! Spans are validated up front, replaced from the last to the first so
//! earlier offsets stay valid, and then reported first to last with their
//! position in the output text.

use fz152_common::privacy::hash::{HashAlgorithm, HashConfig, SecureHasher};
use fz152_common::privacy::patterns::{EntityType, PiiError, PiiResult, RecognitionResult};
use fz152_domain::{HashType, Operator, OperatorKind};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::operators::OperatorConfig;

/// One replaced span. Offsets are UTF-8 byte offsets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnonymizedSpan {
    /// Entity type of the replaced span.
    pub entity_type: EntityType,
    /// Operator applied to the span.
    pub operator: OperatorKind,
    /// Span in the input text.
    pub start: usize,
    /// Exclusive end in the input text.
    pub end: usize,
    /// Span in the output text.
    pub output_start: usize,
    /// Exclusive end in the output text.
    pub output_end: usize,
    /// Text written in place of the span. Empty for `keep` and `redact`.
    pub replacement: String,
}

/// Output of [`AnonymizerEngine::anonymize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnonymizedText {
    /// Input text with every span replaced.
    pub text: String,
    /// Ascending by start.
    pub items: Vec<AnonymizedSpan>,
}

/// Applies operators to validated spans.
#[derive(Debug, Clone)]
pub struct AnonymizerEngine {
    hasher: SecureHasher,
}

impl AnonymizerEngine {
    /// Engine whose `hash` operator uses a salt generated now.
    pub fn new() -> PiiResult<Self> {
        let hasher = SecureHasher::new().map_err(|e| PiiError::Anonymization(e.to_string()))?;
        Ok(Self { hasher })
    }

    /// Engine with a fixed salt, so digests are stable across restarts.
    pub fn from_salt(salt: &str, hash_type: HashType) -> PiiResult<Self> {
        let hasher = HashConfig::with_salt(salt, algorithm(hash_type))
            .map(SecureHasher::with_config)
            .map_err(|e| PiiError::Anonymization(e.to_string()))?;
        Ok(Self { hasher })
    }

    /// Engine whose `hash` operator uses `hasher`.
    pub fn with_hasher(hasher: SecureHasher) -> Self {
        Self { hasher }
    }

    /// Replace every span in `results` according to `operators`.
    ///
    /// # Errors
    /// `PiiError::InvalidSpan` when a span is empty, out of bounds, off a
    /// character boundary, out of order or overlapping its predecessor.
    /// `PiiError::Anonymization` when hashing fails.
    #[instrument(skip_all, fields(text_len = text.len(), spans = results.len()))]
    pub fn anonymize(
        &self,
        text: &str,
        results: &[RecognitionResult],
        operators: &OperatorConfig,
    ) -> PiiResult<AnonymizedText> {
        validate_spans(text, results)?;

        if results.is_empty() {
            return Ok(AnonymizedText { text: text.to_string(), items: Vec::new() });
        }

        let mut replacements = Vec::with_capacity(results.len());
        for result in results {
            let operator = operators.resolve(&result.entity_type);
            let original = &text[result.start..result.end];
            replacements.push((operator.kind(), self.apply(operator, &result.entity_type, original)?));
        }

        let mut output = text.to_string();
        for (result, (_, replacement)) in results.iter().zip(&replacements).rev() {
            if let Some(replacement) = replacement {
                output.replace_range(result.start..result.end, replacement);
            }
        }

        let mut grown = 0;
        let mut shrunk = 0;
        let mut items = Vec::with_capacity(results.len());
        for (result, (kind, replacement)) in results.iter().zip(replacements) {
            let original_len = result.len();
            let written_len = replacement.as_ref().map_or(original_len, String::len);
            let output_start = result.start + grown - shrunk;

            items.push(AnonymizedSpan {
                entity_type: result.entity_type.clone(),
                operator: kind,
                start: result.start,
                end: result.end,
                output_start,
                output_end: output_start + written_len,
                replacement: replacement.unwrap_or_default(),
            });

            grown += written_len;
            shrunk += original_len;
        }

        debug!(replaced = items.len(), output_len = output.len(), "anonymization complete");
        Ok(AnonymizedText { text: output, items })
    }

    /// Text written in place of `original`, `None` to leave it untouched.
    fn apply(
        &self,
        operator: &Operator,
        entity: &EntityType,
        original: &str,
    ) -> PiiResult<Option<String>> {
        let replacement = match operator {
            Operator::Replace { new_value } => {
                new_value.clone().unwrap_or_else(|| format!("<{}>", entity))
            }
            Operator::Redact => String::new(),
            Operator::Mask { masking_char, chars_to_mask, from_end } => {
                mask(original, *masking_char, *chars_to_mask, *from_end)
            }
            Operator::Hash { hash_type } => self
                .hasher
                .hash_value_with(original, algorithm(*hash_type))
                .map_err(|e| PiiError::Anonymization(e.to_string()))?,
            Operator::Keep => return Ok(None),
        };
        Ok(Some(replacement))
    }
}

fn algorithm(hash_type: HashType) -> HashAlgorithm {
    match hash_type {
        HashType::Sha256 => HashAlgorithm::Sha256,
        HashType::Sha512 => HashAlgorithm::Sha512,
    }
}

fn mask(original: &str, masking_char: char, chars_to_mask: usize, from_end: bool) -> String {
    let total = original.chars().count();
    let masked = chars_to_mask.min(total);
    let kept = total - masked;

    if from_end {
        original.chars().take(kept).chain(std::iter::repeat(masking_char).take(masked)).collect()
    } else {
        std::iter::repeat(masking_char).take(masked).chain(original.chars().skip(masked)).collect()
    }
}

fn validate_spans(text: &str, results: &[RecognitionResult]) -> PiiResult<()> {
    for (index, result) in results.iter().enumerate() {
        let (start, end) = (result.start, result.end);
        if start >= end {
            return Err(PiiError::invalid_span(format!(
                "span {} [{}, {}) is empty or reversed",
                index, start, end
            )));
        }
        if end > text.len() {
            return Err(PiiError::invalid_span(format!(
                "span {} [{}, {}) exceeds text length {}",
                index,
                start,
                end,
                text.len()
            )));
        }
        if !text.is_char_boundary(start) || !text.is_char_boundary(end) {
            return Err(PiiError::invalid_span(format!(
                "span {} [{}, {}) does not fall on character boundaries",
                index, start, end
            )));
        }

        if let Some(previous) = index.checked_sub(1).map(|i| &results[i]) {
            if start < previous.start {
                return Err(PiiError::invalid_span(format!(
                    "span {} starts at {} before span {} at {}; spans must be sorted by start",
                    index,
                    start,
                    index - 1,
                    previous.start
                )));
            }
            if start < previous.end {
                return Err(PiiError::invalid_span(format!(
                    "span {} [{}, {}) overlaps span {} [{}, {})",
                    index,
                    start,
                    end,
                    index - 1,
                    previous.start,
                    previous.end
                )));
            }
        }
    }
    Ok(())
}
