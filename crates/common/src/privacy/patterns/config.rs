use serde::{Deserialize, Serialize};

use super::error::PiiResult;
use crate::error::CommonError;

const DEFAULT_PREFIX_TOKENS: usize = 5;
const DEFAULT_SUFFIX_TOKENS: usize = 3;
const DEFAULT_SIMILARITY_FACTOR: f64 = 0.35;
const DEFAULT_MIN_SCORE_WITH_CONTEXT: f64 = 0.4;

/// Context window and boost used by [`super::context::ContextEnhancer`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Word tokens inspected before the span.
    pub prefix_tokens: usize,
    /// Word tokens inspected after the span.
    pub suffix_tokens: usize,
    /// Added to the score when a context keyword is found.
    pub similarity_factor: f64,
    /// Floor applied to a boosted score.
    pub min_score_with_context: f64,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            prefix_tokens: DEFAULT_PREFIX_TOKENS,
            suffix_tokens: DEFAULT_SUFFIX_TOKENS,
            similarity_factor: DEFAULT_SIMILARITY_FACTOR,
            min_score_with_context: DEFAULT_MIN_SCORE_WITH_CONTEXT,
        }
    }
}

impl ContextConfig {
    /// Reject factors outside `[0, 1]`.
    pub fn validate(&self) -> PiiResult<()> {
        if !(0.0..=1.0).contains(&self.similarity_factor) {
            return Err(CommonError::config_field(
                "similarity_factor",
                "Context boost must be within [0, 1]",
            )
            .into());
        }

        if !(0.0..=1.0).contains(&self.min_score_with_context) {
            return Err(CommonError::config_field(
                "min_score_with_context",
                "Context score floor must be within [0, 1]",
            )
            .into());
        }

        if self.prefix_tokens == 0 && self.suffix_tokens == 0 {
            return Err(CommonError::config_field(
                "prefix_tokens",
                "Context window cannot be empty on both sides",
            )
            .into());
        }

        Ok(())
    }

    /// Score after a context hit: `min(1.0, max(score + boost, floor))`.
    pub fn boosted(&self, score: f64) -> f64 {
        (score + self.similarity_factor).max(self.min_score_with_context).min(1.0)
    }
}
