//! Port interface for statistical named-entity models
//!
//! The core never loads or runs a model itself. Infrastructure provides an
//! implementation and the [`super::statistical::StatisticalRecognizer`]
//! maps its raw labels into the shared entity vocabulary.

use std::fmt;

use fz152_common::privacy::patterns::PiiResult;
use serde::{Deserialize, Serialize};

/// Raw labelled span as produced by a model, in model vocabulary
/// (`PER`, `LOC`, `ORG`, ...). Byte offsets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NerSpan {
    /// Model label (`PER`, `LOC`, ...).
    pub label: String,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
    /// Model confidence, when the model produces one.
    pub score: Option<f64>,
}

impl NerSpan {
    /// Span without a confidence.
    pub fn new(label: impl Into<String>, start: usize, end: usize) -> Self {
        Self { label: label.into(), start, end, score: None }
    }

    /// Attach the model confidence.
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }
}

/// Trait for named-entity models
pub trait NerModel: Send + Sync + fmt::Debug {
    /// Model identifier used in explanations and logs
    fn name(&self) -> &str;

    /// Language the model was built for
    fn language(&self) -> &str;

    /// Tag `text`
    fn predict(&self, text: &str) -> PiiResult<Vec<NerSpan>>;
}
