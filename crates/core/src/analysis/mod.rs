//! Analysis aggregator
//!
//! Runs every recognizer of a registry over a text, isolates recognizer
//! failures, applies request options and resolves overlapping candidates
//! into a non-overlapping result list sorted by start offset.

mod conflict;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use fz152_common::privacy::patterns::{
    EntityType, PiiError, PiiResult, RecognitionResult, Recognizer,
};
use futures::future::join_all;
use tracing::{debug, instrument, warn};

use crate::recognition::registry::RecognizerRegistry;

pub use conflict::resolve_conflicts;

/// Per-request analysis options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyzeOptions {
    /// Report only these entity types. `None` reports everything.
    pub entities: Option<Vec<EntityType>>,
    /// Overrides the engine threshold for this request.
    pub score_threshold: Option<f64>,
    /// Literal values that are never reported.
    pub allow_list: Vec<String>,
}

impl AnalyzeOptions {
    /// Report only `entities`.
    pub fn with_entities(mut self, entities: impl IntoIterator<Item = EntityType>) -> Self {
        self.entities = Some(entities.into_iter().collect());
        self
    }

    /// Override the engine threshold.
    pub fn with_score_threshold(mut self, threshold: f64) -> Self {
        self.score_threshold = Some(threshold);
        self
    }

    /// Add values that are never reported.
    pub fn with_allow_list<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow_list.extend(values.into_iter().map(Into::into));
        self
    }
}

/// Detection entry point over a shared, immutable registry.
#[derive(Debug, Clone)]
pub struct AnalyzerEngine {
    registry: Arc<RecognizerRegistry>,
    score_threshold: f64,
}

impl AnalyzerEngine {
    /// Engine over `registry` with a zero score threshold.
    pub fn new(registry: Arc<RecognizerRegistry>) -> Self {
        Self { registry, score_threshold: 0.0 }
    }

    /// Results scoring below `threshold` are discarded before conflict
    /// resolution.
    pub fn with_score_threshold(mut self, threshold: f64) -> Self {
        self.score_threshold = threshold;
        self
    }

    /// Recognizers this engine runs.
    pub fn registry(&self) -> &RecognizerRegistry {
        &self.registry
    }

    /// Language served by the registry.
    pub fn language(&self) -> &str {
        self.registry.language()
    }

    /// Non-overlapping results sorted by start offset.
    ///
    /// # Errors
    /// Only for a language the registry does not serve. Recognizer failures
    /// are logged and contribute nothing.
    pub fn analyze(&self, text: &str, language: &str) -> PiiResult<Vec<RecognitionResult>> {
        self.analyze_with(text, language, &AnalyzeOptions::default())
    }

    /// [`Self::analyze`] with per-request options.
    #[instrument(skip_all, fields(text_len = text.len(), language = %language))]
    pub fn analyze_with(
        &self,
        text: &str,
        language: &str,
        options: &AnalyzeOptions,
    ) -> PiiResult<Vec<RecognitionResult>> {
        self.check_language(language)?;

        let candidates: Vec<RecognitionResult> = self
            .registry
            .recognizers()
            .iter()
            .flat_map(|recognizer| run_isolated(recognizer.as_ref(), text, language))
            .collect();

        Ok(self.finalize(text, candidates, options))
    }

    /// Like [`Self::analyze_with`], with recognizers fanned out on the
    /// blocking pool. Results are identical to the sequential path.
    #[instrument(skip_all, fields(text_len = text.len(), language = %language))]
    pub async fn analyze_concurrent(
        &self,
        text: &str,
        language: &str,
        options: &AnalyzeOptions,
    ) -> PiiResult<Vec<RecognitionResult>> {
        self.check_language(language)?;

        let shared: Arc<str> = Arc::from(text);
        let tasks = self.registry.recognizers().iter().map(|recognizer| {
            let recognizer = Arc::clone(recognizer);
            let text = Arc::clone(&shared);
            let language = language.to_string();
            tokio::task::spawn_blocking(move || run_isolated(recognizer.as_ref(), &text, &language))
        });

        let mut candidates = Vec::new();
        for (outcome, recognizer) in join_all(tasks).await.into_iter().zip(self.registry.recognizers())
        {
            match outcome {
                Ok(results) => candidates.extend(results),
                Err(err) => warn!(
                    recognizer = recognizer.name(),
                    error = %err,
                    "recognizer task did not complete, skipping its results"
                ),
            }
        }

        Ok(self.finalize(text, candidates, options))
    }

    fn check_language(&self, language: &str) -> PiiResult<()> {
        if language == self.registry.language() {
            Ok(())
        } else {
            Err(PiiError::UnsupportedLanguage {
                requested: language.to_string(),
                supported: self.registry.language().to_string(),
            })
        }
    }

    fn finalize(
        &self,
        text: &str,
        candidates: Vec<RecognitionResult>,
        options: &AnalyzeOptions,
    ) -> Vec<RecognitionResult> {
        let threshold = options.score_threshold.unwrap_or(self.score_threshold);
        let total = candidates.len();

        let filtered: Vec<RecognitionResult> = candidates
            .into_iter()
            .filter(|result| result.score >= threshold)
            .filter(|result| {
                options.entities.as_ref().map_or(true, |wanted| wanted.contains(&result.entity_type))
            })
            .filter(|result| {
                let value = &text[result.start..result.end];
                !options.allow_list.iter().any(|allowed| allowed == value)
            })
            .collect();

        let resolved = resolve_conflicts(filtered);
        debug!(candidates = total, accepted = resolved.len(), "analysis complete");
        resolved
    }
}

/// Run one recognizer, turning errors and panics into an empty result.
/// Results with impossible offsets are dropped.
fn run_isolated(recognizer: &dyn Recognizer, text: &str, language: &str) -> Vec<RecognitionResult> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| recognizer.analyze(text, language)));

    let results = match outcome {
        Ok(Ok(results)) => results,
        Ok(Err(err)) => {
            warn!(recognizer = recognizer.name(), error = %err, "recognizer failed, skipping its results");
            return Vec::new();
        }
        Err(payload) => {
            warn!(
                recognizer = recognizer.name(),
                panic = panic_message(payload.as_ref()),
                "recognizer panicked, skipping its results"
            );
            return Vec::new();
        }
    };

    let before = results.len();
    let valid: Vec<RecognitionResult> =
        results.into_iter().filter(|result| result.is_within(text)).collect();
    if valid.len() != before {
        warn!(
            recognizer = recognizer.name(),
            dropped = before - valid.len(),
            "recognizer returned results with invalid offsets"
        );
    }
    valid
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}
