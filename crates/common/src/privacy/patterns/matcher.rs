//! Single-expression matching
//!
//! A [`Pattern`] is the declarative form (name, expression, base score) and
//! a [`PatternMatcher`] is its compiled counterpart. Compilation happens
//! once, when the recognizer registry is built; a malformed expression or an
//! out-of-range score surfaces there and never during analysis.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use super::error::{PiiError, PiiResult};
use crate::error::CommonError;

/// Declarative pattern: name, expression and base score in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    /// Name reported in the analysis explanation.
    pub name: String,
    /// Regular expression source.
    pub regex: String,
    /// Score given to every match.
    pub score: f64,
    /// Reject matches whose first character directly follows a digit.
    #[serde(default)]
    pub not_preceded_by_digit: bool,
}

impl Pattern {
    /// Pattern without the digit guard.
    pub fn new(name: impl Into<String>, regex: impl Into<String>, score: f64) -> Self {
        Self { name: name.into(), regex: regex.into(), score, not_preceded_by_digit: false }
    }

    /// Left guard standing in for a `(?<!\d)` look-behind, which the regex
    /// engine does not support.
    pub fn not_preceded_by_digit(mut self) -> Self {
        self.not_preceded_by_digit = true;
        self
    }

    /// Compile the expression.
    pub fn compile(&self) -> PiiResult<PatternMatcher> {
        PatternMatcher::compile(self)
    }
}

/// One raw hit of a compiled pattern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternMatch {
    /// Byte offset of the first matched character.
    pub start: usize,
    /// Byte offset one past the match.
    pub end: usize,
    /// Score of the pattern that matched.
    pub score: f64,
}

/// Compiled [`Pattern`].
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    name: String,
    regex: Regex,
    score: f64,
    not_preceded_by_digit: bool,
}

impl PatternMatcher {
    /// Compile case-insensitive, multi-line, dot-matches-newline.
    pub fn compile(pattern: &Pattern) -> PiiResult<Self> {
        if !pattern.score.is_finite() || !(0.0..=1.0).contains(&pattern.score) {
            return Err(CommonError::validation_with_value(
                format!("pattern.{}.score", pattern.name),
                "Base score must be within [0, 1]",
                pattern.score.to_string(),
            )
            .into());
        }

        let regex = RegexBuilder::new(&pattern.regex)
            .case_insensitive(true)
            .multi_line(true)
            .dot_matches_new_line(true)
            .build()
            .map_err(|e| PiiError::PatternCompilation {
                name: pattern.name.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            name: pattern.name.clone(),
            regex,
            score: pattern.score,
            not_preceded_by_digit: pattern.not_preceded_by_digit,
        })
    }

    /// Name of the source pattern.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Score of the source pattern.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Every non-overlapping, non-empty match in `text`, left to right.
    pub fn find_matches(&self, text: &str) -> Vec<PatternMatch> {
        let mut matches = Vec::new();
        let mut position = 0;

        while position <= text.len() {
            let Some(found) = self.regex.find_at(text, position) else {
                break;
            };

            if found.is_empty() {
                position = next_char_boundary(text, found.start());
                continue;
            }

            if self.not_preceded_by_digit && preceded_by_digit(text, found.start()) {
                // Retry one character later so a shorter, unguarded match
                // inside the rejected one can still be found.
                position = next_char_boundary(text, found.start());
                continue;
            }

            matches.push(PatternMatch { start: found.start(), end: found.end(), score: self.score });
            position = found.end();
        }

        matches
    }
}

fn preceded_by_digit(text: &str, byte_idx: usize) -> bool {
    text[..byte_idx].chars().next_back().is_some_and(|c| c.is_ascii_digit())
}

fn next_char_boundary(text: &str, byte_idx: usize) -> usize {
    text[byte_idx..].chars().next().map_or(text.len() + 1, |c| byte_idx + c.len_utf8())
}
