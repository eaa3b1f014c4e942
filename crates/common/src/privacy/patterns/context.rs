//! Context-keyword score boosting
//!
//! Russian is highly inflected: "координаты" appears in text as
//! "координатам", "координатах" and so on. Keywords longer than four
//! characters are therefore reduced to a crude stem (trailing vowels and
//! soft/hard signs removed, never below four characters) and window tokens
//! match by prefix. Short keywords ("тел", "id", "омс") must match exactly.

use super::config::ContextConfig;
use super::error::PiiResult;
use super::types::RecognitionResult;

const MIN_STEM_CHARS: usize = 4;

const STRIPPABLE_ENDINGS: &[char] =
    &['а', 'е', 'ё', 'и', 'о', 'у', 'ы', 'э', 'ю', 'я', 'й', 'ь', 'ъ', 'a', 'e', 'i', 'o', 'u', 'y'];

#[derive(Debug, Clone, PartialEq, Eq)]
struct KeywordToken {
    text: String,
    prefix_match: bool,
}

impl KeywordToken {
    fn new(token: &str) -> Self {
        let chars: Vec<char> = token.chars().collect();
        if chars.len() <= MIN_STEM_CHARS {
            return Self { text: token.to_string(), prefix_match: false };
        }

        let mut keep = chars.len();
        while keep > MIN_STEM_CHARS && STRIPPABLE_ENDINGS.contains(&chars[keep - 1]) {
            keep -= 1;
        }
        Self { text: chars[..keep].iter().collect(), prefix_match: true }
    }

    fn matches(&self, token: &str) -> bool {
        if self.prefix_match {
            token.starts_with(&self.text)
        } else {
            token == self.text
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Keyword {
    original: String,
    tokens: Vec<KeywordToken>,
}

/// Pre-tokenized context keywords of one recognizer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextKeywords {
    keywords: Vec<Keyword>,
}

impl ContextKeywords {
    /// Keywords are trimmed and tokenized. Blank entries are dropped.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = words
            .into_iter()
            .filter_map(|word| {
                let original = word.as_ref().trim().to_string();
                let tokens: Vec<KeywordToken> =
                    tokenize(&original).iter().map(|t| KeywordToken::new(t)).collect();
                (!tokens.is_empty()).then_some(Keyword { original, tokens })
            })
            .collect();
        Self { keywords }
    }

    /// Whether no keyword is configured.
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Number of distinct keywords.
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// First keyword found as a consecutive run in `tokens`.
    fn first_hit(&self, tokens: &[String]) -> Option<&str> {
        self.keywords.iter().find_map(|keyword| {
            let width = keyword.tokens.len();
            let hit = width <= tokens.len()
                && tokens.windows(width).any(|run| {
                    keyword.tokens.iter().zip(run).all(|(expected, actual)| expected.matches(actual))
                });
            hit.then_some(keyword.original.as_str())
        })
    }
}

/// Raises candidate scores when a context keyword sits near the span.
#[derive(Debug, Clone, Copy)]
pub struct ContextEnhancer {
    config: ContextConfig,
}

impl ContextEnhancer {
    /// Enhancer over a validated window and boost.
    pub fn new(config: ContextConfig) -> PiiResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Window and boost in use.
    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    /// Keyword supporting the span `[start, end)`, searched in the prefix
    /// window first, then the suffix window.
    pub fn find_supportive_word<'k>(
        &self,
        text: &str,
        start: usize,
        end: usize,
        keywords: &'k ContextKeywords,
    ) -> Option<&'k str> {
        if keywords.is_empty() {
            return None;
        }

        let prefix = tokens_before(&text[..start], self.config.prefix_tokens);
        if let Some(word) = keywords.first_hit(&prefix) {
            return Some(word);
        }

        let suffix = tokens_after(&text[end..], self.config.suffix_tokens);
        keywords.first_hit(&suffix)
    }

    /// Boost `result` in place. Returns whether a keyword was found.
    pub fn enhance(
        &self,
        text: &str,
        result: &mut RecognitionResult,
        keywords: &ContextKeywords,
    ) -> bool {
        let Some(word) = self.find_supportive_word(text, result.start, result.end, keywords) else {
            return false;
        };

        let boosted = self.config.boosted(result.score);
        if let Some(explanation) = result.analysis_explanation.as_mut() {
            explanation.score_context_improvement = boosted - result.score;
            explanation.supportive_context_word = Some(word.to_string());
        }
        result.score = boosted;
        true
    }
}

impl Default for ContextEnhancer {
    fn default() -> Self {
        Self { config: ContextConfig::default() }
    }
}

fn is_token_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Lower-cased word tokens of `text`, in order.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !is_token_char(c))
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Last `limit` tokens of `text`, in text order, scanning from the end.
fn tokens_before(text: &str, limit: usize) -> Vec<String> {
    let mut tokens: Vec<String> = text
        .rsplit(|c: char| !is_token_char(c))
        .filter(|token| !token.is_empty())
        .take(limit)
        .map(str::to_lowercase)
        .collect();
    tokens.reverse();
    tokens
}

fn tokens_after(text: &str, limit: usize) -> Vec<String> {
    text.split(|c: char| !is_token_char(c))
        .filter(|token| !token.is_empty())
        .take(limit)
        .map(str::to_lowercase)
        .collect()
}
