//! Rule-based tagger over a [`Lexicon`]
//!
//! Emits model-vocabulary labels (`PER`, `LOC`, `ORG`, `NORP`) that the
//! statistical recognizer maps into entity types. Evidence rules:
//! - a run of capitalized words is a person when it holds a known first
//!   name, a patronymic, or initials next to a surname-shaped word, or when
//!   a title such as "господин" precedes it
//! - a legal form followed by a quoted or capitalized name is an
//!   organization, as is a known organization name
//! - capitalized words after a location marker ("г.", "улица") are a
//!   location, as is a known place name
//! - known nationalities are `NORP`
//!
//! Capitalized words opening a sentence only count with name evidence, and
//! stop words never count.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use fz152_common::privacy::patterns::PiiResult;
use fz152_core::{NerModel, NerSpan};
use fz152_domain::Result;

use super::lexicon::Lexicon;

/// Name reported in analysis explanations.
pub const MODEL_NAME: &str = "lexicon";
const LANGUAGE: &str = "ru";

const PER: &str = "PER";
const LOC: &str = "LOC";
const ORG: &str = "ORG";
const NORP: &str = "NORP";

const MIN_INFLECTED_STEM: usize = 3;
const MIN_PATRONYMIC_STEM: usize = 5;
const MIN_SURNAME_STEM: usize = 4;
const MAX_PERSON_TOKENS: usize = 4;
const MAX_NAME_TOKENS: usize = 3;
const MAX_QUOTED_NAME_BYTES: usize = 120;

/// Case and number endings accepted after a lexicon stem.
const ENDINGS: &[&str] = &[
    "", "а", "я", "у", "ю", "е", "и", "ы", "о", "ь", "й", "м", "х", "ми", "ой", "ей", "ом", "ем",
    "ою", "ею", "ам", "ям", "ах", "ях", "ов", "ев", "ами", "ями", "ия", "ии", "ию", "ией", "ие",
    "ий", "их", "им", "ими", "ый", "ая", "ое", "ые", "ых", "ым", "ыми", "ую", "ого", "его", "ому",
    "ему",
];

fn lowercase_chars(word: &str) -> Vec<char> {
    word.trim().to_lowercase().chars().collect()
}

fn is_soft_ending(c: char) -> bool {
    matches!(c, 'а' | 'я' | 'о' | 'е' | 'ё' | 'и' | 'ы' | 'у' | 'ю' | 'й' | 'ь')
}

fn is_ending(rest: &[char]) -> bool {
    ENDINGS.iter().any(|ending| ending.chars().eq(rest.iter().copied()))
}

/// `token` is `entry` or the stem of `entry` plus a known ending.
fn inflected_match(token: &[char], entry: &[char]) -> bool {
    if token == entry {
        return true;
    }
    let stem = match entry.split_last() {
        Some((last, rest)) if is_soft_ending(*last) => rest,
        _ => entry,
    };
    stem.len() >= MIN_INFLECTED_STEM && token.starts_with(stem) && is_ending(&token[stem.len()..])
}

/// `token` minus some ending ends with one of `suffixes`.
fn has_suffix_stem(token: &[char], suffixes: &[Vec<char>], min_stem: usize) -> bool {
    (min_stem..=token.len()).rev().any(|cut| {
        is_ending(&token[cut..]) && suffixes.iter().any(|suffix| token[..cut].ends_with(suffix))
    })
}

#[derive(Debug, Default)]
struct Terms {
    phrases: Vec<Vec<Vec<char>>>,
}

impl Terms {
    fn new(entries: &[String]) -> Self {
        let phrases = entries
            .iter()
            .map(|entry| entry.split_whitespace().map(lowercase_chars).collect::<Vec<_>>())
            .filter(|phrase| !phrase.is_empty())
            .collect();
        Self { phrases }
    }

    fn len(&self) -> usize {
        self.phrases.len()
    }

    fn contains_exact(&self, word: &[char]) -> bool {
        self.phrases.iter().any(|phrase| phrase.len() == 1 && phrase[0] == word)
    }

    fn matches_word(&self, word: &[char]) -> bool {
        self.phrases.iter().any(|phrase| phrase.len() == 1 && inflected_match(word, &phrase[0]))
    }

    /// Width in tokens of the longest phrase starting at `tokens[at]`.
    fn match_at(&self, tokens: &[Token<'_>], at: usize) -> Option<usize> {
        let available = &tokens[at..];
        self.phrases
            .iter()
            .filter(|phrase| {
                phrase.len() <= available.len()
                    && phrase.iter().zip(available).all(|(word, token)| inflected_match(&token.lower, word))
            })
            .map(Vec::len)
            .max()
    }
}

#[derive(Debug)]
struct Token<'t> {
    text: &'t str,
    lower: Vec<char>,
    start: usize,
    end: usize,
    capitalized: bool,
    sentence_start: bool,
    followed_by_dot: bool,
}

impl Token<'_> {
    fn is_initial(&self) -> bool {
        self.lower.len() == 1 && self.capitalized && self.followed_by_dot
    }

    fn is_alphabetic(&self) -> bool {
        self.text.chars().all(|c| c.is_alphabetic() || c == '-')
    }

    fn is_all_caps(&self) -> bool {
        self.lower.len() > 1 && self.text.chars().filter(|c| c.is_alphabetic()).all(char::is_uppercase)
    }
}

/// Lexicon-driven implementation of the `NerModel` port.
pub struct LexiconNerModel {
    first_names: Terms,
    surname_suffixes: Vec<Vec<char>>,
    patronymic_suffixes: Vec<Vec<char>>,
    person_titles: Terms,
    org_forms: HashSet<String>,
    organizations: Terms,
    locations: Terms,
    location_markers: Terms,
    nationalities: Terms,
    stop_words: HashSet<String>,
}

impl fmt::Debug for LexiconNerModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LexiconNerModel")
            .field("first_names", &self.first_names.len())
            .field("organizations", &self.organizations.len())
            .field("locations", &self.locations.len())
            .field("nationalities", &self.nationalities.len())
            .finish()
    }
}

impl LexiconNerModel {
    /// Model over `lexicon`. Terms are normalized once.
    pub fn new(lexicon: &Lexicon) -> Self {
        let suffixes =
            |entries: &[String]| entries.iter().map(|s| lowercase_chars(s)).collect::<Vec<_>>();

        Self {
            first_names: Terms::new(&lexicon.first_names),
            surname_suffixes: suffixes(&lexicon.surname_suffixes),
            patronymic_suffixes: suffixes(&lexicon.patronymic_suffixes),
            person_titles: Terms::new(&lexicon.person_titles),
            org_forms: lexicon.org_forms.iter().map(|form| form.trim().to_string()).collect(),
            organizations: Terms::new(&lexicon.organizations),
            locations: Terms::new(&lexicon.locations),
            location_markers: Terms::new(&lexicon.location_markers),
            nationalities: Terms::new(&lexicon.nationalities),
            stop_words: lexicon.stop_words.iter().map(|w| w.trim().to_lowercase()).collect(),
        }
    }

    /// Model over the embedded Russian lexicon.
    pub fn embedded() -> Result<Self> {
        Ok(Self::new(&Lexicon::embedded()?))
    }

    /// Model over a lexicon file
    ///
    /// # Errors
    /// Returns `Fz152Error::Model` when the file is missing or invalid.
    pub fn from_path(path: &Path) -> Result<Self> {
        Ok(Self::new(&Lexicon::from_path(path)?))
    }

    /// Labelled, non-overlapping spans in text order.
    pub fn tag(&self, text: &str) -> Vec<NerSpan> {
        let tokens = self.tokenize(text);
        let mut spans = Vec::new();

        self.tag_organizations(text, &tokens, &mut spans);
        self.tag_locations(text, &tokens, &mut spans);
        self.tag_nationalities(&tokens, &mut spans);
        self.tag_persons(text, &tokens, &mut spans);

        select_non_overlapping(spans)
    }

    fn tokenize<'t>(&self, text: &'t str) -> Vec<Token<'t>> {
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let mut tokens: Vec<Token<'t>> = Vec::new();
        let mut i = 0;

        while i < chars.len() {
            if !chars[i].1.is_alphanumeric() {
                i += 1;
                continue;
            }

            let mut j = i + 1;
            while j < chars.len() {
                let c = chars[j].1;
                if c.is_alphanumeric() {
                    j += 1;
                } else if c == '-' && chars.get(j + 1).is_some_and(|(_, next)| next.is_alphanumeric()) {
                    j += 2;
                } else {
                    break;
                }
            }

            let start = chars[i].0;
            let end = chars.get(j).map_or(text.len(), |(offset, _)| *offset);
            let word = &text[start..end];
            let sentence_start = match tokens.last() {
                None => true,
                Some(prev) => self.sentence_boundary(&text[prev.end..start], prev),
            };

            tokens.push(Token {
                text: word,
                lower: word.to_lowercase().chars().collect(),
                start,
                end,
                capitalized: word.chars().next().is_some_and(char::is_uppercase),
                sentence_start,
                followed_by_dot: text[end..].starts_with('.'),
            });
            i = j;
        }

        tokens
    }

    fn is_abbreviation(&self, token: &Token<'_>) -> bool {
        token.followed_by_dot
            && (token.lower.len() == 1
                || self.location_markers.contains_exact(&token.lower)
                || self.person_titles.contains_exact(&token.lower))
    }

    fn sentence_boundary(&self, gap: &str, prev: &Token<'_>) -> bool {
        gap.contains(|c: char| matches!(c, '!' | '?' | '\n'))
            || (gap.contains('.') && !self.is_abbreviation(prev))
    }

    /// Whether `next` continues a name started by `prev`: only spaces
    /// between them, plus the dot of an abbreviation.
    fn joined(&self, text: &str, prev: &Token<'_>, next: &Token<'_>) -> bool {
        let gap = &text[prev.end..next.start];
        let gap = if self.is_abbreviation(prev) { &gap[1..] } else { gap };
        gap.chars().all(|c| c.is_whitespace() && c != '\n')
    }

    fn is_stop_word(&self, token: &Token<'_>) -> bool {
        self.stop_words.contains(&token.text.to_lowercase())
    }

    /// Last index of a run of capitalized words starting at `from`.
    fn capitalized_run(&self, text: &str, tokens: &[Token<'_>], from: usize) -> Option<usize> {
        let mut last = None;
        let mut prev = from.checked_sub(1)?;

        for (index, token) in tokens.iter().enumerate().skip(from).take(MAX_NAME_TOKENS) {
            if !token.capitalized || self.is_stop_word(token) || !self.joined(text, &tokens[prev], token) {
                break;
            }
            last = Some(index);
            prev = index;
        }

        last
    }

    fn tag_organizations(&self, text: &str, tokens: &[Token<'_>], spans: &mut Vec<NerSpan>) {
        for (i, token) in tokens.iter().enumerate() {
            if self.org_forms.contains(token.text) {
                if let Some(end) = quoted_name_end(text, token.end) {
                    spans.push(NerSpan::new(ORG, token.start, end));
                } else if let Some(last) = self.capitalized_run(text, tokens, i + 1) {
                    spans.push(NerSpan::new(ORG, token.start, tokens[last].end));
                }
                continue;
            }

            if token.capitalized {
                if let Some(width) = self.organizations.match_at(tokens, i) {
                    spans.push(NerSpan::new(ORG, token.start, tokens[i + width - 1].end));
                }
            }
        }
    }

    fn tag_locations(&self, text: &str, tokens: &[Token<'_>], spans: &mut Vec<NerSpan>) {
        for (i, token) in tokens.iter().enumerate() {
            if !token.is_initial() && self.location_markers.matches_word(&token.lower) {
                if let Some(last) = self.capitalized_run(text, tokens, i + 1) {
                    spans.push(NerSpan::new(LOC, tokens[i + 1].start, tokens[last].end));
                }
                continue;
            }

            if token.capitalized {
                if let Some(width) = self.locations.match_at(tokens, i) {
                    spans.push(NerSpan::new(LOC, token.start, tokens[i + width - 1].end));
                }
            }
        }
    }

    fn tag_nationalities(&self, tokens: &[Token<'_>], spans: &mut Vec<NerSpan>) {
        spans.extend(
            tokens
                .iter()
                .filter(|token| self.nationalities.matches_word(&token.lower))
                .map(|token| NerSpan::new(NORP, token.start, token.end)),
        );
    }

    fn tag_persons(&self, text: &str, tokens: &[Token<'_>], spans: &mut Vec<NerSpan>) {
        let mut i = 0;
        while i < tokens.len() {
            if !self.person_candidate(&tokens[i]) {
                i += 1;
                continue;
            }

            let mut last = i;
            while last + 1 < tokens.len()
                && last + 1 - i < MAX_PERSON_TOKENS
                && self.person_candidate(&tokens[last + 1])
                && self.joined(text, &tokens[last], &tokens[last + 1])
            {
                last += 1;
            }

            let run = &tokens[i..=last];
            let titled = i > 0
                && self.person_titles.matches_word(&tokens[i - 1].lower)
                && self.joined(text, &tokens[i - 1], &tokens[i]);

            if self.is_person(run) || (titled && run.iter().any(|token| !token.is_initial())) {
                let tail = &tokens[last];
                let end = if tail.is_initial() { tail.end + 1 } else { tail.end };
                spans.push(NerSpan::new(PER, tokens[i].start, end));
            }
            i = last + 1;
        }
    }

    fn person_candidate(&self, token: &Token<'_>) -> bool {
        if token.is_initial() {
            return true;
        }
        token.capitalized
            && token.is_alphabetic()
            && !token.is_all_caps()
            && !self.is_stop_word(token)
            && !self.names_something_else(token)
            && (!token.sentence_start || self.has_name_evidence(&token.lower))
    }

    fn names_something_else(&self, token: &Token<'_>) -> bool {
        self.org_forms.contains(token.text)
            || self.organizations.matches_word(&token.lower)
            || self.locations.matches_word(&token.lower)
            || self.location_markers.matches_word(&token.lower)
            || self.nationalities.matches_word(&token.lower)
            || self.person_titles.matches_word(&token.lower)
    }

    fn has_name_evidence(&self, word: &[char]) -> bool {
        self.first_names.matches_word(word)
            || has_suffix_stem(word, &self.patronymic_suffixes, MIN_PATRONYMIC_STEM)
    }

    fn is_person(&self, run: &[Token<'_>]) -> bool {
        if run.iter().any(|token| !token.is_initial() && self.has_name_evidence(&token.lower)) {
            return true;
        }
        run.iter().any(Token::is_initial)
            && run.iter().any(|token| {
                !token.is_initial()
                    && has_suffix_stem(&token.lower, &self.surname_suffixes, MIN_SURNAME_STEM)
            })
    }
}

impl NerModel for LexiconNerModel {
    fn name(&self) -> &str {
        MODEL_NAME
    }

    fn language(&self) -> &str {
        LANGUAGE
    }

    fn predict(&self, text: &str) -> PiiResult<Vec<NerSpan>> {
        Ok(self.tag(text))
    }
}

/// End of a quoted name opening right after `from`, closing quote included.
fn quoted_name_end(text: &str, from: usize) -> Option<usize> {
    let rest = &text[from..];
    let trimmed = rest.trim_start();
    let open_at = from + (rest.len() - trimmed.len());

    let open = trimmed.chars().next()?;
    let closers: &[char] = match open {
        '«' => &['»'],
        '"' => &['"'],
        '„' => &['“', '”'],
        '“' => &['”'],
        _ => return None,
    };

    let body_start = open_at + open.len_utf8();
    let body = &text[body_start..];
    let close = body.find(|c: char| closers.contains(&c))?;
    if close == 0 || close > MAX_QUOTED_NAME_BYTES || body[..close].contains('\n') {
        return None;
    }

    let closer_len = body[close..].chars().next().map_or(1, char::len_utf8);
    Some(body_start + close + closer_len)
}

/// Earliest-first, longest-first greedy selection.
fn select_non_overlapping(mut spans: Vec<NerSpan>) -> Vec<NerSpan> {
    spans.sort_by(|a, b| {
        a.start.cmp(&b.start).then_with(|| (b.end - b.start).cmp(&(a.end - a.start)))
    });

    let mut selected: Vec<NerSpan> = Vec::with_capacity(spans.len());
    for span in spans {
        if selected.last().map_or(true, |last| span.start >= last.end) {
            selected.push(span);
        }
    }
    selected
}
