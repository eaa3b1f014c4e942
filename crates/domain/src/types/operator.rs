//! Anonymization operators
//!
//! An operator says what replaces a detected span. Operators are plain data;
//! the anonymization engine interprets them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MASKING_CHAR;

/// Digest used by [`Operator::Hash`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashType {
    /// SHA-256.
    #[default]
    Sha256,
    /// SHA-512.
    Sha512,
}

/// Replacement strategy for one entity type.
///
/// Serialized with an inline `type` tag:
///
/// ```toml
/// [anonymizer.operators.RU_PASSPORT]
/// type = "mask"
/// masking_char = "#"
/// chars_to_mask = 6
/// from_end = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operator {
    /// Emit `new_value`, or `<ENTITY_TYPE>` when absent.
    Replace {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        new_value: Option<String>,
    },
    /// Remove the span entirely.
    Redact,
    /// Overwrite `chars_to_mask` characters with `masking_char`.
    Mask {
        #[serde(default = "default_masking_char")]
        masking_char: char,
        chars_to_mask: usize,
        #[serde(default)]
        from_end: bool,
    },
    /// Salted hex digest of the span.
    Hash {
        #[serde(default)]
        hash_type: HashType,
    },
    /// Leave the text as is but still report the span.
    Keep,
}

fn default_masking_char() -> char {
    DEFAULT_MASKING_CHAR
}

impl Operator {
    /// `replace` with an explicit value.
    pub fn replace(new_value: impl Into<String>) -> Self {
        Self::Replace { new_value: Some(new_value.into()) }
    }

    /// Operator name without parameters.
    pub fn kind(&self) -> OperatorKind {
        match self {
            Self::Replace { .. } => OperatorKind::Replace,
            Self::Redact => OperatorKind::Redact,
            Self::Mask { .. } => OperatorKind::Mask,
            Self::Hash { .. } => OperatorKind::Hash,
            Self::Keep => OperatorKind::Keep,
        }
    }
}

/// Operator discriminant, reported with every anonymized span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorKind {
    /// `replace`
    Replace,
    /// `redact`
    Redact,
    /// `mask`
    Mask,
    /// `hash`
    Hash,
    /// `keep`
    Keep,
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Replace => "replace",
            Self::Redact => "redact",
            Self::Mask => "mask",
            Self::Hash => "hash",
            Self::Keep => "keep",
        };
        f.write_str(name)
    }
}
