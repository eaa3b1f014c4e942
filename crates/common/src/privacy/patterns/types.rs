//! Shared vocabulary of the detection pipeline
//!
//! Offsets in [`RecognitionResult`] are UTF-8 byte offsets into the analyzed
//! text and always fall on character boundaries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Category of personal data a span belongs to.
///
/// Serializes as the upper-case label (`"RU_PASSPORT"`); unknown labels round
/// trip through [`EntityType::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntityType {
    // Named entities
    /// `PERSON`
    Person,
    /// `ORGANIZATION`
    Organization,
    /// `LOCATION`
    Location,
    /// `NORP`: nationalities, religious or political groups.
    Norp,

    // Contacts and network identifiers
    /// `PHONE_NUMBER`
    PhoneNumber,
    /// `EMAIL_ADDRESS`
    EmailAddress,
    /// `IP_ADDRESS`: IPv4 or IPv6.
    IpAddress,
    /// `MAC_ADDRESS`
    MacAddress,
    /// `EME_IMEI`: device identifier.
    EmeImei,
    /// `TG_CHAT_ID`: Telegram user or channel id.
    TgChatId,

    // Financial
    /// `IBAN_CODE`
    IbanCode,
    /// `CRYPTO`: Bitcoin wallet address.
    Crypto,
    /// `CREDIT_CARD`
    CreditCard,
    /// `CVV`
    Cvv,

    // Russian documents
    /// `RU_PASSPORT`: internal passport.
    RuPassport,
    /// `RU_INT_PASSPORT`: international passport.
    RuIntPassport,
    /// `RU_INN`: taxpayer number.
    RuInn,
    /// `RU_SNILS`: pension insurance number.
    RuSnils,
    /// `RU_DRIVER_LICENSE`
    RuDriverLicense,
    /// `RU_OMS`: medical insurance policy.
    RuOms,
    /// `RU_VEHICLE_PLATE`
    RuVehiclePlate,

    // Other
    /// `GPS_COORDS`
    GpsCoords,
    /// `DATE_TIME`
    DateTime,

    /// Any other label, upper-cased.
    Custom(String),
}

impl EntityType {
    /// Every built-in entity type, in vocabulary order.
    pub const BUILTIN: [EntityType; 23] = [
        Self::Person,
        Self::Organization,
        Self::Location,
        Self::PhoneNumber,
        Self::EmailAddress,
        Self::IpAddress,
        Self::IbanCode,
        Self::Crypto,
        Self::CreditCard,
        Self::MacAddress,
        Self::EmeImei,
        Self::Cvv,
        Self::RuPassport,
        Self::RuIntPassport,
        Self::RuInn,
        Self::RuSnils,
        Self::RuDriverLicense,
        Self::RuOms,
        Self::RuVehiclePlate,
        Self::TgChatId,
        Self::GpsCoords,
        Self::DateTime,
        Self::Norp,
    ];

    /// Canonical label, as used in configuration and JSON.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Person => "PERSON",
            Self::Organization => "ORGANIZATION",
            Self::Location => "LOCATION",
            Self::Norp => "NORP",
            Self::PhoneNumber => "PHONE_NUMBER",
            Self::EmailAddress => "EMAIL_ADDRESS",
            Self::IpAddress => "IP_ADDRESS",
            Self::MacAddress => "MAC_ADDRESS",
            Self::EmeImei => "EME_IMEI",
            Self::TgChatId => "TG_CHAT_ID",
            Self::IbanCode => "IBAN_CODE",
            Self::Crypto => "CRYPTO",
            Self::CreditCard => "CREDIT_CARD",
            Self::Cvv => "CVV",
            Self::RuPassport => "RU_PASSPORT",
            Self::RuIntPassport => "RU_INT_PASSPORT",
            Self::RuInn => "RU_INN",
            Self::RuSnils => "RU_SNILS",
            Self::RuDriverLicense => "RU_DRIVER_LICENSE",
            Self::RuOms => "RU_OMS",
            Self::RuVehiclePlate => "RU_VEHICLE_PLATE",
            Self::GpsCoords => "GPS_COORDS",
            Self::DateTime => "DATE_TIME",
            Self::Custom(label) => label,
        }
    }

    /// Parse a label; anything outside the built-in vocabulary becomes
    /// `Custom` with the label upper-cased.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        Self::BUILTIN
            .iter()
            .find(|entity| entity.as_str().eq_ignore_ascii_case(label))
            .cloned()
            .unwrap_or_else(|| Self::Custom(label.to_uppercase()))
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for EntityType {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<&str> for EntityType {
    fn from(label: &str) -> Self {
        Self::from_label(label)
    }
}

impl From<EntityType> for String {
    fn from(entity: EntityType) -> Self {
        entity.as_str().to_string()
    }
}

impl FromStr for EntityType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_label(s))
    }
}

/// Outcome of a checksum or structure validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationOutcome {
    /// Checksum verified, the candidate is certain.
    Valid,
    /// Structurally impossible, the candidate is dropped.
    Invalid,
    /// No verdict, the score is kept.
    Unknown,
}

/// How a score came about. Never contains the matched text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisExplanation {
    /// Name of the recognizer that produced the result.
    pub recognizer: String,
    /// Pattern that matched, for pattern recognizers.
    pub pattern_name: Option<String>,
    /// Score before context enhancement.
    pub original_score: f64,
    /// Score added by context enhancement.
    pub score_context_improvement: f64,
    /// Keyword that triggered the enhancement.
    pub supportive_context_word: Option<String>,
    /// Outcome of the validator, if one ran.
    pub validation_result: Option<ValidationOutcome>,
    /// Free-form note from the recognizer.
    pub textual_explanation: Option<String>,
}

impl AnalysisExplanation {
    /// Explanation carrying only the recognizer and its raw score.
    pub fn new(recognizer: impl Into<String>, original_score: f64) -> Self {
        Self { recognizer: recognizer.into(), original_score, ..Self::default() }
    }

    /// Record the matched pattern.
    pub fn with_pattern(mut self, pattern_name: impl Into<String>) -> Self {
        self.pattern_name = Some(pattern_name.into());
        self
    }

    /// Attach a free-form note.
    pub fn with_textual_explanation(mut self, text: impl Into<String>) -> Self {
        self.textual_explanation = Some(text.into());
        self
    }
}

/// One scored span of detected personal data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResult {
    /// Detected entity type.
    pub entity_type: EntityType,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
    /// Confidence in `[0, 1]`.
    pub score: f64,
    /// How the score was reached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_explanation: Option<AnalysisExplanation>,
}

impl RecognitionResult {
    /// Result without an explanation.
    pub fn new(entity_type: EntityType, start: usize, end: usize, score: f64) -> Self {
        Self { entity_type, start, end, score, analysis_explanation: None }
    }

    /// Attach an explanation.
    pub fn with_explanation(mut self, explanation: AnalysisExplanation) -> Self {
        self.analysis_explanation = Some(explanation);
        self
    }

    /// Span length in bytes.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span covers no text.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Spans overlap when they share at least one offset; adjacent spans do
    /// not overlap.
    pub fn overlaps_with(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// `start < end <= text.len()` and both ends on char boundaries.
    pub fn is_within(&self, text: &str) -> bool {
        self.start < self.end
            && self.end <= text.len()
            && text.is_char_boundary(self.start)
            && text.is_char_boundary(self.end)
    }
}
