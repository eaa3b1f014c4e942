//! Default Russian recognizer set
//!
//! Order matters: it is the registry order, which decides exact ties during
//! conflict resolution. The statistical recognizer (when a model is given)
//! comes first, then contact data, network identifiers, financial data,
//! Russian documents, messenger ids, geo/date and finally the nationality
//! list.

use std::sync::Arc;

use fz152_common::privacy::patterns::{
    validators, ContextConfig, EntityType, Pattern, PatternRecognizer, PatternRecognizerBuilder,
    PiiError, PiiResult,
};
use tracing::info;

use super::ports::NerModel;
use super::registry::RecognizerRegistry;
use super::statistical::{NerModelConfiguration, StatisticalRecognizer};

/// The only language with a recognizer set.
pub const SUPPORTED_LANGUAGE: &str = "ru";

const TELEGRAM_CONTEXT: &[&str] = &["chat_id", "chatid", "телеграм", "telegram", "tg_id", "чат", "id"];

const NATIONALITIES: &[&str] = &[
    "русские",
    "американцы",
    "китайцы",
    "башкиры",
    "татары",
    "евреи",
    "армяне",
    "грузины",
    "украинцы",
    "белорусы",
    "немцы",
    "французы",
    "англичане",
    "испанцы",
    "итальянцы",
    "чеченцы",
    "дагестанцы",
];

/// Tunables applied while building the default registry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistryOptions {
    /// Context window shared by the pattern recognizers.
    pub context: ContextConfig,
    /// Configuration of the statistical recognizer.
    pub ner: NerModelConfiguration,
}

/// Default registry with default options.
pub fn build_registry(
    language: &str,
    ner_model: Option<Arc<dyn NerModel>>,
) -> PiiResult<RecognizerRegistry> {
    build_registry_with(language, ner_model, &RegistryOptions::default())
}

/// Default registry.
///
/// # Errors
/// Fails for any language other than `ru`, and on any invalid pattern,
/// score or model configuration. Nothing is compiled lazily.
pub fn build_registry_with(
    language: &str,
    ner_model: Option<Arc<dyn NerModel>>,
    options: &RegistryOptions,
) -> PiiResult<RecognizerRegistry> {
    if language != SUPPORTED_LANGUAGE {
        return Err(PiiError::UnsupportedLanguage {
            requested: language.to_string(),
            supported: SUPPORTED_LANGUAGE.to_string(),
        });
    }

    let mut registry = RecognizerRegistry::new(language);

    if let Some(model) = ner_model {
        let statistical = StatisticalRecognizer::new(model, options.ner.clone())?;
        registry.add(Arc::new(statistical))?;
    }

    for recognizer in pattern_recognizers(language, options.context)? {
        registry.add(Arc::new(recognizer))?;
    }

    info!(
        language,
        recognizers = registry.len(),
        entities = registry.supported_entities().len(),
        "recognizer registry built"
    );
    Ok(registry)
}

fn recognizer(
    name: &str,
    entity: EntityType,
    language: &str,
    context: ContextConfig,
) -> PatternRecognizerBuilder {
    PatternRecognizer::builder(name, entity).language(language).context_config(context)
}

fn pattern_recognizers(language: &str, context: ContextConfig) -> PiiResult<Vec<PatternRecognizer>> {
    let mut recognizers = Vec::with_capacity(21);

    recognizers.push(
        recognizer("email", EntityType::EmailAddress, language, context)
            .pattern(Pattern::new(
                "email",
                r"\b[\p{L}\p{N}._%+-]+@[\p{L}\p{N}.-]+\.\p{L}{2,}\b",
                0.5,
            ))
            .context(["email", "почта", "e-mail", "mail"])
            .validator(validators::email)
            .build()?,
    );

    recognizers.push(
        recognizer("phone", EntityType::PhoneNumber, language, context)
            .pattern(
                Pattern::new(
                    "phone_ru",
                    r"(?:\+7|8)[\s\-]?\(?\d{3}\)?[\s\-]?\d{3}[\s\-]?\d{2}[\s\-]?\d{2}\b",
                    0.75,
                )
                .not_preceded_by_digit(),
            )
            .pattern(Pattern::new(
                "phone_international",
                r"\+\d{1,3}[\s\-]?\(?\d{1,4}\)?(?:[\s\-]?\d{2,4}){2,4}\b",
                0.5,
            ))
            .context(["телефон", "тел", "phone", "мобильный", "сотовый", "whatsapp"])
            .validator(validators::phone_digits)
            .build()?,
    );

    recognizers.push(
        recognizer("ip", EntityType::IpAddress, language, context)
            .pattern(Pattern::new("ipv4", r"\b(?:\d{1,3}\.){3}\d{1,3}\b", 0.6))
            .pattern(Pattern::new(
                "ipv6",
                r"\b(?:(?:[0-9a-f]{1,4}:){7}[0-9a-f]{1,4}|(?:[0-9a-f]{1,4}:){1,7}:(?:[0-9a-f]{1,4}(?::[0-9a-f]{1,4}){0,6})?)",
                0.6,
            ))
            .context(["ip", "ipv4", "ipv6", "адрес"])
            .validator(validators::ip_address)
            .build()?,
    );

    recognizers.push(
        recognizer("iban", EntityType::IbanCode, language, context)
            .pattern(Pattern::new(
                "iban",
                r"\b[A-Z]{2}\d{2}(?:[ ]?[A-Z0-9]{4}){2,7}(?:[ ]?[A-Z0-9]{1,4})?\b",
                0.5,
            ))
            .context(["iban", "счет", "счёт", "банк"])
            .validator(validators::iban)
            .build()?,
    );

    recognizers.push(
        recognizer("crypto", EntityType::Crypto, language, context)
            .pattern(Pattern::new(
                "bitcoin",
                r"\b(?:bc1[a-z0-9]{25,59}|[13][a-km-zA-HJ-NP-Z1-9]{25,34})\b",
                0.5,
            ))
            .context(["wallet", "кошелек", "bitcoin", "btc"])
            .validator(validators::bitcoin_address)
            .build()?,
    );

    recognizers.push(
        recognizer("credit_card", EntityType::CreditCard, language, context)
            .pattern(Pattern::new("card_16", r"\b(?:\d{4}[\s-]?){3}\d{4}\b", 0.3))
            .pattern(Pattern::new("card_15", r"\b3[47]\d{2}[\s-]?\d{6}[\s-]?\d{5}\b", 0.3))
            .context(["карта", "card", "visa", "mastercard", "мир"])
            .validator(validators::luhn)
            .build()?,
    );

    recognizers.push(
        recognizer("mac", EntityType::MacAddress, language, context)
            .pattern(Pattern::new("mac", r"\b([0-9A-Fa-f]{2}[:-]){5}([0-9A-Fa-f]{2})\b", 0.8))
            .build()?,
    );

    recognizers.push(
        recognizer("imei", EntityType::EmeImei, language, context)
            .pattern(Pattern::new("imei", r"\b\d{15,17}\b", 0.6))
            .context(["imei", "device id"])
            .build()?,
    );

    recognizers.push(
        recognizer("cvv", EntityType::Cvv, language, context)
            .pattern(Pattern::new("cvv", r"\b\d{3,4}\b", 0.6))
            .context(["cvv", "cvc", "cvv2", "cvc2", "код безопасности", "код карты"])
            .build()?,
    );

    recognizers.push(
        recognizer("ru_passport", EntityType::RuPassport, language, context)
            .pattern(Pattern::new("passport_rf", r"\b\d{4}[\s-]\d{6}\b", 0.85))
            .build()?,
    );

    recognizers.push(
        recognizer("ru_int_passport", EntityType::RuIntPassport, language, context)
            .pattern(Pattern::new("passport_int", r"\b\d{2}[\s-]?\d{7}\b", 0.85))
            .context(["загранпаспорт", "заграничный паспорт", "паспорт", "серия", "номер"])
            .build()?,
    );

    recognizers.push(
        recognizer("ru_inn", EntityType::RuInn, language, context)
            .pattern(Pattern::new("inn_legal", r"\b\d{10}\b", 0.9))
            .pattern(Pattern::new("inn_individual", r"\b\d{12}\b", 0.9))
            .context(["ИНН", "идентификационный номер"])
            .build()?,
    );

    recognizers.push(
        recognizer("ru_snils", EntityType::RuSnils, language, context)
            .pattern(Pattern::new("snils", r"\b\d{3}-\d{3}-\d{3}[\s-]\d{2}\b", 0.85))
            .context(["СНИЛС", "страховой номер"])
            .build()?,
    );

    recognizers.push(
        recognizer("ru_driver_license", EntityType::RuDriverLicense, language, context)
            .pattern(Pattern::new("driver_license", r"\b\d{2}[А-Яа-я0-9]{2}\s*\d{6}\b", 0.6))
            .context(["водительское", "права", "в/у", "удостоверение"])
            .build()?,
    );

    recognizers.push(
        recognizer("ru_oms", EntityType::RuOms, language, context)
            .pattern(Pattern::new("oms", r"\b\d{16}\b", 0.6))
            .context(["омс", "полис", "страховой"])
            .build()?,
    );

    recognizers.push(
        recognizer("ru_vehicle_plate", EntityType::RuVehiclePlate, language, context)
            .pattern(Pattern::new(
                "vehicle_plate",
                r"\b[ABEKMHOPCTYXАВЕКМНОРСТУХ]\s*\d{3}\s*[ABEKMHOPCTYXАВЕКМНОРСТУХ]{2}\s*\d{2,3}\b",
                0.7,
            ))
            .context(["госномер", "номер авто", "машина", "автомобиль", "грз"])
            .build()?,
    );

    recognizers.push(
        recognizer("tg_channel", EntityType::TgChatId, language, context)
            // The digit guard belongs right before "-100"; with an "id" prefix
            // that position is never a digit, so the prefixed form needs none.
            .pattern(Pattern::new("tg_channel_id", r"id\s*-100\d{10,}\b", 1.0))
            .pattern(Pattern::new("tg_channel", r"-100\d{10,}\b", 1.0).not_preceded_by_digit())
            .context(TELEGRAM_CONTEXT.iter().copied())
            .build()?,
    );

    recognizers.push(
        recognizer("tg_user", EntityType::TgChatId, language, context)
            .pattern(Pattern::new("tg_user", r"\d{5,15}\b", 0.6).not_preceded_by_digit())
            .context(TELEGRAM_CONTEXT.iter().copied())
            .build()?,
    );

    recognizers.push(
        recognizer("gps", EntityType::GpsCoords, language, context)
            .pattern(Pattern::new(
                "coordinates",
                r"\b-?\d{1,3}\.\d{3,10}[,\s]+-?\d{1,3}\.\d{3,10}\b",
                0.6,
            ))
            .context(["gps", "координаты", "широта", "долгота", "location"])
            .build()?,
    );

    recognizers.push(
        recognizer("date", EntityType::DateTime, language, context)
            .pattern(Pattern::new(
                "date",
                r"\b(?:(?:0[1-9]|[12]\d|3[01])[./-](?:0[1-9]|1[0-2])[./-](?:19|20)\d{2}|(?:19|20)\d{2}[./-](?:0[1-9]|1[0-2])[./-](?:0[1-9]|[12]\d|3[01]))\b",
                0.6,
            ))
            .context(["дата", "родился", "число", "год"])
            .build()?,
    );

    recognizers.push(PatternRecognizer::from_deny_list(
        "norp",
        EntityType::Norp,
        language,
        NATIONALITIES.iter().copied(),
        0.6,
    )?);

    Ok(recognizers)
}
