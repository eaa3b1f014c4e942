//! Integration tests for the privacy module
//!
//! Exercises recognizers, context boosting and salted hashing through the
//! public API only.

#![cfg(feature = "runtime")]

use fz152_common::privacy::hash::{HashAlgorithm, HashConfig, SecureHasher};
use fz152_common::privacy::patterns::{
    validators, ContextConfig, EntityType, Pattern, PatternRecognizer, Recognizer,
};

/// Validates that a recognizer with several patterns reports each pattern
/// independently for the same entity type.
///
/// # Test Steps
/// 1. Build an INN recognizer with 10- and 12-digit patterns
/// 2. Analyze text containing one of each
/// 3. Verify both spans are reported with the INN entity type
/// 4. Verify the "ИНН" keyword lifted both scores to 1.0
#[test]
fn test_multi_pattern_recognizer() {
    let inn = PatternRecognizer::builder("ru_inn", EntityType::RuInn)
        .pattern(Pattern::new("inn_10", r"\b\d{10}\b", 0.9))
        .pattern(Pattern::new("inn_12", r"\b\d{12}\b", 0.9))
        .context(["ИНН", "идентификационный номер"])
        .build()
        .expect("recognizer should build");

    let text = "ИНН 7707083893 и ИНН 500100732259";
    let results = inn.analyze(text, "ru").expect("analysis should succeed");

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.entity_type == EntityType::RuInn));
    assert!(results.iter().all(|r| (r.score - 1.0).abs() < f64::EPSILON));
    assert_eq!(&text[results[0].start..results[0].end], "7707083893");
}

/// Validates that the context window can be reconfigured per recognizer.
///
/// # Test Steps
/// 1. Build a CVV recognizer with a one-token prefix window
/// 2. Verify a keyword two tokens away no longer boosts the score
/// 3. Verify an adjacent keyword still does
#[test]
fn test_custom_context_window() {
    let narrow = ContextConfig { prefix_tokens: 1, suffix_tokens: 0, ..ContextConfig::default() };
    let cvv = PatternRecognizer::builder("cvv", EntityType::Cvv)
        .pattern(Pattern::new("cvv", r"\b\d{3}\b", 0.6))
        .context(["cvv"])
        .context_config(narrow)
        .build()
        .expect("recognizer should build");

    let far = cvv.analyze("cvv код 123", "ru").expect("analysis should succeed");
    assert!((far[0].score - 0.6).abs() < f64::EPSILON);

    let near = cvv.analyze("код cvv 123", "ru").expect("analysis should succeed");
    assert!(near[0].score > 0.9);
}

/// Validates that checksum validators keep structurally impossible values
/// out of the results.
///
/// # Test Steps
/// 1. Build IBAN and IP recognizers with their validators
/// 2. Analyze text containing valid and invalid candidates
/// 3. Verify only the valid ones are reported, at score 1.0
#[test]
fn test_validators_filter_candidates() {
    let iban = PatternRecognizer::builder("iban", EntityType::IbanCode)
        .pattern(Pattern::new("iban", r"\b[A-Z]{2}\d{2}[A-Z0-9]{11,30}\b", 0.5))
        .validator(validators::iban)
        .build()
        .expect("recognizer should build");
    let ip = PatternRecognizer::builder("ip", EntityType::IpAddress)
        .pattern(Pattern::new("ipv4", r"\b(?:\d{1,3}\.){3}\d{1,3}\b", 0.6))
        .validator(validators::ip_address)
        .build()
        .expect("recognizer should build");

    let text = "IBAN DE89370400440532013000, старый DE00370400440532013000, хост 10.0.0.1 и 300.1.1.1";
    let ibans = iban.analyze(text, "ru").expect("analysis should succeed");
    let ips = ip.analyze(text, "ru").expect("analysis should succeed");

    assert_eq!(ibans.len(), 1);
    assert_eq!(&text[ibans[0].start..ibans[0].end], "DE89370400440532013000");
    assert_eq!(ips.len(), 1);
    assert_eq!(&text[ips[0].start..ips[0].end], "10.0.0.1");
    assert!(ips.iter().chain(&ibans).all(|r| (r.score - 1.0).abs() < f64::EPSILON));
}

/// Validates salted hashing across supported algorithms.
///
/// # Test Steps
/// 1. Hash the same value with SHA-256 and SHA-512 under one salt
/// 2. Verify output lengths match the algorithm
/// 3. Verify a different salt yields a different digest
#[test]
fn test_salted_hashing() {
    for algorithm in [HashAlgorithm::Sha256, HashAlgorithm::Sha512] {
        let config = HashConfig::with_salt("integration-salt", algorithm).expect("valid salt");
        let hasher = SecureHasher::with_config(config);
        let digest = hasher.hash_value("4500 123456").expect("hash should succeed");
        assert_eq!(digest.len(), algorithm.hex_len());

        let other =
            SecureHasher::with_config(HashConfig::with_salt("other-salt", algorithm).expect("valid salt"));
        assert_ne!(digest, other.hash_value("4500 123456").expect("hash should succeed"));
    }
}
