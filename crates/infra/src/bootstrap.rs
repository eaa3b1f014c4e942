//! Service assembly from configuration

use std::sync::Arc;

use fz152_common::privacy::patterns::ContextConfig;
use fz152_core::{
    build_registry_with, AnalyzerEngine, AnonymizerEngine, NerModel, NerModelConfiguration,
    OperatorConfig, PrivacyFilterService, RegistryOptions,
};
use fz152_domain::{AppConfig, Result};
use tracing::info;

use crate::errors::from_pii;
use crate::ner::LexiconNerModel;

/// Build the privacy filter described by `config`
///
/// Every recognizer, pattern and lexicon is loaded here; a service that is
/// returned never fails on configuration later.
///
/// # Errors
/// - `Fz152Error::Model` if the configured lexicon is missing or invalid
/// - `Fz152Error::Config` for an unsupported language or invalid tunables
pub fn build_service(config: &AppConfig) -> Result<PrivacyFilterService> {
    let ner_model = if config.ner.enabled { Some(load_ner_model(config)?) } else { None };

    let analyzer_config = &config.analyzer;
    let options = RegistryOptions {
        context: ContextConfig {
            prefix_tokens: analyzer_config.context_prefix_tokens,
            suffix_tokens: analyzer_config.context_suffix_tokens,
            similarity_factor: analyzer_config.context_boost,
            min_score_with_context: analyzer_config.min_score_with_context,
        },
        ner: NerModelConfiguration::default().with_default_score(config.ner.default_score),
    };

    let registry =
        build_registry_with(&analyzer_config.language, ner_model, &options).map_err(from_pii)?;
    let analyzer = AnalyzerEngine::new(Arc::new(registry))
        .with_score_threshold(analyzer_config.score_threshold);

    let anonymizer = match config.anonymizer.hash_salt.as_deref() {
        Some(salt) => AnonymizerEngine::from_salt(salt, config.anonymizer.hash_type),
        None => AnonymizerEngine::new(),
    }
    .map_err(from_pii)?;

    let operators = OperatorConfig::russian_defaults().with_overrides(&config.anonymizer.operators);

    info!(
        language = %analyzer_config.language,
        recognizers = analyzer.registry().len(),
        ner_enabled = config.ner.enabled,
        operator_overrides = config.anonymizer.operators.len(),
        "Privacy filter service built"
    );

    Ok(PrivacyFilterService::new(Arc::new(analyzer), Arc::new(anonymizer), Arc::new(operators)))
}

fn load_ner_model(config: &AppConfig) -> Result<Arc<dyn NerModel>> {
    let model = match &config.ner.lexicon_path {
        Some(path) => LexiconNerModel::from_path(path)?,
        None => LexiconNerModel::embedded()?,
    };
    Ok(Arc::new(model))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fz152_domain::Fz152Error;

    #[test]
    fn test_defaults_include_ner() {
        let service = build_service(&AppConfig::default()).unwrap();
        assert_eq!(service.language(), "ru");
        assert_eq!(service.analyzer().registry().len(), 22);
        assert!(service.analyzer().registry().get("statistical").is_some());
    }

    #[test]
    fn test_ner_can_be_disabled() {
        let mut config = AppConfig::default();
        config.ner.enabled = false;
        let service = build_service(&config).unwrap();
        assert_eq!(service.analyzer().registry().len(), 21);
    }

    #[test]
    fn test_missing_lexicon_is_model_error() {
        let mut config = AppConfig::default();
        config.ner.lexicon_path = Some("/nonexistent/lexicon.toml".into());
        assert!(matches!(build_service(&config), Err(Fz152Error::Model(_))));
    }

    #[test]
    fn test_unsupported_language_is_config_error() {
        let mut config = AppConfig::default();
        config.analyzer.language = "en".to_string();
        assert!(matches!(build_service(&config), Err(Fz152Error::Config(_))));
    }
}
