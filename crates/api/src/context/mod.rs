//! Application context - dependency injection container

use std::sync::Arc;

use fz152_core::{AnonymizedText, AuditReport, PrivacyFilterService};
use fz152_domain::{AppConfig, Result};
use fz152_infra::{build_service, from_pii};

use crate::error::ApiError;

/// Application context - holds the pipeline and the settings it was built from
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Settings the service was built from.
    pub config: AppConfig,
    /// Shared detection and anonymization pipeline.
    pub service: Arc<PrivacyFilterService>,
}

impl AppContext {
    /// Build the pipeline described by `config`
    ///
    /// # Errors
    /// Fails on anything `build_service` rejects: an unsupported language, a
    /// missing lexicon, invalid tunables.
    pub fn new(config: AppConfig) -> Result<Self> {
        let service = Arc::new(build_service(&config)?);
        Ok(Self { config, service })
    }

    /// Wrap an already assembled service.
    pub fn from_service(config: AppConfig, service: Arc<PrivacyFilterService>) -> Self {
        Self { config, service }
    }

    /// Anonymize `text` off the async executor.
    pub async fn anonymize(&self, text: String) -> std::result::Result<AnonymizedText, ApiError> {
        let service = Arc::clone(&self.service);
        if self.config.analyzer.parallel {
            return service.anonymize_text_concurrent(&text).await.map_err(|e| from_pii(e).into());
        }
        tokio::task::spawn_blocking(move || service.anonymize_text(&text))
            .await?
            .map_err(|e| from_pii(e).into())
    }

    /// Audit `text` off the async executor.
    pub async fn audit(&self, text: String) -> std::result::Result<AuditReport, ApiError> {
        let service = Arc::clone(&self.service);
        if self.config.analyzer.parallel {
            return service.audit_text_concurrent(&text).await.map_err(|e| from_pii(e).into());
        }
        tokio::task::spawn_blocking(move || service.audit_text(&text))
            .await?
            .map_err(|e| from_pii(e).into())
    }
}
