//! # FZ152 Core
//!
//! Detection and anonymization pipeline - no infrastructure dependencies.
//!
//! This crate contains:
//! - The recognizer registry and the default Russian recognizer set
//! - The statistical recognizer and its `NerModel` port
//! - The analysis aggregator (conflict resolution)
//! - The anonymization engine and operator table
//! - The privacy filter service tying them together
//!
//! ## Architecture Principles
//! - Only depends on `fz152-common` and `fz152-domain`
//! - No HTTP, file or model-loading code
//! - The NER model is reached through a trait
//! - Pure, testable pipeline logic

pub mod analysis;
pub mod anonymization;
pub mod recognition;
pub mod service;

// Re-export specific items to avoid ambiguity
pub use analysis::{resolve_conflicts, AnalyzeOptions, AnalyzerEngine};
pub use anonymization::{AnonymizedSpan, AnonymizedText, AnonymizerEngine, OperatorConfig};
pub use recognition::defaults::{build_registry, build_registry_with, RegistryOptions};
pub use recognition::ports::{NerModel, NerSpan};
pub use recognition::registry::RecognizerRegistry;
pub use recognition::statistical::{NerModelConfiguration, StatisticalRecognizer};
pub use service::{AuditEntry, AuditReport, PrivacyFilterService};
