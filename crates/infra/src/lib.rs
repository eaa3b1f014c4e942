//! # FZ152 Infrastructure
//!
//! Infrastructure implementations of core ports and process setup.
//!
//! This crate contains:
//! - The configuration loader (files and `FZ152_*` environment variables)
//! - The lexicon NER model implementing the core `NerModel` port
//! - Tracing subscriber setup
//! - Service assembly from configuration
//!
//! ## Architecture
//! - Implements traits defined in `fz152-core`
//! - Depends on `fz152-domain`, `fz152-common` and `fz152-core`
//! - Contains the "impure" code (file and environment access)

pub mod bootstrap;
pub mod config;
pub mod errors;
pub mod ner;
pub mod observability;

// Re-export commonly used items
pub use bootstrap::build_service;
pub use config::{load, load_from_env, load_from_file};
pub use errors::from_pii;
pub use ner::{Lexicon, LexiconNerModel};
pub use observability::init_tracing;
