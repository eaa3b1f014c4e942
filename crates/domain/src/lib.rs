//! # FZ152 Domain
//!
//! Application-level types for the fz152 filter.
//!
//! This crate contains:
//! - Configuration structures (server, analyzer, NER, anonymizer, logging)
//! - Anonymization operator definitions
//! - Application error type and Result definition
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other fz152 crates
//! - Only external dependencies allowed
//! - Pure data structures and their validation

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
