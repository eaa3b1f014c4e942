//! Anonymization engine and operator table

mod engine;
mod operators;

pub use engine::{AnonymizedSpan, AnonymizedText, AnonymizerEngine};
pub use operators::OperatorConfig;
