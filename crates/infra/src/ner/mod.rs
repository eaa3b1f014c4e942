//! Lexicon-driven named-entity model
//!
//! Implements the core `NerModel` port with word lists and a handful of
//! Russian-specific rules. No model files or native runtimes are needed;
//! a TOML lexicon can replace the embedded one.

pub mod lexicon;
pub mod model;

pub use lexicon::Lexicon;
pub use model::LexiconNerModel;
