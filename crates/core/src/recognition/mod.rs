//! Recognizer construction: the NER port, the statistical recognizer, the
//! registry and the default Russian recognizer set.

pub mod defaults;
pub mod ports;
pub mod registry;
pub mod statistical;
